use std::time::Instant;
use winit::{
    window::{Window, WindowBuilder, Fullscreen},
    event_loop::{EventLoop, ControlFlow},
    dpi::{PhysicalSize, PhysicalPosition},
    event::{Event, WindowEvent, KeyboardInput, ElementState, ModifiersState, MouseScrollDelta},
};
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use super::{
    color,
    types::{Point, Size},
    params::TileParams,
    view::ViewCoords,
    zoom::ZoomLevels,
    tile_view::TileView,
    sticky::Sticky,
    focus::FocusPulse,
    settings::{Settings, SettingsError},
    textures::TileImages,
    scene::Scene,
    controls::{self, Command},
    render::{RenderState, NewRenderStateError},
    gpu_tiles::{TileRenderer, RenderError},
};

/// The title of the window
const TITLE: &str = "HexTile";
/// The number of pixels of a scroll counted as one line
const PIXELS_PER_LINE: f64 = 40.0;

/// Runs the application, logging must be initialized by the caller
///
/// # Parameters
///
/// settings: The configuration of the application
pub async fn run(settings: Settings) {
    // Create the event loop
    let event_loop = EventLoop::new();

    // Create the window
    let (width, height) = settings.get_window_size();
    let window = WindowBuilder::new()
        .with_title(TITLE)
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop);
    let window = match window {
        Ok(window) => window,
        Err(error) => {
            log::error!("Unable to open window: {:?}", error);
            return;
        }
    };

    // Create the state
    let state = State::new(window, settings).await;
    let mut state = match state {
        Ok(state) => state,
        Err(error) => {
            log::error!("Unable to create state: {}", error);
            return;
        },
    };
    log::info!("Started with a board of {} tiles", state.board.tiles().len());

    // Run the event loop
    event_loop.run(move |event, _, control_flow| state.handle_event(&event, control_flow));
}

/// Holds the state of the application
struct State {
    /// Draws the scenes
    renderer: TileRenderer,
    /// The render state, dropped before the window its surface belongs to
    render_state: RenderState,
    /// The main window
    window: Window,
    /// The tiles and the view of them
    board: TileView,
    /// The zoom steps
    zoom: ZoomLevels,
    /// The decoration following the cursor
    sticky: Sticky,
    /// The pulse of the hover highlight
    focus: FocusPulse,
    /// How the tile faces are drawn
    images: TileImages,
    settings: Settings,
    /// The source of the random edits
    rng: StdRng,
    /// The modifier keys currently held
    modifiers: ModifiersState,
}

impl State {
    /// Create a new state
    ///
    /// # Parameters
    ///
    /// window: The window to use for the application
    ///
    /// settings: The configuration, checked before anything is created
    ///
    /// # Errors
    ///
    /// See NewStateError for the possible errors
    async fn new(window: Window, settings: Settings) -> Result<Self, NewStateError> {
        settings.validate()?;

        // Get the size of the window
        let size = window.inner_size();

        if size.width == 0 || size.height == 0 {
            return Err(NewStateError::InvalidSize(size));
        }

        // Initialize the render state
        let render_state = RenderState::new(&window).await?;

        // Load the faces, a broken image gives flat colors instead of no board
        let images = match TileImages::load(settings.get_image_dir()) {
            Ok(images) => images,
            Err(error) => {
                log::error!("Unable to load tile images: {}", error);
                TileImages::empty()
            }
        };
        let renderer = TileRenderer::new(&images, &render_state);

        // Build the first board
        let zoom = ZoomLevels::generate(settings.get_zoom_resolution());
        let mut board = TileView::new(TileParams::new(settings.get_tile_radius()));
        board.init_view(&ViewCoords::new(zoom.get_zoom(), &Point::new(0.0, 0.0)), &window_size(size));

        let now = Instant::now();

        Ok(Self {
            renderer,
            render_state,
            window,
            board,
            zoom,
            sticky: Sticky::new(),
            focus: FocusPulse::new(now),
            images,
            settings,
            rng: StdRng::from_entropy(),
            modifiers: ModifiersState::empty(),
        })
    }

    /// Render the screen
    ///
    /// # Errors
    ///
    /// See RenderError for the possible errors
    fn render(&mut self) -> Result<(), RenderError> {
        let scene = Scene::build(&self.board, &self.images, &self.sticky, &self.focus, Instant::now());
        self.renderer.render(&scene, self.board.get_view(), &color::BACKGROUND, &self.render_state)
    }

    /// Handles all events from winit
    ///
    /// # Parameters
    ///
    /// event: The event to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_event(&mut self, event: &Event<'_, ()>, control_flow: &mut ControlFlow) {
        match event {
            // Run the window event handler
            Event::WindowEvent { window_id, event } => if *window_id == self.window.id() {
                self.handle_window_event(event, control_flow);
            }

            // Advance the animations and schedule the next frame
            Event::MainEventsCleared => {
                self.update(control_flow);
            }

            // Render the screen
            Event::RedrawRequested(window_id) => if *window_id == self.window.id() {
                match self.render() {
                    Ok(_) => {}

                    // Reconfigure the surface if lost
                    Err(RenderError::SurfaceTexture(wgpu::SurfaceError::Lost)) => self.render_state.reconfigure(),

                    // The system is out of memory, we should probably quit
                    Err(RenderError::SurfaceTexture(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("System is out of memory");
                        control_flow.set_exit();
                    }

                    // All other errors (Outdated, Timeout) should be resolved by the next frame
                    Err(error) => log::warn!("Error while rendering: {}", error),
                }
            }

            _ => ()
        }
    }

    /// Runs one frame of the animations
    ///
    /// # Parameters
    ///
    /// control_flow: The location to set the control flow
    fn update(&mut self, control_flow: &mut ControlFlow) {
        if *control_flow == ControlFlow::Exit {
            return;
        }

        let now = Instant::now();
        if self.board.update(now) {
            self.after_hover(now);
        }
        if self.sticky.is_visible() {
            self.sticky.update_step(now);
        }

        self.window.request_redraw();

        if self.board.is_animating() || self.sticky.is_visible() || self.sticky.shows_arrow() || !self.board.selected_tiles().is_empty() {
            control_flow.set_wait_until(now + self.settings.get_frame_duration());
        } else {
            control_flow.set_wait();
        }
    }

    /// Handle a window event
    ///
    /// # Parameters
    ///
    /// event: The event to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_window_event(&mut self, event: &WindowEvent<'_>, control_flow: &mut ControlFlow) {
        match event {
            // Close the window
            WindowEvent::CloseRequested => control_flow.set_exit(),

            // The size of the window has changed
            WindowEvent::Resized(physical_size) => {
                self.resize(*physical_size);
            }

            // The window has been dragged into an area with a different scale factor
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                self.resize(**new_inner_size);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
            }

            WindowEvent::KeyboardInput { input, .. } => {
                self.handle_keyboard_input(input, control_flow);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_moved(*position);
            }

            WindowEvent::CursorLeft { .. } => {
                self.board.clear_current_tile();
                self.board.update_selected();
            }

            WindowEvent::MouseInput { state: ElementState::Pressed, button, .. } => {
                if let Some(command) = controls::mouse_command(*button, self.modifiers) {
                    self.run_command(command, control_flow);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
                };
                if let Some(command) = controls::wheel_command(lines, self.modifiers) {
                    self.run_command(command, control_flow);
                }
            }

            _ => (),
        }
    }

    /// Handle a keyboard input
    ///
    /// # Parameters
    ///
    /// input: The input to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_keyboard_input(&mut self, input: &KeyboardInput, control_flow: &mut ControlFlow) {
        let key = match input.virtual_keycode {
            Some(key) => key,
            None => return,
        };

        let pressed = input.state == ElementState::Pressed;
        if let Some(command) = controls::key_command(key, pressed, self.modifiers) {
            log::trace!("Key {:?} gives {:?}", key, command);
            self.run_command(command, control_flow);
        }
    }

    /// Moves the hover to the tile under the cursor
    ///
    /// # Parameters
    ///
    /// position: The cursor position in the window
    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.board.find_current_tile(position.x, position.y);
        self.after_hover(Instant::now());
    }

    /// Updates everything depending on the hovered tile
    fn after_hover(&mut self, now: Instant) {
        if self.board.take_hover_changed() {
            self.focus.reset(now);
        }
        self.board.update_selected();

        let cursor = self.board.get_view().screen_to_tile(self.board.get_cursor());
        self.sticky.set_position(&cursor);
        if self.sticky.is_tracking() {
            if let Some(tile) = self.board.current_tile().and_then(|id| self.board.tile(id)) {
                self.sticky.adjust_direction(tile);
            }
        }
    }

    /// Carries out a command
    ///
    /// # Parameters
    ///
    /// command: The command to carry out
    ///
    /// control_flow: The location to set the control flow
    fn run_command(&mut self, command: Command, control_flow: &mut ControlFlow) {
        let now = Instant::now();

        match command {
            Command::Apply(action) => {
                if self.board.apply(action, now, &mut self.rng) {
                    self.focus.reset(now);
                    self.after_hover(now);
                }
            }

            Command::Pan { columns, hex_rows } => {
                let params = self.board.get_params();
                let dx = (columns as f64) * params.get_col_width();
                let dy = (hex_rows as f64) * 2.0 * params.get_row_height();
                self.board.start_moving(now, self.settings.get_pan_duration(), dx, dy);
            }

            Command::ZoomIn => if self.zoom.zoom_in() {
                self.start_zooming(now);
            }
            Command::ZoomOut => if self.zoom.zoom_out() {
                self.start_zooming(now);
            }
            Command::ZoomReset => if self.zoom.reset() {
                self.start_zooming(now);
            }

            Command::SetFlood(enable) => {
                self.board.set_flood(enable);
            }

            Command::ToggleSticky => {
                let visible = self.sticky.toggle_visible();
                self.window.set_cursor_visible(!visible);
                self.after_hover(now);
            }
            Command::ToggleArrow => {
                self.sticky.toggle_arrow();
                self.after_hover(now);
            }
            Command::RotateSticky(steps) => {
                self.sticky.rotate(steps);
            }

            Command::ToggleFullscreen => {
                let fullscreen = match self.window.fullscreen() {
                    Some(_) => None,
                    None => Some(Fullscreen::Borderless(None)),
                };
                self.window.set_fullscreen(fullscreen);
            }

            Command::Quit => control_flow.set_exit(),
        }
    }

    fn start_zooming(&mut self, now: Instant) {
        log::debug!("Zooming to {}", self.zoom.get_ratio());
        self.board.start_zooming(now, self.settings.get_zoom_duration(), self.zoom.get_zoom());
    }

    /// Reconfigure if the window has been resized
    ///
    /// # Parameters
    ///
    /// new_size: The new size to set
    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        // Reconfigure the surface
        if new_size.width > 0 && new_size.height > 0 {
            self.render_state.resize(new_size);
            self.board.resize_view(&window_size(new_size));
        }
    }
}

/// Converts the window size to a size in pixels on the board
fn window_size(size: PhysicalSize<u32>) -> Size {
    Size::new(size.width as f64, size.height as f64)
}

/// The error types for when creating a new state
#[derive(Error, Debug)]
pub enum NewStateError {
    /// The width or height of the window is too small
    #[error("The width and height of the window must be larger than 0 but received {:?}", .0)]
    InvalidSize(PhysicalSize<u32>),
    /// The render state could not be created
    #[error("Unable to initialize the render state: {:?}", .0)]
    RenderInitError(NewRenderStateError),
    /// The settings do not describe a usable application
    #[error("Invalid settings: {}", .0)]
    Settings(SettingsError),
}

impl From<NewRenderStateError> for NewStateError {
    fn from(value: NewRenderStateError) -> Self {
        Self::RenderInitError(value)
    }
}

impl From<SettingsError> for NewStateError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}
