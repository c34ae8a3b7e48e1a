use winit::{
    dpi::PhysicalSize,
    window::Window,
};
use thiserror::Error;

/// The connection to the gpu and the surface of the window
pub struct RenderState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface,
    config: wgpu::SurfaceConfiguration,
}

impl RenderState {
    /// Connects to the gpu and configures the surface of the window
    ///
    /// # Parameters
    ///
    /// window: The window to draw in, must outlive the render state
    ///
    /// # Errors
    ///
    /// See NewRenderStateError for the possible errors
    pub async fn new(window: &Window) -> Result<Self, NewRenderStateError> {
        let size = window.inner_size();

        if size.width == 0 || size.height == 0 {
            return Err(NewRenderStateError::InvalidSize(size));
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::VALIDATION,
            dx12_shader_compiler: Default::default(),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        });

        // The window is kept alive by the application for as long as the surface
        let surface = unsafe { instance.create_surface(&window) }?;

        let adapter = instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        ).await.ok_or(NewRenderStateError::GetAdapter)?;

        let info = adapter.get_info();
        log::info!("Drawing with {} on {:?}", info.name, info.backend);

        // Texture arrays with four layers fit within the downlevel limits
        let (device, queue) = adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("HexTile Device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
            },
            None,
        ).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats.iter()
            .copied()
            .find(|format| format.is_srgb())
            .ok_or(NewRenderStateError::IncompatibleSurface)?;
        let present_mode = if surface_caps.present_modes.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            surface_caps.present_modes.first().copied().ok_or(NewRenderStateError::IncompatibleSurface)?
        };
        let alpha_mode = surface_caps.alpha_modes.first().copied().ok_or(NewRenderStateError::IncompatibleSurface)?;
        log::debug!("Surface uses {:?} with {:?}", format, present_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Reconfigures the surface for a new window size, zero sizes are ignored
    ///
    /// # Parameters
    ///
    /// new_size: The new inner size of the window
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            log::debug!("Ignoring resize to {:?}", new_size);
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Configures the surface again with the current size, used when it is lost
    pub fn reconfigure(&mut self) {
        log::warn!("Reconfiguring the lost surface");
        self.surface.configure(&self.device, &self.config);
    }

    pub fn get_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn get_device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn get_queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn get_surface(&self) -> &wgpu::Surface {
        &self.surface
    }

    pub fn get_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }
}

#[derive(Error, Debug, Clone)]
pub enum NewRenderStateError {
    #[error("The width and height of the window must be larger than 0 but received {:?}", .0)]
    InvalidSize(PhysicalSize<u32>),
    #[error("Unable to create surface: {:?}", .0)]
    CreateSurface(wgpu::CreateSurfaceError),
    #[error("Unable to get adapter for gpu")]
    GetAdapter,
    #[error("Unable to retrieve logical device: {:?}", .0)]
    RequestDevice(wgpu::RequestDeviceError),
    #[error("The surface has no sRGB format or no present mode")]
    IncompatibleSurface,
}

impl From<wgpu::CreateSurfaceError> for NewRenderStateError {
    fn from(value: wgpu::CreateSurfaceError) -> Self {
        Self::CreateSurface(value)
    }
}

impl From<wgpu::RequestDeviceError> for NewRenderStateError {
    fn from(value: wgpu::RequestDeviceError) -> Self {
        Self::RequestDevice(value)
    }
}
