//! The frame as a list of draw batches, built on the cpu from the board.
//!
//! All positions are on the board, the gpu applies the view. Batches are drawn in order so
//! later batches cover earlier ones.

use std::time::{Duration, Instant};
use super::{
    SQRT_3,
    types::Point,
    color::{self, Color},
    tile::Tile,
    tile_view::TileView,
    sticky::{Sticky, STICKY_STEP_COUNT},
    focus::FocusPulse,
    textures::{TileImages, SOLID_LAYER},
};

/// The screen offset of the tile shadows in pixels
const SHADOW_OFFSET_PIX: f64 = 1.0;
/// The opacity of the tile outlines relative to the tile
const LINE_ALPHA: f64 = 160.0 / 255.0;
/// The gray level of the highlight on the selected tiles
const HIGHLIGHT_GRAY: f32 = 128.0 / 255.0;
/// The gray level of the outline of selected tiles which are not placed
const FOCUS_OUTLINE_GRAY: f32 = 1.0;

const ARROW_COLOR_START: Color = Color::new_rgba(32.0 / 255.0, 32.0 / 255.0, 32.0 / 255.0, 196.0 / 255.0);
const ARROW_COLOR_END: Color = Color::new_rgba(160.0 / 255.0, 160.0 / 255.0, 160.0 / 255.0, 240.0 / 255.0);
const ARROW_COLOR_PERIOD: Duration = Duration::from_secs(2);
const ARROW_SHORT_LENGTH_PERIOD: Duration = Duration::from_millis(750);
const ARROW_LONG_LENGTH_PERIOD: Duration = Duration::from_millis(1500);

/// The radius of the sticky marker in pixels
const STICKY_RADIUS_PIX: f64 = 12.0;
/// The opacity of every frame of the sticky animation
const STICKY_FRAME_ALPHA: [f64; STICKY_STEP_COUNT] = [0.6, 0.8, 1.0, 0.8];

/// One hexagon to draw
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TileInstance {
    /// The center on the board
    pub center: [f32; 2],
    /// The distance from the center to the vertices
    pub radius: f32,
    /// The texture layer to fill with
    pub layer: u32,
    /// The color the texture is multiplied by
    pub color: [f32; 4],
}

impl TileInstance {
    fn new(center: &Point, radius: f64, layer: u32, color: &Color) -> Self {
        Self {
            center: center.get_data(),
            radius: radius as f32,
            layer,
            color: color.get_data(),
        }
    }
}

/// One end of a line segment
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SegmentVertex {
    /// The position on the board
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// A run of primitives drawn with the same pipeline
#[derive(Clone, Debug, PartialEq)]
pub enum Batch {
    /// Filled hexagons
    Fills(Vec<TileInstance>),
    /// Hexagon outlines
    Outlines(Vec<TileInstance>),
    /// Line segments, two vertices each
    Segments(Vec<SegmentVertex>),
}

/// Everything to draw in one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    batches: Vec<Batch>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene from ready made batches
    pub fn from_batches(batches: Vec<Batch>) -> Self {
        Self { batches }
    }

    /// Builds the frame for the board
    ///
    /// # Parameters
    ///
    /// board: The board to draw
    ///
    /// images: Decides how tile faces are filled
    ///
    /// sticky: The cursor decoration
    ///
    /// focus: The pulse animating the highlights
    ///
    /// now: The current time
    pub fn build(board: &TileView, images: &TileImages, sticky: &Sticky, focus: &FocusPulse, now: Instant) -> Self {
        let mut scene = Self::new();
        let pixel = 1.0 / board.get_view().get_zoom();

        let visible: Vec<&Tile> = board.viewable_tiles()
            .iter()
            .filter_map(|&id| board.tile(id))
            .filter(|tile| tile.is_visible())
            .collect();

        // Shadows then faces
        let shadow_offset = Point::new(SHADOW_OFFSET_PIX, SHADOW_OFFSET_PIX) * pixel;
        for tile in visible.iter() {
            let center = tile.get_center() + &shadow_offset;
            scene.push_fill(TileInstance::new(&center, tile.get_radius(), SOLID_LAYER, &color::TILE_SHADOW.fade(tile.get_alpha())));
        }
        for tile in visible.iter() {
            let color = tile.get_color();
            let tint = images.tint_of(color).fade(tile.get_alpha());
            scene.push_fill(TileInstance::new(tile.get_center(), tile.get_radius(), images.layer_of(color), &tint));
        }

        // Outlines and cube lines
        for tile in visible.iter() {
            let line_alpha = tile.get_alpha() * LINE_ALPHA;
            scene.push_outline(TileInstance::new(tile.get_center(), tile.get_radius(), SOLID_LAYER, &color::TILE_LINE.fade(line_alpha)));
        }
        for tile in visible.iter() {
            // The cube lines overlap the outline at the vertices, as if drawn twice
            let line_alpha = tile.get_alpha() * LINE_ALPHA;
            let line_color = color::TILE_LINE.fade(2.0 * line_alpha - line_alpha * line_alpha);
            for &index in tile.get_orientation().vertex_indices() {
                scene.push_segment(tile.get_center(), &tile.get_vertices()[index], &line_color);
            }
        }

        // Highlight of the selection
        for tile in board.selected_tiles().iter().filter_map(|&id| board.tile(id)) {
            if tile.is_visible() {
                let color = focus.focus_color(now, HIGHLIGHT_GRAY, tile.get_alpha());
                scene.push_fill(TileInstance::new(tile.get_center(), tile.get_radius(), SOLID_LAYER, &color));
            }
        }
        for tile in board.selected_tiles().iter().filter_map(|&id| board.tile(id)) {
            if !tile.is_enabled() || tile.in_transition() {
                let color = focus.focus_color(now, FOCUS_OUTLINE_GRAY, 1.0 - tile.get_alpha());
                scene.push_outline(TileInstance::new(tile.get_center(), tile.get_radius(), SOLID_LAYER, &color));
            }
        }

        scene.push_sticky(sticky, focus, now, pixel);

        scene
    }

    fn push_sticky(&mut self, sticky: &Sticky, focus: &FocusPulse, now: Instant, pixel: f64) {
        if sticky.shows_arrow() {
            let color = focus.mix(now, &ARROW_COLOR_START, &ARROW_COLOR_END, ARROW_COLOR_PERIOD);
            if sticky.is_visible() {
                if let Some(direction) = sticky.direction_vector() {
                    let length = 25.0 + 5.0 * focus.alpha(now, ARROW_SHORT_LENGTH_PERIOD);
                    self.push_arrow(sticky.get_position(), &direction, length * pixel, 10.0 * pixel, &color);
                }
            } else if let Some(normal) = sticky.normal_vector() {
                let length = 50.0 + 10.0 * focus.alpha(now, ARROW_LONG_LENGTH_PERIOD);
                self.push_arrow(sticky.get_position(), &normal, length * pixel, 15.0 * pixel, &color);
            }
        }

        if sticky.is_visible() {
            let alpha = STICKY_FRAME_ALPHA[sticky.get_step() % STICKY_STEP_COUNT];
            self.push_fill(TileInstance::new(sticky.get_position(), STICKY_RADIUS_PIX * pixel, SOLID_LAYER, &color::TILE_WHITE.fade(alpha)));
        }
    }

    /// Adds a line with an arrowhead at the far end
    fn push_arrow(&mut self, start: &Point, direction: &Point, length: f64, head: f64, color: &Color) {
        let head_angle = 5.0 * std::f64::consts::PI / 6.0;
        let end = start + &(direction * (length - head * 0.5 * SQRT_3));
        let tip = start + &(direction * length);
        let left = &tip + &(direction.rotate(head_angle) * head);
        let right = &tip + &(direction.rotate(-head_angle) * head);

        self.push_segment(start, &end, color);
        self.push_segment(&tip, &left, color);
        self.push_segment(&left, &right, color);
        self.push_segment(&right, &tip, color);
    }

    fn push_fill(&mut self, instance: TileInstance) {
        match self.batches.last_mut() {
            Some(Batch::Fills(fills)) => fills.push(instance),
            _ => self.batches.push(Batch::Fills(vec![instance])),
        }
    }

    fn push_outline(&mut self, instance: TileInstance) {
        match self.batches.last_mut() {
            Some(Batch::Outlines(outlines)) => outlines.push(instance),
            _ => self.batches.push(Batch::Outlines(vec![instance])),
        }
    }

    fn push_segment(&mut self, from: &Point, to: &Point, color: &Color) {
        let vertices = [
            SegmentVertex { position: from.get_data(), color: color.get_data() },
            SegmentVertex { position: to.get_data(), color: color.get_data() },
        ];
        match self.batches.last_mut() {
            Some(Batch::Segments(segments)) => segments.extend_from_slice(&vertices),
            _ => self.batches.push(Batch::Segments(vertices.to_vec())),
        }
    }

    /// Retrieves the batches in drawing order
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Counts the filled hexagons of all batches
    pub fn fill_count(&self) -> usize {
        self.batches.iter().map(|batch| match batch {
            Batch::Fills(fills) => fills.len(),
            _ => 0,
        }).sum()
    }

    /// Counts the hexagon outlines of all batches
    pub fn outline_count(&self) -> usize {
        self.batches.iter().map(|batch| match batch {
            Batch::Outlines(outlines) => outlines.len(),
            _ => 0,
        }).sum()
    }

    /// Counts the line segments of all batches
    pub fn segment_count(&self) -> usize {
        self.batches.iter().map(|batch| match batch {
            Batch::Segments(segments) => segments.len() / 2,
            _ => 0,
        }).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        params::TileParams,
        types::Size,
        view::ViewCoords,
    };

    fn board() -> TileView {
        let mut board = TileView::new(TileParams::new(50.0));
        board.init_view(&ViewCoords::default(), &Size::new(800.0, 600.0));
        board
    }

    #[test]
    fn blank_board_draws_nothing() {
        let t0 = Instant::now();
        let scene = Scene::build(&board(), &TileImages::empty(), &Sticky::new(), &FocusPulse::new(t0), t0);

        assert!(scene.is_empty());
    }

    #[test]
    fn placed_tile_draws_shadow_face_outline_and_lines() {
        let t0 = Instant::now();
        let mut board = board();
        let id = board.find_tile(400.0, 300.0).unwrap();
        let tile = board.tile_mut(id).unwrap();
        tile.change_color_up(t0);
        tile.change_orientation_up();
        board.update(t0 + Duration::from_secs(1));

        let scene = Scene::build(&board, &TileImages::empty(), &Sticky::new(), &FocusPulse::new(t0), t0);
        assert_eq!(scene.fill_count(), 2);
        assert_eq!(scene.outline_count(), 1);
        assert_eq!(scene.segment_count(), 3);

        match &scene.batches()[0] {
            Batch::Fills(fills) => {
                assert_eq!(fills[0].layer, SOLID_LAYER);
                assert_eq!(fills[1].color, color::TILE_WHITE.get_data());
            }
            other => panic!("Expected fills first but found {:?}", other),
        }
    }

    #[test]
    fn hovered_empty_tile_gets_a_focus_outline() {
        let t0 = Instant::now();
        let mut board = board();
        board.find_current_tile(400.0, 300.0);
        board.update_selected();

        let scene = Scene::build(&board, &TileImages::empty(), &Sticky::new(), &FocusPulse::new(t0), t0);
        assert_eq!(scene.fill_count(), 0);
        assert_eq!(scene.outline_count(), 1);
    }

    #[test]
    fn visible_sticky_draws_marker_and_arrow() {
        let t0 = Instant::now();
        let mut board = board();
        let id = board.find_tile(400.0, 300.0).unwrap();
        let tile = board.tile_mut(id).unwrap();
        tile.change_color_up(t0);
        tile.change_orientation_up();

        let mut sticky = Sticky::new();
        sticky.toggle_visible();
        sticky.toggle_arrow();
        let tile = board.tile(id).unwrap();
        sticky.set_position(&(tile.get_vertices()[1] * 0.9 + *tile.get_center() * 0.1));
        sticky.adjust_direction(tile);
        assert!(sticky.get_direction().is_some());

        let scene = Scene::build(&board, &TileImages::empty(), &sticky, &FocusPulse::new(t0), t0);
        // Three cube lines and four arrow segments
        assert_eq!(scene.segment_count(), 3 + 4);
        // Shadow, face and marker
        assert_eq!(scene.fill_count(), 3);
    }
}
