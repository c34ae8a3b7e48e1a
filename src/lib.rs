pub mod types;
pub mod color;
pub mod params;
pub mod transition;
pub mod tile;
pub mod tile_set;
pub mod view;
pub mod zoom;
pub mod tile_view;
pub mod action;
pub mod sticky;
pub mod focus;
pub mod settings;
pub mod textures;
pub mod scene;
pub mod render;
pub mod gpu_tiles;
pub mod controls;
pub mod application;

use std::time::Duration;

const SQRT_3: f64 = 1.7320508075688772935274463415058723669428052538103806280558069794;

/// The length of a physical tile edge in millimeters
pub const TILE_EDGE_MM: f64 = 82.0;
/// The gap between two physical tiles in millimeters
pub const TILE_SEPARATION_MM: f64 = 3.5;
/// The scale from millimeters to pixels at zoom 1
pub const PIX_PER_MM: f64 = 0.5;
/// The default radius of a tile in pixels
pub const TILE_RADIUS_PIX: f64 = (TILE_EDGE_MM + TILE_SEPARATION_MM / 2.0) * PIX_PER_MM;
/// The width of the outline drawn around a tile in pixels
pub const LINE_WIDTH_PIX: f64 = TILE_SEPARATION_MM * PIX_PER_MM;

/// The time it takes for a tile to fade in
pub const TILE_ENABLE_DURATION: Duration = Duration::from_millis(250);
/// The time it takes for a tile to fade out, slower than fading in
pub const TILE_DISABLE_DURATION: Duration = Duration::from_millis(750);
/// The time between two frames of the sticky animation
pub const STICKY_STEP_DURATION: Duration = Duration::from_millis(200);
