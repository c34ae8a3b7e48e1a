use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use super::TILE_RADIUS_PIX;

/// The environment variable holding the directory of the tile images
pub const IMAGES_ENV: &str = "HEXTILE_IMAGES";
/// The environment variable holding the resolution of the zoom table
pub const ZOOM_RESOLUTION_ENV: &str = "HEXTILE_ZOOM_RESOLUTION";
/// The largest accepted zoom resolution, the table grows with its square
pub const MAX_ZOOM_RESOLUTION: u32 = 64;

/// The configuration of the application
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// The initial inner size of the window in pixels
    window_size: (u32, u32),
    /// The radius of a tile at zoom 1 in pixels
    tile_radius: f64,
    /// The largest numerator and denominator of the zoom ratios
    zoom_resolution: u32,
    /// The time a pan takes
    pan_duration: Duration,
    /// The time a zoom step takes
    zoom_duration: Duration,
    /// The number of frames per second while animating
    framerate: f64,
    /// The directory holding black.png, grey.png and white.png
    image_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_size: (1280, 800),
            tile_radius: TILE_RADIUS_PIX,
            zoom_resolution: 6,
            pan_duration: Duration::from_millis(300),
            zoom_duration: Duration::from_millis(400),
            framerate: 60.0,
            image_dir: PathBuf::from("images"),
        }
    }
}

impl Settings {
    /// Creates the default settings overridden by the environment
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(dir) = std::env::var(IMAGES_ENV) {
            settings.image_dir = PathBuf::from(dir);
        }

        if let Ok(value) = std::env::var(ZOOM_RESOLUTION_ENV) {
            match value.parse::<u32>() {
                Ok(resolution) => settings.zoom_resolution = resolution,
                Err(error) => log::warn!("Ignoring {}={:?}: {}", ZOOM_RESOLUTION_ENV, value, error),
            }
        }

        settings
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_tile_radius(mut self, radius: f64) -> Self {
        self.tile_radius = radius;
        self
    }

    pub fn with_zoom_resolution(mut self, resolution: u32) -> Self {
        self.zoom_resolution = resolution;
        self
    }

    pub fn with_pan_duration(mut self, duration: Duration) -> Self {
        self.pan_duration = duration;
        self
    }

    pub fn with_zoom_duration(mut self, duration: Duration) -> Self {
        self.zoom_duration = duration;
        self
    }

    pub fn with_framerate(mut self, framerate: f64) -> Self {
        self.framerate = framerate;
        self
    }

    pub fn with_image_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.image_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn get_window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn get_tile_radius(&self) -> f64 {
        self.tile_radius
    }

    pub fn get_zoom_resolution(&self) -> u32 {
        self.zoom_resolution
    }

    pub fn get_pan_duration(&self) -> Duration {
        self.pan_duration
    }

    pub fn get_zoom_duration(&self) -> Duration {
        self.zoom_duration
    }

    pub fn get_framerate(&self) -> f64 {
        self.framerate
    }

    /// Retrieves the time between two frames while animating
    pub fn get_frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.framerate)
    }

    pub fn get_image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Checks that all values can be used
    ///
    /// # Errors
    ///
    /// See SettingsError for the possible errors
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(SettingsError::InvalidWindowSize(self.window_size));
        }
        if !(self.tile_radius.is_finite() && self.tile_radius > 0.0) {
            return Err(SettingsError::InvalidTileRadius(self.tile_radius));
        }
        if self.zoom_resolution == 0 {
            return Err(SettingsError::InvalidZoomResolution(self.zoom_resolution));
        }
        if self.zoom_resolution > MAX_ZOOM_RESOLUTION {
            return Err(SettingsError::ZoomResolutionTooLarge(self.zoom_resolution));
        }
        if !(self.framerate.is_finite() && self.framerate > 0.0) {
            return Err(SettingsError::InvalidFramerate(self.framerate));
        }
        Ok(())
    }
}

/// The error types for invalid settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("The width and height of the window must be larger than 0 but received {:?}", .0)]
    InvalidWindowSize((u32, u32)),
    #[error("The tile radius must be a positive number but received {:?}", .0)]
    InvalidTileRadius(f64),
    #[error("The zoom resolution must be at least 1 but received {:?}", .0)]
    InvalidZoomResolution(u32),
    #[error("The zoom resolution must be at most {} but received {:?}", MAX_ZOOM_RESOLUTION, .0)]
    ZoomResolutionTooLarge(u32),
    #[error("The framerate must be a positive number but received {:?}", .0)]
    InvalidFramerate(f64),
}
