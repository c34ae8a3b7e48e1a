//! Loading of the tile face images.
//!
//! The three faces are packed into the layers of one texture array together with a plain
//! white layer. A face without an image is drawn on the plain layer in its flat color.

use std::path::{Path, PathBuf};
use image::{imageops::FilterType, Rgba, RgbaImage};
use thiserror::Error;
use super::{
    color::{self, Color},
    tile::TileColor,
};

/// The width and height of every layer in pixels
pub const LAYER_SIZE: u32 = 256;
/// The number of layers in the texture array
pub const LAYER_COUNT: u32 = 4;
/// The plain white layer used for flat colors
pub const SOLID_LAYER: u32 = 3;

/// Bytes per pixel of every layer
const BYTES_PER_PIXEL: usize = 4;

/// The images of the three tile faces
#[derive(Clone, Debug, Default)]
pub struct TileImages {
    /// Indexed by layer: black, grey, white
    images: [Option<RgbaImage>; 3],
}

impl TileImages {
    /// Creates a set without any images, every face is drawn in its flat color
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a set from already decoded images
    pub fn from_images(black: Option<RgbaImage>, grey: Option<RgbaImage>, white: Option<RgbaImage>) -> Self {
        Self {
            images: [black, grey, white],
        }
    }

    /// Loads black.png, grey.png and white.png from a directory. Missing files are skipped
    /// with a warning.
    ///
    /// # Parameters
    ///
    /// dir: The directory holding the images
    ///
    /// # Errors
    ///
    /// See TextureError for the possible errors
    pub fn load(dir: &Path) -> Result<Self, TextureError> {
        let black = Self::load_one(&dir.join("black.png"))?;
        let grey = Self::load_one(&dir.join("grey.png"))?;
        let white = Self::load_one(&dir.join("white.png"))?;

        let images = Self::from_images(black, grey, white);
        log::info!(
            "Loaded {} of 3 tile images from {}",
            images.images.iter().filter(|image| image.is_some()).count(),
            dir.display(),
        );
        Ok(images)
    }

    fn load_one(path: &Path) -> Result<Option<RgbaImage>, TextureError> {
        if !path.is_file() {
            log::warn!("Tile image {} not found, using a flat color", path.display());
            return Ok(None);
        }

        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image.to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(TextureError::InvalidDimensions {
                path: path.to_path_buf(),
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Some(image))
    }

    fn layer_index(color: TileColor) -> usize {
        match color {
            TileColor::Black => 0,
            TileColor::Gray => 1,
            TileColor::White => 2,
        }
    }

    /// Checks if the face of the color has an image
    pub fn has_image(&self, color: TileColor) -> bool {
        self.images[Self::layer_index(color)].is_some()
    }

    /// Retrieves the layer a face is drawn with
    pub fn layer_of(&self, color: TileColor) -> u32 {
        if self.has_image(color) {
            Self::layer_index(color) as u32
        } else {
            SOLID_LAYER
        }
    }

    /// Retrieves the color a face is tinted with, white for images and the flat color otherwise
    pub fn tint_of(&self, color: TileColor) -> Color {
        if self.has_image(color) {
            color::TILE_WHITE
        } else {
            Color::for_tile(color)
        }
    }

    /// Builds the pixel data of all layers, each scaled to size x size
    ///
    /// # Parameters
    ///
    /// size: The width and height of a layer
    pub fn layers(&self, size: u32) -> Vec<u8> {
        let layer_len = (size as usize) * (size as usize) * BYTES_PER_PIXEL;
        let mut data = Vec::with_capacity(layer_len * LAYER_COUNT as usize);
        let solid = RgbaImage::from_pixel(size, size, Rgba([255, 255, 255, 255]));

        for image in self.images.iter() {
            match image {
                Some(image) if image.dimensions() == (size, size) => data.extend_from_slice(image.as_raw()),
                Some(image) => data.extend_from_slice(image::imageops::resize(image, size, size, FilterType::Triangle).as_raw()),
                None => data.extend_from_slice(solid.as_raw()),
            }
        }
        data.extend_from_slice(solid.as_raw());

        data
    }
}

/// The error types for when loading the tile images
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Unable to decode {}: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("The image {} has invalid dimensions {}x{}", .path.display(), .width, .height)]
    InvalidDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_faces_use_flat_colors() {
        let images = TileImages::empty();

        assert_eq!(images.layer_of(TileColor::Gray), SOLID_LAYER);
        assert_eq!(images.tint_of(TileColor::Black), color::TILE_BLACK);
        assert_eq!(images.layers(8).len(), 4 * 8 * 8 * 4);
    }

    #[test]
    fn faces_with_images_get_their_own_layer() {
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let images = TileImages::from_images(Some(red), None, None);

        assert_eq!(images.layer_of(TileColor::Black), 0);
        assert_eq!(images.tint_of(TileColor::Black), color::TILE_WHITE);
        assert_eq!(images.layer_of(TileColor::White), SOLID_LAYER);

        let layers = images.layers(4);
        assert_eq!(&layers[0..4], &[255, 0, 0, 255]);
        assert_eq!(&layers[4 * 4 * 4..4 * 4 * 4 + 4], &[255, 255, 255, 255]);
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let images = TileImages::load(Path::new("this/directory/does/not/exist")).unwrap();

        assert!(!images.has_image(TileColor::White));
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("hex_tile_textures_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("grey.png"), b"not a png").unwrap();

        let result = TileImages::load(&dir);
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(result, Err(TextureError::Decode { .. })));
    }
}
