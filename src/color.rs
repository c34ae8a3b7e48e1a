use super::tile::TileColor;

/// Describes a rgba color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    /// The red component
    pub r: f32,
    /// The green component
    pub g: f32,
    /// The blue component
    pub b: f32,
    /// The alpha component
    pub a: f32,
}

/// The flat color of a white tile when no image is loaded
pub const TILE_WHITE: Color = Color::new_gray(1.0, 1.0);
/// The flat color of a gray tile when no image is loaded
pub const TILE_GRAY: Color = Color::new_gray(96.0 / 255.0, 1.0);
/// The flat color of a black tile when no image is loaded
pub const TILE_BLACK: Color = Color::new_gray(2.0 / 255.0, 1.0);
/// The color of the lines drawn on a tile
pub const TILE_LINE: Color = Color::new_gray(20.0 / 255.0, 1.0);
/// The color of the shadow under a tile
pub const TILE_SHADOW: Color = Color::new_gray(0.0, 128.0 / 255.0);
/// The color behind the board
pub const BACKGROUND: Color = Color::new_gray(128.0 / 255.0, 1.0);

impl Color {
    /// Creates a new rgba color
    ///
    /// # Parameters
    ///
    /// r: The red component
    ///
    /// g: The green component
    ///
    /// b: The blue component
    ///
    /// a: The alpha component
    pub const fn new_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a,
        }
    }

    /// Creates a new rgb color with a = 1
    pub const fn new_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new_rgba(r, g, b, 1.0)
    }

    /// Creates a new gray scale color, all color components are equal
    ///
    /// # Parameters
    ///
    /// g: The value of all the color components
    ///
    /// a: The alpha component
    pub const fn new_gray(g: f32, a: f32) -> Self {
        Self::new_rgba(g, g, g, a)
    }

    /// Creates a color from 8 bit components
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new_rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Retrieves the flat color used for a tile of the given color
    ///
    /// # Parameters
    ///
    /// color: The color of the tile
    pub const fn for_tile(color: TileColor) -> Self {
        match color {
            TileColor::White => TILE_WHITE,
            TileColor::Gray => TILE_GRAY,
            TileColor::Black => TILE_BLACK,
        }
    }

    /// Returns the same color with the alpha component scaled
    ///
    /// # Parameters
    ///
    /// alpha: The factor to multiply the alpha component by
    pub fn fade(&self, alpha: f64) -> Self {
        Self::new_rgba(self.r, self.g, self.b, self.a * (alpha.clamp(0.0, 1.0) as f32))
    }

    /// Blends two colors component wise, alpha = 0 gives self
    ///
    /// # Parameters
    ///
    /// other: The color to blend towards
    ///
    /// alpha: The fraction of other in the result
    pub fn mix(&self, other: &Color, alpha: f64) -> Self {
        let alpha = alpha.clamp(0.0, 1.0) as f32;
        let beta = 1.0 - alpha;
        Self::new_rgba(
            self.r * beta + other.r * alpha,
            self.g * beta + other.g * alpha,
            self.b * beta + other.b * alpha,
            self.a * beta + other.a * alpha,
        )
    }

    /// Converts to 8 bit components
    pub fn to_rgba8(&self) -> [u8; 4] {
        let convert = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [convert(self.r), convert(self.g), convert(self.b), convert(self.a)]
    }

    /// Converts to the color type used when clearing the screen
    pub fn to_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// Retrieves the data for the gpu
    pub fn get_data(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_bit_round_trip_for_tile_colors() {
        assert_eq!(TILE_GRAY.to_rgba8(), [96, 96, 96, 255]);
        assert_eq!(Color::for_tile(TileColor::Black).to_rgba8(), [2, 2, 2, 255]);
    }

    #[test]
    fn fade_and_mix() {
        let faded = TILE_WHITE.fade(0.5);
        assert_eq!(faded.a, 0.5);
        assert_eq!(faded.r, 1.0);

        let mixed = TILE_BLACK.mix(&TILE_WHITE, 1.0);
        assert_eq!(mixed, TILE_WHITE);
    }
}
