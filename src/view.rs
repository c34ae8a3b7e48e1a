use super::{
    types::{Point, Size, Rect},
    transition::Interpolate,
};

/// Describes where the camera looks at the board
///
/// A point p on the board is drawn at (p - offset) * zoom on the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewCoords {
    /// The scale from board units to pixels
    zoom: f64,
    /// The position on the board shown in the top left corner of the screen
    offset: Point,
}

impl Default for ViewCoords {
    fn default() -> Self {
        Self::new(1.0, &Point::new(0.0, 0.0))
    }
}

impl ViewCoords {
    /// Creates new view coordinates
    ///
    /// # Parameters
    ///
    /// zoom: The scale from board units to pixels, must be positive
    ///
    /// offset: The position on the board shown in the top left corner
    pub fn new(zoom: f64, offset: &Point) -> Self {
        if cfg!(debug_assertions) && zoom <= 0.0 {
            panic!("The zoom must be positive: {}", zoom);
        }

        Self {
            zoom,
            offset: *offset,
        }
    }

    /// Retrieves the zoom
    pub fn get_zoom(&self) -> f64 {
        self.zoom
    }

    /// Retrieves the offset
    pub fn get_offset(&self) -> &Point {
        &self.offset
    }

    /// Moves the view by a distance on the board
    ///
    /// # Parameters
    ///
    /// delta: The distance to move the offset by
    pub fn translate(&mut self, delta: &Point) {
        self.offset = &self.offset + delta;
    }

    /// Changes the zoom while keeping the board point under the pivot fixed on the screen
    ///
    /// # Parameters
    ///
    /// zoom: The new zoom
    ///
    /// pivot: The screen position which should not move
    pub fn set_zoom_with_offset(&mut self, zoom: f64, pivot: &Point) {
        self.offset = self.offset + pivot / self.zoom - pivot / zoom;
        self.zoom = zoom;
    }

    /// Retrieves the rectangle of the board seen through a viewport
    ///
    /// # Parameters
    ///
    /// size: The size of the viewport in pixels
    pub fn get_view_rect(&self, size: &Size) -> Rect {
        Rect::new(&self.offset, &(size / self.zoom))
    }

    /// Converts a screen position to a position on the board
    pub fn screen_to_tile(&self, point: &Point) -> Point {
        point / self.zoom + self.offset
    }

    /// Converts a position on the board to a screen position
    pub fn tile_to_screen(&self, point: &Point) -> Point {
        (point - &self.offset) * self.zoom
    }

    /// Blends two views componentwise
    ///
    /// # Parameters
    ///
    /// prev: The view at alpha = 0
    ///
    /// next: The view at alpha = 1
    ///
    /// alpha: The blend factor
    pub fn blend(prev: &ViewCoords, next: &ViewCoords, alpha: f64) -> Self {
        let beta = 1.0 - alpha;
        Self {
            zoom: prev.zoom * beta + next.zoom * alpha,
            offset: prev.offset * beta + next.offset * alpha,
        }
    }
}

impl Interpolate for ViewCoords {
    fn interpolate(&self, other: &Self, alpha: f64) -> Self {
        Self::blend(self, other, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut view = ViewCoords::new(1.0, &Point::new(30.0, -20.0));
        let pivot = Point::new(400.0, 300.0);
        let before = view.screen_to_tile(&pivot);

        view.set_zoom_with_offset(2.5, &pivot);
        let after = view.screen_to_tile(&pivot);

        assert!(before.square_distance(&after) < EPS);
        assert_eq!(view.get_zoom(), 2.5);
    }

    #[test]
    fn screen_and_tile_are_inverse() {
        let view = ViewCoords::new(0.75, &Point::new(-12.0, 44.0));
        let point = Point::new(123.0, 456.0);
        let back = view.tile_to_screen(&view.screen_to_tile(&point));

        assert!(back.square_distance(&point) < EPS);
    }

    #[test]
    fn view_rect_scales_with_zoom() {
        let view = ViewCoords::new(2.0, &Point::new(10.0, 20.0));
        let rect = view.get_view_rect(&Size::new(800.0, 600.0));

        assert_eq!(*rect.get_origin(), Point::new(10.0, 20.0));
        assert_eq!(*rect.get_size(), Size::new(400.0, 300.0));
    }

    #[test]
    fn blend_ends() {
        let a = ViewCoords::new(1.0, &Point::new(0.0, 0.0));
        let b = ViewCoords::new(3.0, &Point::new(100.0, -50.0));

        assert_eq!(ViewCoords::blend(&a, &b, 0.0), a);
        assert_eq!(ViewCoords::blend(&a, &b, 1.0), b);
        let mid = a.interpolate(&b, 0.5);
        assert!((mid.get_zoom() - 2.0).abs() < EPS);
        assert!(mid.get_offset().square_distance(&Point::new(50.0, -25.0)) < EPS);
    }
}
