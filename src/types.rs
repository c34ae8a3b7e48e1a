use std::ops::{Mul, Div, Add, Sub, Neg};

/// A 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    /// The x-coordinate
    x: f64,
    /// The y-coordinate
    y: f64,
}

impl Point {
    /// Creates a new point
    ///
    /// # Parameters
    ///
    /// x: The x-coordinate
    ///
    /// y: The y-coordinate
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
        }
    }

    /// Creates the unit vector pointing in the direction of angle
    ///
    /// # Parameters
    ///
    /// angle: The angle in radians measured from the x-axis towards the y-axis
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Retrieves the x-coordinate
    pub fn get_x(&self) -> f64 {
        self.x
    }

    /// Retrieves the y-coordinate
    pub fn get_y(&self) -> f64 {
        self.y
    }

    /// Retrieves the data for the gpu
    pub fn get_data(&self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }

    /// Calculates the squared distance to another point
    ///
    /// # Parameters
    ///
    /// other: The point to measure the distance to
    pub fn square_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Rotates the point 90 degrees counter clockwise around origo
    pub fn rotate_90(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Rotates the point around origo
    ///
    /// # Parameters
    ///
    /// angle: The angle in radians, positive turns the x-axis towards the y-axis
    pub fn rotate(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Converts it to a size
    pub fn to_size(&self) -> Size {
        Size::new(self.x, self.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<f64> for &Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Self::Output {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Div<f64> for &Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Self::Output {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// A 2D size of width and height which are both non-negative
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    /// The width
    w: f64,
    /// The height
    h: f64,
}

impl Size {
    /// Creates a new size, if any of width or height are negative their signs are flipped
    ///
    /// # Parameters
    ///
    /// w: The width
    ///
    /// h: The height
    pub fn new(w: f64, h: f64) -> Self {
        Self {
            w: w.abs(),
            h: h.abs(),
        }
    }

    /// Retrieves the width
    pub fn get_w(&self) -> f64 {
        self.w
    }

    /// Retrieves the height
    pub fn get_h(&self) -> f64 {
        self.h
    }

    /// Converts it to a point
    pub fn to_point(&self) -> Point {
        Point::new(self.w, self.h)
    }
}

impl Mul<f64> for Size {
    type Output = Size;

    fn mul(self, rhs: f64) -> Self::Output {
        Size::new(self.w * rhs, self.h * rhs)
    }
}

impl Div<f64> for Size {
    type Output = Size;

    fn div(self, rhs: f64) -> Self::Output {
        Size::new(self.w / rhs, self.h / rhs)
    }
}

impl Div<f64> for &Size {
    type Output = Size;

    fn div(self, rhs: f64) -> Self::Output {
        Size::new(self.w / rhs, self.h / rhs)
    }
}

/// The address of a tile in the offset layout of the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Index {
    /// The row, every other row is shifted half a column
    row: i64,
    /// The column
    col: i64,
}

impl Index {
    /// Creates a new index
    ///
    /// # Parameters
    ///
    /// row: The row
    ///
    /// col: The column
    pub const fn new(row: i64, col: i64) -> Self {
        Self {
            row,
            col,
        }
    }

    /// Retrieves the row
    pub fn get_row(&self) -> i64 {
        self.row
    }

    /// Retrieves the column
    pub fn get_col(&self) -> i64 {
        self.col
    }
}

/// An axis aligned rectangle given by its top left corner and its size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// The top left corner
    origin: Point,
    /// The size of the rectangle
    size: Size,
}

impl Rect {
    /// Creates a new rectangle
    ///
    /// # Parameters
    ///
    /// origin: The corner with the smallest coordinates
    ///
    /// size: The size of the rectangle
    pub fn new(origin: &Point, size: &Size) -> Self {
        Self {
            origin: *origin,
            size: *size,
        }
    }

    /// Creates the smallest rectangle containing both corners
    ///
    /// # Parameters
    ///
    /// a: The first corner
    ///
    /// b: The opposite corner
    pub fn from_corners(a: &Point, b: &Point) -> Self {
        let origin = Point::new(a.x.min(b.x), a.y.min(b.y));
        let size = Size::new(b.x - a.x, b.y - a.y);
        Self::new(&origin, &size)
    }

    /// Retrieves the top left corner
    pub fn get_origin(&self) -> &Point {
        &self.origin
    }

    /// Retrieves the size
    pub fn get_size(&self) -> &Size {
        &self.size
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.w
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.h
    }

    /// Retrieves the center of the rectangle
    pub fn get_center(&self) -> Point {
        Point::new(self.origin.x + self.size.w * 0.5, self.origin.y + self.size.h * 0.5)
    }

    /// Checks if a point lies inside the rectangle, the border counts as inside
    ///
    /// # Parameters
    ///
    /// point: The point to check
    pub fn contains(&self, point: &Point) -> bool {
        self.min_x() <= point.x && point.x <= self.max_x() &&
        self.min_y() <= point.y && point.y <= self.max_y()
    }

    /// Checks if the two rectangles overlap, rectangles only sharing a border do not
    ///
    /// # Parameters
    ///
    /// other: The other rectangle
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x() && other.min_x() < self.max_x() &&
        self.min_y() < other.max_y() && other.min_y() < self.max_y()
    }

    /// Returns a rectangle grown by margin on all four sides
    ///
    /// # Parameters
    ///
    /// margin: The amount to grow each side by
    pub fn inflate(&self, margin: f64) -> Self {
        let origin = Point::new(self.origin.x - margin, self.origin.y - margin);
        let size = Size::new(self.size.w + 2.0 * margin, self.size.h + 2.0 * margin);
        Self::new(&origin, &size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersection_excludes_shared_border() {
        let a = Rect::new(&Point::new(0.0, 0.0), &Size::new(10.0, 10.0));
        let b = Rect::new(&Point::new(10.0, 0.0), &Size::new(5.0, 5.0));
        let c = Rect::new(&Point::new(9.0, 9.0), &Size::new(5.0, 5.0));

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
        assert!(a.inflate(1.0).intersects(&b));
    }

    #[test]
    fn rect_from_corners_normalizes() {
        let rect = Rect::from_corners(&Point::new(4.0, -2.0), &Point::new(-1.0, 3.0));

        assert_eq!(*rect.get_origin(), Point::new(-1.0, -2.0));
        assert_eq!(*rect.get_size(), Size::new(5.0, 5.0));
        assert!(rect.contains(&Point::new(0.0, 0.0)));
        assert!(!rect.contains(&Point::new(5.0, 0.0)));
    }

    #[test]
    fn size_is_never_negative() {
        let size = Size::new(-3.0, 4.0);
        assert_eq!(size.get_w(), 3.0);
        assert_eq!((size * -2.0).get_h(), 8.0);
    }
}
