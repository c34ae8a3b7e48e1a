use super::{
    SQRT_3,
    types::{Point, Size, Index},
};

/// The layout of the board: where each row and column of tiles is placed.
///
/// Tiles are flat topped hexagons packed in rows of half a hexagon height.
/// Every other row is shifted by half a column so the rows interlock without gaps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileParams {
    /// The radius of every tile
    radius: f64,
    /// The vertical distance between two rows
    row_height: f64,
    /// The horizontal distance between two tiles in the same row
    col_width: f64,
    /// The horizontal offset of even and odd rows
    col_offset: [f64; 2],
    /// The vertical offset of row 0
    row_offset: f64,
}

impl TileParams {
    /// Creates the layout for tiles of the given radius
    ///
    /// # Parameters
    ///
    /// radius: The distance from the center of a tile to any of its vertices
    pub fn new(radius: f64) -> Self {
        let sin_60_deg = 0.5 * SQRT_3;
        let cos_60_deg = 0.5;
        let row_height = radius * sin_60_deg;

        Self {
            radius,
            row_height,
            col_width: 3.0 * radius,
            col_offset: [radius, 2.0 * radius + radius * cos_60_deg],
            row_offset: 0.5 * row_height,
        }
    }

    /// Retrieves the radius of a tile
    pub fn get_radius(&self) -> f64 {
        self.radius
    }

    /// Retrieves the vertical distance between two rows
    pub fn get_row_height(&self) -> f64 {
        self.row_height
    }

    /// Retrieves the horizontal distance between two tiles in the same row
    pub fn get_col_width(&self) -> f64 {
        self.col_width
    }

    /// Calculates the center of the tile at the given address
    ///
    /// # Parameters
    ///
    /// index: The address of the tile
    pub fn center(&self, index: &Index) -> Point {
        let parity = (index.get_row() & 1) as usize;
        Point::new(
            self.col_width * (index.get_col() as f64) + self.col_offset[parity],
            self.row_height * (index.get_row() as f64) + self.row_offset,
        )
    }

    /// Converts a y-coordinate to a fractional row
    fn rowf(&self, y: f64) -> f64 {
        (y - self.row_offset) / self.row_height
    }

    /// Converts a x-coordinate to a fractional column
    fn colf(&self, x: f64) -> f64 {
        (x - self.col_offset[0]) / self.col_width
    }

    /// Finds all rows with tiles that may overlap the band between begin_y and end_y
    ///
    /// # Parameters
    ///
    /// begin_y: The top of the band
    ///
    /// end_y: The bottom of the band
    pub fn row_range(&self, begin_y: f64, end_y: f64) -> IntRange {
        IntRange::new(
            (self.rowf(begin_y) - 0.5).floor() as i64,
            (self.rowf(end_y) + 0.5).ceil() as i64,
        )
    }

    /// Finds all columns with tiles that may overlap the band between begin_x and end_x
    ///
    /// # Parameters
    ///
    /// begin_x: The left side of the band
    ///
    /// end_x: The right side of the band
    pub fn col_range(&self, begin_x: f64, end_x: f64) -> IntRange {
        IntRange::new(
            (self.colf(begin_x) - 0.5).floor() as i64,
            (self.colf(end_x) + 0.5).ceil() as i64,
        )
    }

    /// Finds the addresses of all tiles which may be seen through a viewport.
    /// The result may include tiles just outside of the view but never misses one inside it.
    ///
    /// # Parameters
    ///
    /// size: The size of the viewport in pixels
    ///
    /// zoom: The zoom factor of the view
    ///
    /// offset: The position of the top left corner of the view on the board
    pub fn tile_range(&self, size: &Size, zoom: f64, offset: &Point) -> TileRange {
        TileRange {
            rows: self.row_range(offset.get_y(), size.get_h() / zoom + offset.get_y()),
            cols: self.col_range(offset.get_x(), size.get_w() / zoom + offset.get_x()),
        }
    }
}

/// An inclusive range of integers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntRange {
    /// The first value
    begin: i64,
    /// The last value
    end: i64,
}

impl IntRange {
    /// Creates a new range, both ends are included
    ///
    /// # Parameters
    ///
    /// begin: The first value
    ///
    /// end: The last value
    pub fn new(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
        }
    }

    pub fn get_begin(&self) -> i64 {
        self.begin
    }

    pub fn get_end(&self) -> i64 {
        self.end
    }

    /// The distance between the first and the last value
    pub fn span(&self) -> i64 {
        self.end - self.begin
    }

    /// The number of values in the range
    pub fn len(&self) -> usize {
        (self.span() + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, value: i64) -> bool {
        self.begin <= value && value <= self.end
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<i64> {
        self.begin..=self.end
    }
}

/// The rows and columns of tiles covering a view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRange {
    pub rows: IntRange,
    pub cols: IntRange,
}

impl TileRange {
    /// The number of tiles in the range
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: &Index) -> bool {
        self.rows.contains(index.get_row()) && self.cols.contains(index.get_col())
    }

    /// Iterates all addresses row by row
    pub fn iter(&self) -> impl Iterator<Item = Index> {
        let cols = self.cols;
        self.rows.iter().flat_map(move |row| cols.iter().map(move |col| Index::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn rows_interlock() {
        let params = TileParams::new(50.0);
        let even = params.center(&Index::new(0, 0));
        let odd = params.center(&Index::new(1, 0));
        let below = params.center(&Index::new(2, 0));

        assert!((odd.get_x() - even.get_x() - 75.0).abs() < EPS);
        assert!((odd.get_y() - even.get_y() - 25.0 * SQRT_3).abs() < EPS);
        assert!((below.get_x() - even.get_x()).abs() < EPS);
        assert!((below.get_y() - even.get_y() - 50.0 * SQRT_3).abs() < EPS);
    }

    #[test]
    fn negative_rows_keep_parity() {
        let params = TileParams::new(10.0);
        let up = params.center(&Index::new(-1, 0));
        let down = params.center(&Index::new(1, 0));

        assert!((up.get_x() - down.get_x()).abs() < EPS);
    }

    #[test]
    fn range_covers_viewport_with_margin() {
        let params = TileParams::new(50.0);
        let range = params.tile_range(&Size::new(800.0, 600.0), 1.0, &Point::new(0.0, 0.0));

        assert_eq!(range.rows, IntRange::new(-1, 14));
        assert_eq!(range.cols, IntRange::new(-1, 6));
        assert_eq!(range.len(), 16 * 8);
        assert_eq!(range.iter().count(), range.len());
    }

    #[test]
    fn zooming_out_widens_range() {
        let params = TileParams::new(50.0);
        let size = Size::new(800.0, 600.0);
        let near = params.tile_range(&size, 2.0, &Point::new(0.0, 0.0));
        let far = params.tile_range(&size, 0.5, &Point::new(0.0, 0.0));

        assert!(far.len() > near.len());
        assert!(far.rows.contains(near.rows.get_end()));
    }
}
