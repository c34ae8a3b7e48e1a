use std::time::Instant;
use rand::Rng;
use super::{
    TILE_ENABLE_DURATION, TILE_DISABLE_DURATION,
    types::{Point, Rect},
    transition::Transition,
};

/// The color of the face of a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileColor {
    Black,
    Gray,
    White,
}

impl TileColor {
    /// All colors in cycling order
    pub const ALL: [TileColor; 3] = [TileColor::Black, TileColor::Gray, TileColor::White];

    /// The color after this one: Black -> Gray -> White -> Black
    pub fn next(self) -> Self {
        match self {
            Self::Black => Self::Gray,
            Self::Gray => Self::White,
            Self::White => Self::Black,
        }
    }

    /// The color before this one: Black -> White -> Gray -> Black
    pub fn prev(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::Gray => Self::Black,
            Self::White => Self::Gray,
        }
    }

    /// The opposite color, gray is its own opposite
    pub fn inverted(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::Gray => Self::Gray,
            Self::White => Self::Black,
        }
    }

    /// Picks a color uniformly at random
    ///
    /// # Parameters
    ///
    /// rng: The source of randomness
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Which set of alternating vertices the cube illusion lines are drawn to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// No lines
    Blank,
    /// Lines to the vertices 1, 3 and 5
    Odd,
    /// Lines to the vertices 0, 2 and 4
    Even,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [Orientation::Blank, Orientation::Odd, Orientation::Even];

    /// Scrolling up: Blank -> Even, Odd <-> Even
    pub fn up(self) -> Self {
        match self {
            Self::Blank => Self::Even,
            Self::Odd => Self::Even,
            Self::Even => Self::Odd,
        }
    }

    /// Scrolling down: Blank -> Odd, Odd <-> Even
    pub fn down(self) -> Self {
        match self {
            Self::Blank => Self::Odd,
            Self::Odd => Self::Even,
            Self::Even => Self::Odd,
        }
    }

    /// The vertex indices the cube illusion lines go to
    pub fn vertex_indices(self) -> &'static [usize] {
        match self {
            Self::Blank => &[],
            Self::Odd => &[1, 3, 5],
            Self::Even => &[0, 2, 4],
        }
    }

    /// Picks an orientation uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Picks Odd or Even uniformly at random
    pub fn random_non_blank<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Odd
        } else {
            Self::Even
        }
    }
}

/// The part of the state of a tile which decides if flood fill spreads across it.
/// Invisible tiles all share the same state no matter what color they had.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FloodState {
    pub visible: bool,
    pub color: TileColor,
    pub orientation: Orientation,
}

impl FloodState {
    /// The state shared by all invisible tiles
    pub const EMPTY: FloodState = FloodState {
        visible: false,
        color: TileColor::White,
        orientation: Orientation::Blank,
    };
}

/// A single hexagonal cell of the board
#[derive(Clone, Debug)]
pub struct Tile {
    /// The color of the face
    color: TileColor,
    /// The cube illusion lines
    orientation: Orientation,
    /// True if the tile is placed (or being placed) on the board
    enabled: bool,
    /// The opacity, fades towards 1 when enabled and towards 0 when disabled
    fade: Transition<f64>,
    /// The center on the board
    center: Point,
    /// The distance from the center to every vertex
    radius: f64,
    /// The six corners, vertex i lies at angle i * 60 degrees
    vertices: [Point; 6],
    /// The bounding box of the vertices
    bounding_box: Rect,
}

impl Tile {
    /// Creates a new disabled tile
    ///
    /// # Parameters
    ///
    /// center: The center on the board
    ///
    /// radius: The distance from the center to every vertex
    pub fn new(center: &Point, radius: f64) -> Self {
        let vertices: [Point; 6] = std::array::from_fn(|i| {
            *center + Point::from_angle((i as f64) * std::f64::consts::FRAC_PI_3) * radius
        });

        // Flat topped: 3 is leftmost, 0 is rightmost, 5 is on top and 1 at the bottom edge
        let bounding_box = Rect::from_corners(
            &Point::new(vertices[3].get_x(), vertices[5].get_y()),
            &Point::new(vertices[0].get_x(), vertices[1].get_y()),
        );

        Self {
            color: TileColor::White,
            orientation: Orientation::Blank,
            enabled: false,
            fade: Transition::new(0.0, 0.0),
            center: *center,
            radius,
            vertices,
            bounding_box,
        }
    }

    pub fn get_color(&self) -> TileColor {
        self.color
    }

    pub fn get_orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Retrieves the current opacity
    pub fn get_alpha(&self) -> f64 {
        self.fade.get_value()
    }

    /// Checks if the tile is fading in or out
    pub fn in_transition(&self) -> bool {
        self.fade.is_active()
    }

    /// A tile is visible while enabled or while fading out
    pub fn is_visible(&self) -> bool {
        self.enabled || self.in_transition()
    }

    pub fn get_center(&self) -> &Point {
        &self.center
    }

    pub fn get_radius(&self) -> f64 {
        self.radius
    }

    pub fn radius_squared(&self) -> f64 {
        self.radius * self.radius
    }

    pub fn get_vertices(&self) -> &[Point; 6] {
        &self.vertices
    }

    pub fn get_bounding_box(&self) -> &Rect {
        &self.bounding_box
    }

    /// Checks if the point lies inside the hexagon
    ///
    /// # Parameters
    ///
    /// point: The point on the board
    pub fn is_point_inside(&self, point: &Point) -> bool {
        if !self.bounding_box.contains(point) {
            return false;
        }

        // Even-odd rule against the closed polygon
        let (x, y) = (point.get_x(), point.get_y());
        let mut inside = false;
        let mut j = self.vertices.len() - 1;
        for i in 0..self.vertices.len() {
            let (xi, yi) = (self.vertices[i].get_x(), self.vertices[i].get_y());
            let (xj, yj) = (self.vertices[j].get_x(), self.vertices[j].get_y());
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Checks if the bounding box overlaps the rectangle
    pub fn is_in_rect(&self, rect: &Rect) -> bool {
        rect.intersects(&self.bounding_box)
    }

    /// Checks if the other tile is close enough to be a neighbour
    ///
    /// # Parameters
    ///
    /// other: The tile to compare with
    pub fn is_neighbour(&self, other: &Tile) -> bool {
        let reach = self.radius + other.radius;
        self.center.square_distance(&other.center) <= reach * reach
    }

    pub fn square_distance_from_vertex(&self, point: &Point, index: usize) -> f64 {
        self.vertices[index].square_distance(point)
    }

    pub fn square_distance_from_center(&self, point: &Point) -> f64 {
        self.center.square_distance(point)
    }

    /// Retrieves the state used to decide if flood fill spreads to this tile
    pub fn get_state_for_flood_fill(&self) -> FloodState {
        if !self.is_visible() {
            return FloodState::EMPTY;
        }
        FloodState {
            visible: true,
            color: self.color,
            orientation: self.orientation,
        }
    }

    /// Advances the fade, must be run every frame before drawing
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn update_alpha(&mut self, now: Instant) {
        self.fade.update(now);
    }

    /// Starts fading in, does nothing if already enabled
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn start_enabling(&mut self, now: Instant) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.fade.retarget(now, TILE_ENABLE_DURATION, 1.0);
        self.update_alpha(now);
    }

    /// Starts fading out, does nothing if already disabled
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn start_disabling(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.fade.retarget(now, TILE_DISABLE_DURATION, 0.0);
        self.update_alpha(now);
    }

    /// Steps the color forward, a disabled tile is instead placed as a white tile
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn change_color_up(&mut self, now: Instant) {
        if !self.enabled {
            if !self.in_transition() {
                self.color = TileColor::White;
                self.orientation = Orientation::Blank;
            }
            self.start_enabling(now);
            return;
        }
        self.color = self.color.next();
    }

    /// Steps the color backward, a disabled tile is instead placed as a black tile
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn change_color_down(&mut self, now: Instant) {
        if !self.enabled {
            if !self.in_transition() {
                self.color = TileColor::Black;
                self.orientation = Orientation::Blank;
            }
            self.start_enabling(now);
            return;
        }
        self.color = self.color.prev();
    }

    /// Swaps black and white, a disabled tile is enabled with its old color
    pub fn invert_color(&mut self, now: Instant) {
        if !self.enabled {
            self.start_enabling(now);
            return;
        }
        self.color = self.color.inverted();
    }

    /// Sets the color and enables the tile, an invisible tile loses its orientation
    pub fn set_color(&mut self, now: Instant, color: TileColor) {
        self.color = color;
        if !self.is_visible() {
            self.orientation = Orientation::Blank;
        }
        self.start_enabling(now);
    }

    pub fn change_to_random_color<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        self.color = TileColor::random(rng);
        if !self.enabled {
            self.start_enabling(now);
        }
    }

    pub fn change_orientation_up(&mut self) {
        self.orientation = self.orientation.up();
    }

    pub fn change_orientation_down(&mut self) {
        self.orientation = self.orientation.down();
    }

    pub fn remove_orientation(&mut self) {
        self.orientation = Orientation::Blank;
    }

    pub fn change_to_random_orientation<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.orientation = Orientation::random(rng);
    }

    pub fn change_to_random_non_blank_orientation<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.orientation = Orientation::random_non_blank(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    fn tile() -> Tile {
        Tile::new(&Point::new(100.0, 100.0), 50.0)
    }

    #[test]
    fn geometry_of_a_flat_topped_hexagon() {
        let tile = tile();
        let vertices = tile.get_vertices();
        let half_height = 25.0 * crate::SQRT_3;

        assert!((vertices[0].get_x() - 150.0).abs() < 1e-9);
        assert!((vertices[3].get_x() - 50.0).abs() < 1e-9);
        assert!((vertices[1].get_y() - (100.0 + half_height)).abs() < 1e-9);

        let bounding_box = tile.get_bounding_box();
        assert!((bounding_box.min_x() - 50.0).abs() < 1e-9);
        assert!((bounding_box.max_x() - 150.0).abs() < 1e-9);
        assert!((bounding_box.min_y() - (100.0 - half_height)).abs() < 1e-9);
        assert!((bounding_box.max_y() - (100.0 + half_height)).abs() < 1e-9);
    }

    #[test]
    fn point_inside_rejects_box_corners() {
        let tile = tile();

        assert!(tile.is_point_inside(&Point::new(100.0, 100.0)));
        assert!(tile.is_point_inside(&Point::new(145.0, 100.0)));
        // Inside the bounding box but outside the slanted edge
        assert!(!tile.is_point_inside(&Point::new(55.0, 60.0)));
        assert!(!tile.is_point_inside(&Point::new(200.0, 100.0)));
    }

    #[test]
    fn enabling_converges_to_opaque() {
        let t0 = Instant::now();
        let mut tile = tile();
        tile.start_enabling(t0);
        assert!(tile.is_visible());
        assert_eq!(tile.get_alpha(), 0.0);

        tile.update_alpha(t0 + MS * 125);
        assert!(tile.get_alpha() > 0.0 && tile.get_alpha() < 1.0);
        assert!(tile.in_transition());

        tile.update_alpha(t0 + MS * 251);
        assert_eq!(tile.get_alpha(), 1.0);
        assert!(!tile.in_transition());
    }

    #[test]
    fn enabling_twice_keeps_the_first_transition() {
        let t0 = Instant::now();
        let mut tile = tile();
        tile.start_enabling(t0);
        tile.start_enabling(t0 + MS * 200);

        tile.update_alpha(t0 + MS * 250);
        assert_eq!(tile.get_alpha(), 1.0);
    }

    #[test]
    fn disabling_mid_fade_starts_from_partial_alpha() {
        let t0 = Instant::now();
        let mut tile = tile();
        tile.start_enabling(t0);
        tile.update_alpha(t0 + MS * 100);
        let partial = tile.get_alpha();

        tile.start_disabling(t0 + MS * 100);
        assert!((tile.get_alpha() - partial).abs() < 1e-9);
        assert!(tile.is_visible());
        assert!(!tile.is_enabled());

        tile.update_alpha(t0 + MS * 200);
        assert!(tile.get_alpha() < partial);

        tile.update_alpha(t0 + MS * 900);
        assert_eq!(tile.get_alpha(), 0.0);
        assert!(!tile.is_visible());
    }

    #[test]
    fn colors_cycle_white_black_gray() {
        assert_eq!(TileColor::White.next(), TileColor::Black);
        assert_eq!(TileColor::Black.next(), TileColor::Gray);
        assert_eq!(TileColor::Gray.next(), TileColor::White);
        for color in TileColor::ALL {
            assert_eq!(color.next().prev(), color);
            assert_eq!(color.inverted().inverted(), color);
        }
    }

    #[test]
    fn first_color_change_places_a_blank_tile() {
        let t0 = Instant::now();
        let mut tile = tile();
        tile.change_orientation_up();
        tile.change_color_down(t0);

        assert!(tile.is_enabled());
        assert_eq!(tile.get_color(), TileColor::Black);
        assert_eq!(tile.get_orientation(), Orientation::Blank);

        tile.change_color_down(t0);
        assert_eq!(tile.get_color(), TileColor::White);
    }

    #[test]
    fn orientation_steps() {
        assert_eq!(Orientation::Blank.up(), Orientation::Even);
        assert_eq!(Orientation::Blank.down(), Orientation::Odd);
        assert_eq!(Orientation::Odd.up(), Orientation::Even);
        assert_eq!(Orientation::Even.down(), Orientation::Odd);
    }

    #[test]
    fn invisible_tiles_share_one_flood_state() {
        let t0 = Instant::now();
        let mut black = tile();
        black.change_color_down(t0);
        black.start_disabling(t0);
        black.update_alpha(t0 + MS * 1000);

        assert_eq!(black.get_state_for_flood_fill(), tile().get_state_for_flood_fill());
        assert_eq!(black.get_state_for_flood_fill(), FloodState::EMPTY);
    }

    #[test]
    fn neighbour_reach_is_two_radii() {
        let a = Tile::new(&Point::new(0.0, 0.0), 1.0);
        let b = Tile::new(&Point::new(2.0, 0.0), 1.0);
        let c = Tile::new(&Point::new(2.01, 0.0), 1.0);

        assert!(a.is_neighbour(&b));
        assert!(!a.is_neighbour(&c));
    }
}
