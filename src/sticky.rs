use std::time::Instant;
use super::{
    STICKY_STEP_DURATION,
    types::Point,
    tile::{Tile, Orientation},
};

/// The number of frames of the sticky animation, the middle frame is shown twice
pub const STICKY_STEP_COUNT: usize = 4;

/// A decoration following the cursor which lines up with the cube lines of the hovered tile
#[derive(Clone, Debug, Default)]
pub struct Sticky {
    /// True if the sticky is drawn instead of the cursor
    visible: bool,
    /// True if the direction arrow is drawn
    show_arrow: bool,
    /// The cursor position on the board
    pos: Point,
    /// The vertex the sticky points at, None if it has no direction
    direction: Option<usize>,
    /// True if the cursor is closer to the vertex than to the center
    flip: bool,
    /// The current animation frame
    step_index: usize,
    /// When the animation frame last changed
    last_step: Option<Instant>,
}

impl Sticky {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggles the sticky, returns the new visibility
    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn shows_arrow(&self) -> bool {
        self.show_arrow
    }

    /// Toggles the arrow, returns the new state
    pub fn toggle_arrow(&mut self) -> bool {
        self.show_arrow = !self.show_arrow;
        self.show_arrow
    }

    /// Checks if the direction needs to follow the hovered tile
    pub fn is_tracking(&self) -> bool {
        self.visible || self.show_arrow
    }

    pub fn get_position(&self) -> &Point {
        &self.pos
    }

    /// Moves the sticky
    ///
    /// # Parameters
    ///
    /// pos: The cursor position on the board
    pub fn set_position(&mut self, pos: &Point) {
        self.pos = *pos;
    }

    pub fn get_direction(&self) -> Option<usize> {
        self.direction
    }

    pub fn is_flipped(&self) -> bool {
        self.flip
    }

    pub fn get_step(&self) -> usize {
        self.step_index
    }

    /// Advances the animation frame if enough time has passed since the last step
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn update_step(&mut self, now: Instant) {
        if let Some(last_step) = self.last_step {
            if now.saturating_duration_since(last_step) < STICKY_STEP_DURATION {
                return;
            }
        }
        self.last_step = Some(now);
        self.step_index = (self.step_index + 1) % STICKY_STEP_COUNT;
    }

    /// Points the sticky at the nearest vertex the cube lines of the tile go to.
    ///
    /// Tiles with cube lines on vertices 0, 2 and 4 are aimed at the vertices 1, 3 and 5 and
    /// the other way around. Tiles without lines, invisible tiles and positions further than
    /// a tile diameter from every candidate vertex leave the sticky without a direction.
    ///
    /// # Parameters
    ///
    /// tile: The hovered tile
    pub fn adjust_direction(&mut self, tile: &Tile) {
        self.direction = None;
        if !tile.is_visible() {
            return;
        }
        let candidates: [usize; 3] = match tile.get_orientation() {
            Orientation::Even => [1, 3, 5],
            Orientation::Odd => [0, 2, 4],
            Orientation::Blank => return,
        };

        let mut min_distance = 4.0 * tile.radius_squared();
        let mut nearest = None;
        for vertex in candidates {
            let distance = tile.square_distance_from_vertex(&self.pos, vertex);
            if distance <= min_distance {
                min_distance = distance;
                nearest = Some(vertex);
            }
        }

        if let Some(vertex) = nearest {
            self.direction = Some(vertex);
            self.flip = min_distance <= tile.square_distance_from_center(&self.pos);
        }
    }

    /// Rotates the direction by a number of vertices, does nothing without a direction
    ///
    /// # Parameters
    ///
    /// steps: The number of vertices to rotate by, positive is clockwise on the screen
    pub fn rotate(&mut self, steps: i32) {
        if let Some(direction) = self.direction {
            self.direction = Some((direction as i32 + steps).rem_euclid(6) as usize);
        }
    }

    /// The unit vector the sticky points along, None without a direction
    pub fn direction_vector(&self) -> Option<Point> {
        let direction = self.direction?;
        let angle = std::f64::consts::FRAC_PI_2 + std::f64::consts::FRAC_PI_3 * direction as f64;
        let vector = Point::from_angle(angle);
        Some(if self.flip { vector } else { -vector })
    }

    /// The direction vector rotated a quarter turn
    pub fn normal_vector(&self) -> Option<Point> {
        self.direction_vector().map(|vector| vector.rotate_90())
    }
}
