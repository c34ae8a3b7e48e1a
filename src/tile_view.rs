use std::{
    collections::{HashSet, VecDeque},
    time::{Duration, Instant},
};
use super::{
    types::{Point, Size},
    params::TileParams,
    tile::Tile,
    tile_set::{TileId, TileSet},
    transition::{LinearTransition, ease_in_out_sine},
    view::ViewCoords,
};

/// The board as seen through a moving and zooming viewport.
///
/// Only tiles the viewport has covered exist. New tiles are created when a pan or zoom
/// starts so they are ready while the view glides towards its target, and tiles which are
/// out of sight and not placed are dropped again once the view comes to rest.
#[derive(Debug)]
pub struct TileView {
    /// The view currently shown
    view: ViewCoords,
    /// The view a running pan or zoom started from
    prev_view: ViewCoords,
    /// The view a running pan or zoom ends at
    next_view: ViewCoords,
    /// The size of the viewport in pixels
    view_size: Size,
    /// The progress of a running pan or zoom
    view_trans: LinearTransition,
    /// The layout of the board
    params: TileParams,
    /// All materialized tiles
    tiles: TileSet,
    /// The tile under the cursor
    current_tile: Option<TileId>,
    /// The tile under the cursor at the previous lookup
    previous_tile: Option<TileId>,
    /// True if the selection floods to similar neighbours
    enable_flood: bool,
    /// True if the flood selection should not follow the cursor
    freeze_selection: bool,
    /// The tiles edits are applied to
    selected_tiles: Vec<TileId>,
    /// The tiles which overlap the viewport
    viewable_tiles: Vec<TileId>,
    /// The last cursor position in pixels
    cursor: Point,
    /// Set when the hovered tile changes, cleared when read
    hover_changed: bool,
}

impl TileView {
    /// Creates an empty board
    ///
    /// # Parameters
    ///
    /// params: The layout of the board
    pub fn new(params: TileParams) -> Self {
        let view = ViewCoords::default();
        Self {
            view,
            prev_view: view,
            next_view: view,
            view_size: Size::new(0.0, 0.0),
            view_trans: LinearTransition::default(),
            params,
            tiles: TileSet::new(),
            current_tile: None,
            previous_tile: None,
            enable_flood: false,
            freeze_selection: false,
            selected_tiles: Vec::new(),
            viewable_tiles: Vec::new(),
            cursor: Point::new(0.0, 0.0),
            hover_changed: false,
        }
    }

    /// Sets the view and creates the first batch of tiles
    ///
    /// # Parameters
    ///
    /// view: The initial view
    ///
    /// size: The size of the viewport in pixels
    pub fn init_view(&mut self, view: &ViewCoords, size: &Size) {
        self.view = *view;
        self.prev_view = *view;
        self.next_view = *view;
        self.view_size = *size;
        self.create_tiles();
    }

    /// Creates every tile covering the current view
    pub fn create_tiles(&mut self) {
        if !self.tiles.is_empty() {
            let view = self.view;
            self.create_missing_tiles(&view);
            return;
        }

        let range = self.params.tile_range(&self.view_size, self.view.get_zoom(), self.view.get_offset());
        self.viewable_tiles.reserve(range.len());
        for index in range.iter() {
            let id = self.tiles.insert_connected(Tile::new(&self.params.center(&index), self.params.get_radius()));
            self.viewable_tiles.push(id);
        }

        log::debug!("Created {} tiles for rows {:?} and columns {:?}", self.tiles.len(), range.rows, range.cols);
    }

    /// Changes the size of the viewport
    ///
    /// # Parameters
    ///
    /// size: The new size in pixels
    pub fn resize_view(&mut self, size: &Size) {
        self.current_tile = None;
        self.view_size = *size;
        let view = self.view;
        self.create_missing_tiles(&view);
        if !self.view_trans.is_active() {
            self.remove_extra_tiles(&view);
        }
    }

    /// Makes sure a tile exists at every address covering the view and that they are all
    /// in the viewable tiles. Tiles already viewable stay viewable.
    ///
    /// # Parameters
    ///
    /// view: The view to cover
    pub fn create_missing_tiles(&mut self, view: &ViewCoords) {
        let range = self.params.tile_range(&self.view_size, view.get_zoom(), view.get_offset());
        let mut created = 0;

        for index in range.iter() {
            let center = self.params.center(&index);
            let existing = self.tiles.find(|tile| {
                tile.square_distance_from_center(&center) < tile.radius_squared()
            });

            match existing {
                Some(id) => {
                    if !self.viewable_tiles.contains(&id) {
                        self.viewable_tiles.push(id);
                    }
                }
                None => {
                    let id = self.tiles.insert_connected(Tile::new(&center, self.params.get_radius()));
                    self.viewable_tiles.push(id);
                    created += 1;
                }
            }
        }

        if created > 0 {
            log::debug!("Created {} tiles, {} in total", created, self.tiles.len());
        }
    }

    /// Drops the tiles which are outside of the view and not placed, and rebuilds the
    /// viewable tiles from the tiles overlapping the view
    ///
    /// # Parameters
    ///
    /// view: The view to keep tiles for
    pub fn remove_extra_tiles(&mut self, view: &ViewCoords) {
        let rect = view.get_view_rect(&self.view_size);
        self.viewable_tiles.clear();

        let mut doomed = Vec::new();
        for (id, tile) in self.tiles.iter() {
            if tile.is_in_rect(&rect) {
                self.viewable_tiles.push(id);
            } else if !tile.is_visible() {
                doomed.push(id);
            }
        }

        for &id in doomed.iter() {
            self.tiles.remove(id);
            if self.current_tile == Some(id) {
                self.current_tile = None;
            }
            if self.previous_tile == Some(id) {
                self.previous_tile = None;
            }
        }
        if !doomed.is_empty() {
            let tiles = &self.tiles;
            self.selected_tiles.retain(|&id| tiles.contains(id));
            log::debug!("Removed {} tiles, {} left", doomed.len(), self.tiles.len());
        }
    }

    /// Starts panning the view
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// duration: The time it takes to reach the new view
    ///
    /// dx: The horizontal distance to move on the board
    ///
    /// dy: The vertical distance to move on the board
    pub fn start_moving(&mut self, now: Instant, duration: Duration, dx: f64, dy: f64) {
        self.prev_view = self.view;
        self.next_view = self.view;
        self.next_view.translate(&Point::new(dx, dy));
        self.start_transition(now, duration);
    }

    /// Starts zooming the view around the cursor
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// duration: The time it takes to reach the new view
    ///
    /// zoom: The zoom to end at
    pub fn start_zooming(&mut self, now: Instant, duration: Duration, zoom: f64) {
        let pivot = self.cursor;
        self.start_zooming_at(now, duration, zoom, &pivot);
    }

    /// Starts zooming the view around a screen position
    ///
    /// # Parameters
    ///
    /// now: The current time
    ///
    /// duration: The time it takes to reach the new view
    ///
    /// zoom: The zoom to end at
    ///
    /// pivot: The screen position which stays fixed
    pub fn start_zooming_at(&mut self, now: Instant, duration: Duration, zoom: f64, pivot: &Point) {
        self.prev_view = self.view;
        self.next_view = self.view;
        self.next_view.set_zoom_with_offset(zoom, pivot);
        self.start_transition(now, duration);
    }

    fn start_transition(&mut self, now: Instant, duration: Duration) {
        let next_view = self.next_view;
        self.create_missing_tiles(&next_view);
        log::trace!("View heading to zoom {} at {:?}", next_view.get_zoom(), next_view.get_offset());
        self.view_trans.stop().start(now, duration);
    }

    /// Advances the view and the fades of all tiles, must be run once per frame.
    ///
    /// Returns true if the view moved.
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn update(&mut self, now: Instant) -> bool {
        for tile in self.tiles.tiles_mut() {
            tile.update_alpha(now);
        }

        if !self.view_trans.is_active() {
            return false;
        }

        if self.view_trans.update(now) {
            let alpha = ease_in_out_sine(self.view_trans.get_value());
            self.view = ViewCoords::blend(&self.prev_view, &self.next_view, alpha);
        } else {
            self.view = self.next_view;
            self.prev_view = self.next_view;
            let view = self.view;
            self.remove_extra_tiles(&view);
        }

        let cursor = self.cursor;
        self.find_current_tile(cursor.get_x(), cursor.get_y());
        true
    }

    /// Checks if the view is gliding towards a new view
    pub fn is_moving(&self) -> bool {
        self.view_trans.is_active()
    }

    /// Checks if anything on the board is animating
    pub fn is_animating(&self) -> bool {
        self.is_moving() || self.tiles.iter().any(|(_, tile)| tile.in_transition())
    }

    /// Finds the tile at a screen position
    ///
    /// # Parameters
    ///
    /// x: The x-coordinate in pixels
    ///
    /// y: The y-coordinate in pixels
    pub fn find_tile(&self, x: f64, y: f64) -> Option<TileId> {
        let point = self.view.screen_to_tile(&Point::new(x, y));

        if let Some(id) = self.current_tile {
            if self.tiles.get(id).map_or(false, |tile| tile.is_point_inside(&point)) {
                return Some(id);
            }
        }

        self.tiles.find(|tile| tile.is_point_inside(&point))
    }

    /// Moves the focus to the tile under the cursor
    ///
    /// # Parameters
    ///
    /// x: The x-coordinate of the cursor in pixels
    ///
    /// y: The y-coordinate of the cursor in pixels
    pub fn find_current_tile(&mut self, x: f64, y: f64) {
        self.cursor = Point::new(x, y);
        self.current_tile = self.find_tile(x, y);

        if let Some(current) = self.current_tile {
            if self.current_tile != self.previous_tile {
                if self.enable_flood && self.freeze_selection && !self.selected_tiles.contains(&current) {
                    self.freeze_selection = false;
                }
                if !self.enable_flood || !self.freeze_selection {
                    self.hover_changed = true;
                }
            }
        }

        self.previous_tile = self.current_tile;
    }

    /// Drops the focus, used when the cursor leaves the window
    pub fn clear_current_tile(&mut self) {
        self.current_tile = None;
        self.previous_tile = None;
    }

    /// Recomputes which tiles edits are applied to
    pub fn update_selected(&mut self) {
        if !self.enable_flood {
            self.selected_tiles.clear();
            if let Some(current) = self.current_tile {
                self.selected_tiles.push(current);
            }
        } else if !self.freeze_selection {
            self.select_similar_neighbours(self.current_tile);
        }
    }

    /// Selects the tiles reachable from a tile through neighbours with the same flood state,
    /// in the order they are discovered. Selects nothing if there is no tile.
    ///
    /// # Parameters
    ///
    /// from: The tile to start from
    pub fn select_similar_neighbours(&mut self, from: Option<TileId>) {
        self.selected_tiles.clear();

        let from = match from {
            Some(from) => from,
            None => return,
        };
        let state = match self.tiles.get(from) {
            Some(tile) => tile.get_state_for_flood_fill(),
            None => return,
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        self.selected_tiles.push(from);

        while let Some(id) = queue.pop_front() {
            for &next in self.tiles.neighbours(id) {
                if !visited.insert(next) {
                    continue;
                }
                let same = self.tiles.get(next).map_or(false, |tile| tile.get_state_for_flood_fill() == state);
                if same {
                    self.selected_tiles.push(next);
                    queue.push_back(next);
                }
            }
        }
    }

    /// Turns flooding of the selection on or off
    ///
    /// # Parameters
    ///
    /// enable: True if the selection should flood to similar neighbours
    pub fn set_flood(&mut self, enable: bool) {
        if self.enable_flood == enable {
            return;
        }
        self.enable_flood = enable;
        self.freeze_selection = false;
        self.update_selected();
    }

    /// Keeps the flood selection until the cursor leaves it
    pub fn freeze_selection(&mut self) {
        if self.enable_flood {
            self.freeze_selection = true;
        }
    }

    pub fn is_selection_frozen(&self) -> bool {
        self.freeze_selection
    }

    /// Returns true once after every change of the hovered tile
    pub fn take_hover_changed(&mut self) -> bool {
        std::mem::take(&mut self.hover_changed)
    }

    /// Retrieves the view currently shown
    pub fn get_view(&self) -> &ViewCoords {
        &self.view
    }

    pub fn get_view_size(&self) -> &Size {
        &self.view_size
    }

    pub fn get_params(&self) -> &TileParams {
        &self.params
    }

    /// Retrieves the last cursor position in pixels
    pub fn get_cursor(&self) -> &Point {
        &self.cursor
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id)
    }

    pub fn viewable_tiles(&self) -> &[TileId] {
        &self.viewable_tiles
    }

    pub fn selected_tiles(&self) -> &[TileId] {
        &self.selected_tiles
    }

    pub fn current_tile(&self) -> Option<TileId> {
        self.current_tile
    }

    pub fn previous_tile(&self) -> Option<TileId> {
        self.previous_tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn board() -> TileView {
        let mut board = TileView::new(TileParams::new(50.0));
        board.init_view(&ViewCoords::default(), &Size::new(800.0, 600.0));
        board
    }

    fn screen_center_of(board: &TileView, id: TileId) -> Point {
        let center = *board.tile(id).unwrap().get_center();
        board.get_view().tile_to_screen(&center)
    }

    #[test]
    fn first_batch_matches_range() {
        let board = board();

        assert_eq!(board.tiles().len(), 16 * 8);
        assert_eq!(board.viewable_tiles().len(), 16 * 8);
    }

    #[test]
    fn pan_creates_and_evicts() {
        let t0 = Instant::now();
        let mut board = board();
        let before = board.tiles().len();

        board.start_moving(t0, MS * 100, 600.0, 0.0);
        assert!(board.is_moving());
        assert!(board.tiles().len() > before);

        board.update(t0 + MS * 50);
        assert!(board.get_view().get_offset().get_x() > 0.0);
        assert!(board.get_view().get_offset().get_x() < 600.0);

        board.update(t0 + MS * 100);
        assert!(!board.is_moving());
        assert_eq!(*board.get_view().get_offset(), Point::new(600.0, 0.0));

        let rect = board.get_view().get_view_rect(board.get_view_size());
        for (id, tile) in board.tiles().iter() {
            assert_eq!(board.viewable_tiles().contains(&id), tile.is_in_rect(&rect));
        }
    }

    #[test]
    fn placed_tiles_survive_eviction() {
        let t0 = Instant::now();
        let mut board = board();
        let id = board.find_tile(100.0, 100.0).unwrap();
        board.tile_mut(id).unwrap().change_color_up(t0);

        board.start_moving(t0, MS * 10, 5000.0, 0.0);
        board.update(t0 + MS * 20);

        assert!(board.tiles().contains(id));
        assert!(!board.viewable_tiles().contains(&id));
    }

    #[test]
    fn retargeting_restarts_from_current_view() {
        let t0 = Instant::now();
        let mut board = board();
        board.start_moving(t0, MS * 100, 300.0, 0.0);
        board.update(t0 + MS * 50);
        let mid = *board.get_view();

        board.start_moving(t0 + MS * 50, MS * 100, 0.0, 300.0);
        board.update(t0 + MS * 50);
        assert_eq!(*board.get_view(), mid);

        board.update(t0 + MS * 150);
        let expected = Point::new(mid.get_offset().get_x(), mid.get_offset().get_y() + 300.0);
        assert!(board.get_view().get_offset().square_distance(&expected) < 1e-9);
    }

    #[test]
    fn hover_changes_are_reported_once() {
        let mut board = board();
        board.find_current_tile(100.0, 100.0);
        let first = board.current_tile();

        assert!(first.is_some());
        assert!(board.take_hover_changed());
        assert!(!board.take_hover_changed());

        board.find_current_tile(101.0, 101.0);
        assert_eq!(board.current_tile(), first);
        assert!(!board.take_hover_changed());
    }

    #[test]
    fn plain_selection_follows_cursor() {
        let mut board = board();
        board.update_selected();
        assert!(board.selected_tiles().is_empty());

        board.find_current_tile(400.0, 300.0);
        board.update_selected();
        assert_eq!(board.selected_tiles(), &[board.current_tile().unwrap()]);
    }

    #[test]
    fn flood_over_blank_board_selects_all() {
        let mut board = board();
        board.find_current_tile(400.0, 300.0);
        board.set_flood(true);

        assert_eq!(board.selected_tiles().len(), board.tiles().len());
    }

    #[test]
    fn flood_stops_at_different_tiles() {
        let t0 = Instant::now();
        let mut board = board();
        let id = board.find_tile(400.0, 300.0).unwrap();
        board.tile_mut(id).unwrap().change_color_up(t0);

        board.find_current_tile(400.0, 300.0);
        board.set_flood(true);
        assert_eq!(board.selected_tiles(), &[id]);

        let point = screen_center_of(&board, board.tiles().neighbours(id)[0]);
        board.find_current_tile(point.get_x(), point.get_y());
        board.update_selected();
        assert!(!board.selected_tiles().contains(&id));
        assert_eq!(board.selected_tiles().len(), board.tiles().len() - 1);
    }

    #[test]
    fn flood_from_nothing_clears() {
        let mut board = board();
        board.find_current_tile(400.0, 300.0);
        board.update_selected();
        board.select_similar_neighbours(None);

        assert!(board.selected_tiles().is_empty());
    }

    #[test]
    fn eviction_clears_the_hovered_tile() {
        let mut board = board();
        board.find_current_tile(400.0, 300.0);
        let id = board.current_tile().unwrap();
        assert_eq!(board.previous_tile(), Some(id));

        board.remove_extra_tiles(&ViewCoords::new(1.0, &Point::new(10000.0, 10000.0)));

        assert!(!board.tiles().contains(id));
        assert!(board.current_tile().is_none());
        assert!(board.previous_tile().is_none());
    }

    #[test]
    fn resize_drops_focus_and_covers_new_area() {
        let mut board = board();
        board.find_current_tile(400.0, 300.0);
        board.resize_view(&Size::new(1600.0, 600.0));

        assert!(board.current_tile().is_none());
        let rect = board.get_view().get_view_rect(board.get_view_size());
        let covered = board.tiles().iter().filter(|(_, tile)| tile.is_in_rect(&rect)).count();
        assert_eq!(board.viewable_tiles().len(), covered);
        assert!(board.tiles().len() > 16 * 8);
    }
}
