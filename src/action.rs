use std::time::Instant;
use rand::Rng;
use super::{
    tile::{Tile, TileColor, Orientation},
    tile_view::TileView,
};

/// An edit which can be applied to the selected tiles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Steps the color forward or places a white tile
    ColorUp,
    /// Steps the color backward or places a black tile
    ColorDown,
    RandomColor,
    /// Swaps black and white
    Invert,
    /// Places a tile of the given color
    SetColor(TileColor),
    OrientationUp,
    OrientationDown,
    RandomOrientation,
    /// Picks Odd or Even for tiles which already have lines
    RandomNonBlankOrientation,
    RemoveOrientation,
    /// Starts fading the tile out
    Disable,
}

impl Action {
    /// Applies the edit to a single tile, returns true if the tile was touched
    ///
    /// # Parameters
    ///
    /// tile: The tile to edit
    ///
    /// now: The current time
    ///
    /// rng: The source of randomness for the random edits
    pub fn apply_to_tile<R: Rng + ?Sized>(&self, tile: &mut Tile, now: Instant, rng: &mut R) -> bool {
        match self {
            Self::ColorUp => tile.change_color_up(now),
            Self::ColorDown => tile.change_color_down(now),
            Self::RandomColor => tile.change_to_random_color(now, rng),
            Self::Invert => tile.invert_color(now),
            Self::SetColor(color) => tile.set_color(now, *color),
            Self::OrientationUp | Self::OrientationDown | Self::RandomOrientation | Self::RemoveOrientation => {
                // Lines are only drawn on placed tiles
                if !tile.is_visible() {
                    return false;
                }
                match self {
                    Self::OrientationUp => tile.change_orientation_up(),
                    Self::OrientationDown => tile.change_orientation_down(),
                    Self::RandomOrientation => tile.change_to_random_orientation(rng),
                    _ => tile.remove_orientation(),
                }
            }
            Self::RandomNonBlankOrientation => {
                if !tile.is_visible() || tile.get_orientation() == Orientation::Blank {
                    return false;
                }
                tile.change_to_random_non_blank_orientation(rng);
            }
            Self::Disable => {
                if !tile.is_enabled() {
                    return false;
                }
                tile.start_disabling(now);
            }
        }
        true
    }
}

impl TileView {
    /// Applies an edit to every selected tile. A flood selection is frozen afterwards so it
    /// is kept even though the tiles no longer match the state it was flooded by.
    ///
    /// Returns true if any tile was touched.
    ///
    /// # Parameters
    ///
    /// action: The edit to apply
    ///
    /// now: The current time
    ///
    /// rng: The source of randomness for the random edits
    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, now: Instant, rng: &mut R) -> bool {
        if self.selected_tiles().is_empty() {
            return false;
        }

        let selected = self.selected_tiles().to_vec();
        let mut changed = false;
        for id in selected {
            if let Some(tile) = self.tile_mut(id) {
                changed |= action.apply_to_tile(tile, now, rng);
            }
        }

        self.freeze_selection();
        log::trace!("Applied {:?} to the selection, changed: {}", action, changed);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use crate::{
        params::TileParams,
        types::Size,
        view::ViewCoords,
    };

    fn board() -> TileView {
        let mut board = TileView::new(TileParams::new(50.0));
        board.init_view(&ViewCoords::default(), &Size::new(800.0, 600.0));
        board
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let mut board = board();
        let mut rng = StdRng::seed_from_u64(7);

        assert!(!board.apply(Action::ColorUp, Instant::now(), &mut rng));
        assert!(board.tiles().iter().all(|(_, tile)| !tile.is_visible()));
    }

    #[test]
    fn orientation_needs_a_placed_tile() {
        let t0 = Instant::now();
        let mut board = board();
        let mut rng = StdRng::seed_from_u64(7);
        board.find_current_tile(400.0, 300.0);
        board.update_selected();
        let id = board.current_tile().unwrap();

        assert!(!board.apply(Action::OrientationUp, t0, &mut rng));
        assert!(board.apply(Action::SetColor(TileColor::Gray), t0, &mut rng));
        assert!(board.apply(Action::OrientationUp, t0, &mut rng));

        let tile = board.tile(id).unwrap();
        assert_eq!(tile.get_color(), TileColor::Gray);
        assert_eq!(tile.get_orientation(), Orientation::Even);
    }

    #[test]
    fn editing_a_flood_freezes_it() {
        let t0 = Instant::now();
        let mut board = board();
        let mut rng = StdRng::seed_from_u64(7);
        board.find_current_tile(400.0, 300.0);
        board.set_flood(true);
        let flooded = board.selected_tiles().len();

        assert!(board.apply(Action::ColorDown, t0, &mut rng));
        assert!(board.is_selection_frozen());

        // The tiles are black now but the selection stays
        board.update_selected();
        assert_eq!(board.selected_tiles().len(), flooded);
        assert!(board.tiles().iter().all(|(_, tile)| tile.get_color() == TileColor::Black));
    }

    #[test]
    fn disable_skips_disabled_tiles() {
        let t0 = Instant::now();
        let mut board = board();
        let mut rng = StdRng::seed_from_u64(7);
        board.find_current_tile(400.0, 300.0);
        board.update_selected();

        assert!(!board.apply(Action::Disable, t0, &mut rng));
        board.apply(Action::ColorUp, t0, &mut rng);
        assert!(board.apply(Action::Disable, t0, &mut rng));
        assert!(!board.tile(board.current_tile().unwrap()).unwrap().is_enabled());
    }
}
