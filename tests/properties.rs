use std::time::{Duration, Instant};
use proptest::prelude::*;
use hex_tile::{
    types::{Index, Point, Size},
    params::TileParams,
    view::ViewCoords,
    zoom::{Ratio, ZoomLevels},
    tile::Tile,
    tile_view::TileView,
};

const MS: Duration = Duration::from_millis(1);

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn pans_keep_the_board_consistent(
        pans in prop::collection::vec((-900.0f64..900.0, -700.0f64..700.0), 1..5),
        hover in (0.0f64..640.0, 0.0f64..480.0),
    ) {
        let t0 = Instant::now();
        let mut board = TileView::new(TileParams::new(40.0));
        board.init_view(&ViewCoords::default(), &Size::new(640.0, 480.0));
        board.find_current_tile(hover.0, hover.1);
        board.update_selected();

        for (step, (dx, dy)) in pans.iter().enumerate() {
            let now = t0 + MS * (100 * step as u32);
            board.start_moving(now, MS * 50, *dx, *dy);
            board.update(now + MS * 60);
        }

        let tiles = board.tiles();
        for id in tiles.ids() {
            for &neighbour in tiles.neighbours(id) {
                prop_assert!(tiles.contains(neighbour));
                prop_assert!(tiles.are_connected(neighbour, id));
            }
        }
        for &id in board.viewable_tiles().iter().chain(board.selected_tiles()) {
            prop_assert!(tiles.contains(id));
        }
        if let Some(id) = board.current_tile() {
            prop_assert!(tiles.contains(id));
        }

        let rect = board.get_view().get_view_rect(board.get_view_size());
        for (id, tile) in tiles.iter() {
            prop_assert_eq!(board.viewable_tiles().contains(&id), tile.is_in_rect(&rect));
        }
    }

    #[test]
    fn zoom_pivot_stays_fixed(
        zoom in 0.1f64..8.0,
        start_zoom in 0.1f64..8.0,
        offset in (-1000.0f64..1000.0, -1000.0f64..1000.0),
        pivot in (0.0f64..1920.0, 0.0f64..1080.0),
    ) {
        let pivot = Point::new(pivot.0, pivot.1);
        let mut view = ViewCoords::new(start_zoom, &Point::new(offset.0, offset.1));
        let before = view.screen_to_tile(&pivot);

        view.set_zoom_with_offset(zoom, &pivot);

        let after = view.screen_to_tile(&pivot);
        prop_assert!(before.square_distance(&after) < 1e-12 * (1.0 + before.square_distance(&Point::new(0.0, 0.0))));
    }

    #[test]
    fn zoom_table_is_sorted_with_one_unit(resolution in 1u32..16) {
        let levels = ZoomLevels::generate(resolution);
        let ratios = levels.ratios();

        prop_assert!(ratios.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(ratios.iter().filter(|&&ratio| ratio == Ratio::new(1, 1)).count(), 1);
        prop_assert_eq!(ratios[levels.default_level()], Ratio::new(1, 1));
        prop_assert_eq!(ratios[0], Ratio::new(1, resolution));
        prop_assert_eq!(ratios[ratios.len() - 1], Ratio::new(resolution, 1));
    }

    #[test]
    fn centers_belong_to_their_own_tile(
        row in -1000i64..1000,
        col in -1000i64..1000,
        radius in 5.0f64..120.0,
    ) {
        let params = TileParams::new(radius);
        let index = Index::new(row, col);
        let tile = Tile::new(&params.center(&index), radius);

        prop_assert!(tile.is_point_inside(&params.center(&index)));
        for other in [Index::new(row, col + 1), Index::new(row + 3, col), Index::new(row - 4, col - 1)] {
            prop_assert!(!tile.is_point_inside(&params.center(&other)));
        }
    }
}
