use proptest::prelude::*;
use tower_march_core::{CellContent, CellCoord, SimulationConfig};
use tower_march_simulation::{advance, new_world, place_entity, query, World};

fn assert_occupancy(world: &World) {
    let entities = query::entity_view(world);
    let board = query::board(world);
    let (columns, rows) = board.dimensions();

    for snapshot in &entities {
        assert_eq!(
            query::get_object(world, snapshot.cell),
            CellContent::Occupied(snapshot.id)
        );
        assert_eq!(query::get_location(world, snapshot.id), Some(snapshot.cell));
        assert!(!query::is_destroyed(world, snapshot.id));
    }

    let mut occupied = 0;
    for column in 0..columns {
        for row in 0..rows {
            let cell = CellCoord::new(
                i32::try_from(column).expect("small board"),
                i32::try_from(row).expect("small board"),
            );
            if let CellContent::Occupied(entity) = query::get_object(world, cell) {
                occupied += 1;
                assert_eq!(query::get_location(world, entity), Some(cell));
            }
        }
    }
    assert_eq!(occupied, entities.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn occupancy_holds_across_random_games(
        seed in any::<u64>(),
        columns in 2u32..8,
        rows in 3u32..10,
        num_waves in 1usize..4,
        placements in proptest::collection::vec((0i32..8, 0i32..10, 0u32..40), 0..12),
    ) {
        let config = SimulationConfig {
            seed,
            columns,
            rows,
            num_waves,
            starting_points: 30,
            ..SimulationConfig::default()
        };
        let mut world = new_world(config).expect("valid config");

        for tick in 0..40u32 {
            for &(column, row, at) in &placements {
                if at == tick {
                    let _ = place_entity(&mut world, CellCoord::new(column, row));
                    assert_occupancy(&world);
                }
            }
            let shoot = tick % 5 != 4;
            world = advance(&world, shoot);
            assert_occupancy(&world);
        }
    }

    #[test]
    fn preview_never_mutates_the_source(seed in any::<u64>(), ticks in 1u32..20) {
        let config = SimulationConfig { seed, ..SimulationConfig::default() };
        let mut world = new_world(config).expect("valid config");
        for _ in 0..ticks {
            world = advance(&world, true);
        }

        let before = query::entity_view(&world);
        let score = query::score(&world);
        let _ = advance(&world, false);

        prop_assert_eq!(query::entity_view(&world), before);
        prop_assert_eq!(query::score(&world), score);
    }
}
