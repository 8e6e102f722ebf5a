use tower_march_core::{
    BaddieVariant, CellContent, CellCoord, EntityId, EntityKind, EntityState, Facing, Heading,
    PlacementOutcome, SimulationConfig, TurretProfile, TurretVariant, Wave,
};
use tower_march_simulation::{advance, new_world, query, Simulation, World};

fn world_with(config: SimulationConfig) -> World {
    new_world(config).expect("test config is valid")
}

fn default_world() -> World {
    world_with(SimulationConfig::default())
}

fn marcher(world: &mut World, cell: CellCoord, heading: Heading) -> EntityId {
    world.spawn_entity(
        cell,
        EntityKind::Baddie(BaddieVariant::Marching),
        Some(EntityState::Baddie { heading }),
    )
}

fn wall(world: &mut World, cell: CellCoord, facing: Facing) -> EntityId {
    world.spawn_entity(
        cell,
        EntityKind::Turret(TurretProfile::new(TurretVariant::Directional(facing), 2, 6)),
        None,
    )
}

#[test]
fn queued_wave_spawns_on_the_following_tick() {
    let world = world_with(SimulationConfig {
        starting_points: 0,
        ..SimulationConfig::default()
    });

    let first = advance(&world, true);
    assert_eq!(query::tick_index(&first), 1);
    assert_eq!(query::waves(&first).len(), 1);
    assert!(query::board(&first).is_empty());

    let second = advance(&first, true);
    assert_eq!(query::board(&second).len(), 1);
    let spawned = query::entity_view(&second)[0];
    assert_eq!(spawned.cell.row(), 0);
    assert_eq!(spawned.cell.column(), query::waves(&first)[0].column());
    assert_eq!(query::economy(&second).place_turret_points(), 2);
    assert_eq!(query::score(&second), 2);
}

#[test]
fn wave_spawns_on_consecutive_ticks_on_an_open_board() {
    let mut world = default_world();
    world.set_waves(vec![Wave::new(
        5,
        BaddieVariant::Marching,
        Heading::Right,
        0,
    )]);

    let mut counts = Vec::new();
    let mut remaining = Vec::new();
    for _ in 0..5 {
        world = advance(&world, false);
        counts.push(query::board(&world).len());
        remaining.push(query::waves(&world)[0].remaining());
    }

    assert_eq!(counts, vec![1, 2, 3, 4, 5]);
    assert_eq!(remaining[..4], [4, 3, 2, 1]);
    for column in 0..5 {
        assert!(matches!(
            query::get_object(&world, CellCoord::new(column, 0)),
            CellContent::Occupied(_)
        ));
    }
}

#[test]
fn spawn_waits_while_the_spawn_cell_occupant_is_stuck() {
    let mut world = world_with(SimulationConfig {
        columns: 1,
        rows: 2,
        ..SimulationConfig::default()
    });
    let stuck = marcher(&mut world, CellCoord::new(0, 0), Heading::Right);
    let _ = wall(&mut world, CellCoord::new(0, 1), Facing::Down);
    let wave = Wave::new(3, BaddieVariant::Marching, Heading::Left, 0);
    world.set_waves(vec![wave]);

    let next = advance(&world, false);

    assert_eq!(query::get_location(&next, stuck), Some(CellCoord::new(0, 0)));
    assert_eq!(query::waves(&next), &[wave]);
    assert_eq!(query::board(&next).len(), 2);
}

#[test]
fn points_never_accrue_past_one_placement() {
    let mut world = world_with(SimulationConfig {
        starting_points: 0,
        place_turret_cooldown: 4,
        ..SimulationConfig::default()
    });

    for _ in 0..20 {
        world = advance(&world, false);
        assert!(query::economy(&world).place_turret_points() <= 4);
    }
    assert_eq!(query::economy(&world).place_turret_points(), 4);
}

#[test]
fn facing_baddies_with_nowhere_to_go_both_stay() {
    let mut world = default_world();
    let left = marcher(&mut world, CellCoord::new(2, 3), Heading::Right);
    let right = marcher(&mut world, CellCoord::new(3, 3), Heading::Left);
    let _ = wall(&mut world, CellCoord::new(1, 3), Facing::Left);
    let _ = wall(&mut world, CellCoord::new(4, 3), Facing::Right);
    let _ = wall(&mut world, CellCoord::new(2, 4), Facing::Down);
    let _ = wall(&mut world, CellCoord::new(3, 4), Facing::Down);

    let next = advance(&world, false);

    assert_eq!(query::get_location(&next, left), Some(CellCoord::new(2, 3)));
    assert_eq!(query::get_location(&next, right), Some(CellCoord::new(3, 3)));
    assert_eq!(
        query::get_state(&next, left),
        Some(EntityState::Baddie {
            heading: Heading::Left
        })
    );
    assert_eq!(
        query::get_state(&next, right),
        Some(EntityState::Baddie {
            heading: Heading::Right
        })
    );
}

#[test]
fn baddie_follows_into_the_cell_ahead() {
    let mut world = default_world();
    let behind = marcher(&mut world, CellCoord::new(1, 3), Heading::Right);
    let ahead = marcher(&mut world, CellCoord::new(2, 3), Heading::Right);

    let next = advance(&world, false);

    assert_eq!(query::get_location(&next, behind), Some(CellCoord::new(2, 3)));
    assert_eq!(query::get_location(&next, ahead), Some(CellCoord::new(3, 3)));
}

#[test]
fn turret_spent_by_recoil_leaves_the_board() {
    let mut world = default_world();
    let turret = world.spawn_entity(
        CellCoord::new(0, 2),
        EntityKind::Turret(TurretProfile::new(
            TurretVariant::Directional(Facing::Down),
            2,
            6,
        )),
        Some(EntityState::Turret {
            cooldown: 0,
            health: 1,
        }),
    );
    let baddie = marcher(&mut world, CellCoord::new(0, 4), Heading::Left);

    let next = advance(&world, true);

    assert!(query::is_destroyed(&next, baddie));
    assert_eq!(query::destroyer_of(&next, baddie), Some(turret));
    assert!(query::is_destroyed(&next, turret));
    assert_eq!(query::destroyer_of(&next, turret), None);
    assert_eq!(query::get_location(&next, turret), None);
    assert_eq!(query::get_object(&next, CellCoord::new(0, 2)), CellContent::Empty);
    assert_eq!(query::destructions(&next).len(), 2);
    assert!(query::shot_animations(&next)
        .iter()
        .any(|shot| shot.source == turret && shot.target == baddie));
}

#[test]
fn baddie_retaliates_against_adjacent_turret() {
    let mut world = default_world();
    let turret = wall(&mut world, CellCoord::new(2, 5), Facing::Down);
    let baddie = marcher(&mut world, CellCoord::new(1, 4), Heading::Right);

    let next = advance(&world, true);

    assert_eq!(query::get_location(&next, baddie), Some(CellCoord::new(2, 4)));
    assert_eq!(
        query::get_state(&next, turret).and_then(|state| state.health()),
        Some(2)
    );
    assert!(query::shot_animations(&next)
        .iter()
        .any(|shot| shot.source == baddie && shot.target == turret));
}

#[test]
fn preview_skips_combat_and_leaves_the_world_untouched() {
    let mut world = default_world();
    let turret = wall(&mut world, CellCoord::new(2, 5), Facing::Up);
    let _ = marcher(&mut world, CellCoord::new(1, 4), Heading::Right);
    let before = query::entity_view(&world);

    let preview = advance(&world, false);

    assert!(query::shot_animations(&preview).is_empty());
    assert_eq!(
        query::get_state(&preview, turret).and_then(|state| state.health()),
        Some(6)
    );
    assert_eq!(query::entity_view(&world), before);
    assert_eq!(query::tick_index(&world), 0);
}

#[test]
fn loss_latches_and_freezes_the_score() {
    let config = SimulationConfig {
        columns: 2,
        rows: 3,
        ..SimulationConfig::default()
    };
    let mut world = world_with(config);
    let left = marcher(&mut world, CellCoord::new(0, 2), Heading::Left);
    let right = marcher(&mut world, CellCoord::new(1, 2), Heading::Right);

    let mut next = advance(&world, true);
    assert!(query::is_lost(&next));
    assert_eq!(query::score(&next), 0);

    next.board_mut().destroy(left, None);
    next.board_mut().destroy(right, None);
    for _ in 0..3 {
        next = advance(&next, true);
        assert!(query::is_lost(&next));
        assert_eq!(query::score(&next), 0);
    }
}

#[test]
fn simulation_commits_ticks_and_placements() {
    let mut simulation = Simulation::new(SimulationConfig::default()).expect("valid config");

    let outcome = simulation.place(CellCoord::new(2, 6));
    let PlacementOutcome::Placed { entity } = outcome else {
        panic!("starting points cover one placement, got {outcome:?}");
    };
    assert_eq!(
        simulation.place(CellCoord::new(3, 6)),
        PlacementOutcome::Rejected {
            reason: tower_march_core::PlacementError::InsufficientPoints
        }
    );

    let preview = simulation.preview();
    assert_eq!(query::tick_index(&preview), 1);
    assert_eq!(query::tick_index(simulation.world()), 0);

    let world = simulation.tick();
    assert_eq!(query::tick_index(world), 1);
    assert_eq!(query::get_location(world, entity), Some(CellCoord::new(2, 6)));
}

#[test]
fn hover_coverage_tracks_the_pointer() {
    let mut simulation = Simulation::new(SimulationConfig::default()).expect("valid config");
    assert!(tower_march_simulation::hover_coverage(simulation.world()).is_empty());

    simulation.hover(Some(CellCoord::new(3, 4)));
    let coverage = tower_march_simulation::hover_coverage(simulation.world());
    assert!(!coverage.is_empty());

    let outcome = simulation.place(CellCoord::new(3, 4));
    let PlacementOutcome::Placed { entity } = outcome else {
        panic!("placement should succeed, got {outcome:?}");
    };
    assert_eq!(
        tower_march_simulation::covered_cells_of(simulation.world(), entity),
        coverage
    );
}
