#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration and the engine surface consumed by adapters.
//!
//! [`advance`] never touches the snapshot it is given; committing a tick
//! means replacing the old snapshot with the returned one.

use tower_march_core::{
    CellContent, CellCoord, ConfigError, EntityId, PlacementOutcome, SimulationConfig,
};
use tower_march_system_builder::Builder;
use tower_march_system_combat::{retaliate, Combat};
use tower_march_system_movement::Movement;
use tower_march_system_spawning::{Config as SpawningConfig, Spawning};
use tower_march_world::Board;

pub use tower_march_system_builder::PlacementPreview;
pub use tower_march_world::{query, Economy, EntitySnapshot, World};

/// Creates the opening snapshot and rolls the first pending turret.
pub fn new_world(config: SimulationConfig) -> Result<World, ConfigError> {
    config.validate()?;
    let builder = Builder::from_simulation(&config);
    let mut rng = World::seeded_rng(&config);
    let next_turret = builder.roll(&mut rng);
    World::new(config, rng, next_turret)
}

/// Builds the snapshot that follows `world`.
///
/// With `shoot` unset neither baddies nor turrets attack, which makes the
/// result usable as a throwaway preview.
#[must_use]
pub fn advance(world: &World, shoot: bool) -> World {
    let config = query::config(world);
    let mut next = world.successor();

    let spawning = Spawning::new(SpawningConfig::from_simulation(config));
    let claims = spawning.claims(world);

    let damage = config.baddie_damage;
    Movement::new().resolve(
        query::board(world),
        next.board_mut(),
        &claims,
        |board, entity| {
            if shoot {
                let _ = retaliate(board, entity, damage);
            }
        },
    );

    let spawned = spawning.handle(world, &mut next);

    if shoot {
        let _ = Combat::new().handle(next.board_mut());
    }

    let overrun = bottom_row_overrun(query::board(&next));
    next.settle_outcome(overrun);
    next.economy_mut().accrue();

    tracing::debug!(
        tick = query::tick_index(&next),
        spawned,
        entities = query::board(&next).len(),
        shots = query::shot_animations(&next).len(),
        score = query::score(&next),
        lost = query::is_lost(&next),
        "tick advanced"
    );
    next
}

/// Attempts to place the pending turret at `cell`.
pub fn place_entity(world: &mut World, cell: CellCoord) -> PlacementOutcome {
    Builder::from_simulation(query::config(world)).place(world, cell)
}

/// Records the cell under the pointer, or clears it.
pub fn set_hover(world: &mut World, cell: Option<CellCoord>) {
    world.set_hover(cell);
}

/// Cells the turret currently covers; empty for anything else.
#[must_use]
pub fn covered_cells_of(world: &World, entity: EntityId) -> Vec<CellCoord> {
    tower_march_system_combat::covered_cells_of(query::board(world), entity)
}

/// Preview of the pending turret at the hover cell.
#[must_use]
pub fn hover_preview(world: &World) -> Option<PlacementPreview> {
    Builder::from_simulation(query::config(world)).preview(world)
}

/// Cells the pending turret would cover if placed at the hover cell.
#[must_use]
pub fn hover_coverage(world: &World) -> Vec<CellCoord> {
    hover_preview(world)
        .map(|preview| preview.covered)
        .unwrap_or_default()
}

fn bottom_row_overrun(board: &Board) -> bool {
    let (columns, rows) = board.dimensions();
    let Some(bottom) = rows.checked_sub(1).and_then(|row| i32::try_from(row).ok()) else {
        return false;
    };
    (0..columns)
        .filter_map(|column| i32::try_from(column).ok())
        .all(|column| match board.get(CellCoord::new(column, bottom)) {
            CellContent::Occupied(entity) => board.kind_of(entity).is_some_and(|kind| kind.is_baddie()),
            _ => false,
        })
}

/// Owns the current snapshot and commits ticks and player input to it.
#[derive(Clone, Debug)]
pub struct Simulation {
    world: World,
}

impl Simulation {
    /// Creates a simulation from validated configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            world: new_world(config)?,
        })
    }

    /// Current snapshot.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Advances and commits one tick with combat enabled.
    pub fn tick(&mut self) -> &World {
        self.world = advance(&self.world, true);
        &self.world
    }

    /// Computes the next snapshot without combat and without committing it.
    #[must_use]
    pub fn preview(&self) -> World {
        advance(&self.world, false)
    }

    /// Attempts to place the pending turret on the current snapshot.
    pub fn place(&mut self, cell: CellCoord) -> PlacementOutcome {
        place_entity(&mut self.world, cell)
    }

    /// Records the cell under the pointer.
    pub fn hover(&mut self, cell: Option<CellCoord>) {
        set_hover(&mut self.world, cell);
    }
}
