#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world snapshots for Tower March.
//!
//! A [`World`] is handed from tick to tick by value: the previous snapshot is
//! only ever read while its successor is built. The seeded random stream
//! lives inside the snapshot so that building a successor is a pure function
//! of the previous snapshot.

mod board;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tower_march_core::{
    CellCoord, ConfigError, EntityId, EntityKind, EntityState, SimulationConfig, TurretProfile,
    Wave,
};

pub use board::{Board, Destruction, EntitySnapshot};

/// Random stream threaded through wave synthesis and turret rolls.
pub type SimRng = ChaCha8Rng;

/// Turret-placement ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Economy {
    place_turret_cooldown: u32,
    place_turret_points: u32,
    next_turret: TurretProfile,
}

impl Economy {
    /// Creates a ledger with the provided cost, balance and pending turret.
    #[must_use]
    pub const fn new(
        place_turret_cooldown: u32,
        place_turret_points: u32,
        next_turret: TurretProfile,
    ) -> Self {
        Self {
            place_turret_cooldown,
            place_turret_points,
            next_turret,
        }
    }

    /// Points debited per placement.
    #[must_use]
    pub const fn place_turret_cooldown(&self) -> u32 {
        self.place_turret_cooldown
    }

    /// Points accrued and not yet spent.
    #[must_use]
    pub const fn place_turret_points(&self) -> u32 {
        self.place_turret_points
    }

    /// Turret the next successful placement will produce.
    #[must_use]
    pub const fn next_turret(&self) -> TurretProfile {
        self.next_turret
    }

    /// Reports whether enough points have accrued for a placement.
    #[must_use]
    pub const fn can_afford(&self) -> bool {
        self.place_turret_points >= self.place_turret_cooldown
    }

    /// Adds one tick's worth of points; accrual stops once a placement is affordable.
    pub fn accrue(&mut self) {
        if self.place_turret_points < self.place_turret_cooldown {
            self.place_turret_points += 1;
        }
    }

    /// Debits one placement and installs the freshly rolled pending turret.
    pub fn spend(&mut self, next_turret: TurretProfile) {
        debug_assert!(self.can_afford(), "spend requires an affordable placement");
        self.place_turret_points = self
            .place_turret_points
            .saturating_sub(self.place_turret_cooldown);
        self.next_turret = next_turret;
    }
}

/// Represents one immutable Tower March snapshot.
#[derive(Clone, Debug)]
pub struct World {
    config: SimulationConfig,
    board: Board,
    waves: Vec<Wave>,
    economy: Economy,
    score: u64,
    lost: bool,
    tick_index: u64,
    hover: Option<CellCoord>,
    next_entity_id: u32,
    rng: SimRng,
}

impl World {
    /// Seeds the random stream described by the configuration.
    #[must_use]
    pub fn seeded_rng(config: &SimulationConfig) -> SimRng {
        SimRng::seed_from_u64(config.seed)
    }

    /// Creates an empty world after validating the configuration.
    ///
    /// `rng` continues the stream that rolled `next_turret`.
    pub fn new(
        config: SimulationConfig,
        rng: SimRng,
        next_turret: TurretProfile,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let economy = Economy::new(
            config.place_turret_cooldown,
            config.starting_points,
            next_turret,
        );
        Ok(Self {
            board: Board::new(config.columns, config.rows),
            waves: Vec::new(),
            economy,
            score: 0,
            lost: false,
            tick_index: 0,
            hover: None,
            next_entity_id: 0,
            rng,
            config,
        })
    }

    /// Starts the snapshot that follows this one.
    ///
    /// The successor inherits the ledger, score, hover cell and random stream
    /// but begins with an empty board and an empty wave queue.
    #[must_use]
    pub fn successor(&self) -> Self {
        let (columns, rows) = self.board.dimensions();
        Self {
            config: self.config.clone(),
            board: Board::new(columns, rows),
            waves: Vec::new(),
            economy: self.economy,
            score: self.score,
            lost: self.lost,
            tick_index: self.tick_index.saturating_add(1),
            hover: self.hover,
            next_entity_id: self.next_entity_id,
            rng: self.rng.clone(),
        }
    }

    /// Creates a new entity and places it at the cell.
    pub fn spawn_entity(
        &mut self,
        cell: CellCoord,
        kind: EntityKind,
        state: Option<EntityState>,
    ) -> EntityId {
        let entity = self.allocate_entity_id();
        self.board.place(cell, entity, kind, state);
        entity
    }

    /// Reserves a fresh identifier.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        let entity = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        entity
    }

    /// Mutable access to the board under construction.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Mutable access to the random stream.
    pub fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    /// Mutable access to the placement ledger.
    pub fn economy_mut(&mut self) -> &mut Economy {
        &mut self.economy
    }

    /// Replaces the wave queue.
    pub fn set_waves(&mut self, waves: Vec<Wave>) {
        self.waves = waves;
    }

    /// Records the tick epilogue: latches loss and scores surviving ticks.
    pub fn settle_outcome(&mut self, overrun: bool) {
        if self.lost {
            return;
        }
        if overrun {
            self.lost = true;
        } else {
            self.score = self.score.saturating_add(1);
        }
    }

    /// Sets the cell under the pointer.
    pub fn set_hover(&mut self, cell: Option<CellCoord>) {
        self.hover = cell;
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tower_march_core::{
        CellCoord, CellContent, EntityId, EntityKind, EntityState, ShotAnimation,
        SimulationConfig, Wave,
    };

    use super::{Board, Destruction, Economy, EntitySnapshot, World};

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Probes the cell on the world's board.
    #[must_use]
    pub fn get_object(world: &World, cell: CellCoord) -> CellContent {
        world.board.get(cell)
    }

    /// Cell occupied by the entity, if it is live on this board.
    #[must_use]
    pub fn get_location(world: &World, entity: EntityId) -> Option<CellCoord> {
        world.board.location_of(entity)
    }

    /// Kind of a live entity.
    #[must_use]
    pub fn get_kind(world: &World, entity: EntityId) -> Option<EntityKind> {
        world.board.kind_of(entity)
    }

    /// State of a live entity.
    #[must_use]
    pub fn get_state(world: &World, entity: EntityId) -> Option<EntityState> {
        world.board.state_of(entity)
    }

    /// Reports whether the entity was destroyed during the tick that built this world.
    #[must_use]
    pub fn is_destroyed(world: &World, entity: EntityId) -> bool {
        world.board.is_destroyed(entity)
    }

    /// Entity that destroyed `entity` during the tick that built this world.
    ///
    /// `None` when the entity was not destroyed or destroyed itself.
    #[must_use]
    pub fn destroyer_of(world: &World, entity: EntityId) -> Option<EntityId> {
        world
            .board
            .destruction(entity)
            .and_then(|record| record.destroyer)
    }

    /// Entities destroyed during the tick that built this world, ordered by identifier.
    #[must_use]
    pub fn destructions(world: &World) -> Vec<(EntityId, Destruction)> {
        world
            .board
            .destroyed()
            .map(|(entity, record)| (entity, *record))
            .collect()
    }

    /// Shots fired during the tick that built this world.
    #[must_use]
    pub fn shot_animations(world: &World) -> &[ShotAnimation] {
        world.board.shots()
    }

    /// Snapshot of every live entity ordered by identifier.
    #[must_use]
    pub fn entity_view(world: &World) -> Vec<EntitySnapshot> {
        world.board.snapshots()
    }

    /// Waves queued for the next tick.
    #[must_use]
    pub fn waves(world: &World) -> &[Wave] {
        &world.waves
    }

    /// Turret-placement ledger.
    #[must_use]
    pub fn economy(world: &World) -> &Economy {
        &world.economy
    }

    /// Number of ticks survived.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Reports whether the bottom row has ever been overrun.
    #[must_use]
    pub fn is_lost(world: &World) -> bool {
        world.lost
    }

    /// Number of ticks elapsed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Cell currently under the pointer.
    #[must_use]
    pub fn hover(world: &World) -> Option<CellCoord> {
        world.hover
    }
}
