#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tower March engine.
//!
//! This crate defines the vocabulary that connects the immutable world
//! snapshots, the pure systems that build the next snapshot, and the adapters
//! that present it. Entities are stable integer handles; everything a system
//! knows about an entity is derived from its [`EntityKind`] and the
//! [`EntityState`] stored on the board it was placed into.

pub mod config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, SimulationConfig};

/// Amount of health a baddie strips from an adjacent turret per retaliation.
pub const DEFAULT_BADDIE_DAMAGE: i32 = 4;

/// Unique identifier assigned to an entity for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single board cell expressed as column and row coordinates.
///
/// Coordinates are signed so that offsets may step off the board; such cells
/// probe as [`CellContent::OutOfBounds`] rather than failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell, growing toward the bottom row.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell displaced by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self {
            column: self.column + columns,
            row: self.row + rows,
        }
    }
}

/// Horizontal travel direction carried by every baddie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Travel toward decreasing column indices (`-1`).
    Left,
    /// Travel toward increasing column indices (`+1`).
    Right,
}

impl Heading {
    /// Column delta applied when stepping forward.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// Heading pointing the other way.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Fixed firing direction of a directional turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Fires toward row zero.
    Up,
    /// Fires toward the bottom row.
    Down,
    /// Fires toward column zero.
    Left,
    /// Fires toward the last column.
    Right,
}

impl Facing {
    /// Every facing in roll order.
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    /// Unit step expressed as `(columns, rows)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Movement personalities available to baddies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaddieVariant {
    /// Walks sideways and drops a row whenever the way ahead is blocked.
    Marching,
    /// Drops straight down whenever possible and only then sidesteps.
    Falling,
}

/// Targeting patterns available to turrets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretVariant {
    /// Fires along a single straight ray.
    Directional(Facing),
    /// Covers the eight knight-move offsets.
    Knight,
    /// Covers two steps along each diagonal.
    Bishop,
}

/// Fixed attributes of a turret, decided when its template is rolled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurretProfile {
    variant: TurretVariant,
    cooldown: u32,
    max_health: i32,
}

impl TurretProfile {
    /// Creates a new turret profile.
    #[must_use]
    pub const fn new(variant: TurretVariant, cooldown: u32, max_health: i32) -> Self {
        Self {
            variant,
            cooldown,
            max_health,
        }
    }

    /// Targeting pattern of the turret.
    #[must_use]
    pub const fn variant(&self) -> TurretVariant {
        self.variant
    }

    /// Ticks the turret waits after firing before it may fire again.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Health the turret starts with.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }
}

/// Opaque destination carried by a menu link entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkTarget(u32);

impl LinkTarget {
    /// Creates a new link target.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the target.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Every kind of entity that may occupy a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Mobile hostile entity.
    Baddie(BaddieVariant),
    /// Stationary player-placed entity.
    Turret(TurretProfile),
    /// Non-combat entity consumed by menu layers.
    Link(LinkTarget),
}

impl EntityKind {
    /// Reports whether the kind is a baddie of any variant.
    #[must_use]
    pub const fn is_baddie(&self) -> bool {
        matches!(self, Self::Baddie(_))
    }

    /// Reports whether the kind is a turret of any variant.
    #[must_use]
    pub const fn is_turret(&self) -> bool {
        matches!(self, Self::Turret(_))
    }

    /// State assigned when an entity is placed without an explicit state.
    #[must_use]
    pub const fn initial_state(&self) -> EntityState {
        match self {
            Self::Baddie(_) => EntityState::Baddie {
                heading: Heading::Right,
            },
            Self::Turret(profile) => EntityState::Turret {
                cooldown: 0,
                health: profile.max_health(),
            },
            Self::Link(_) => EntityState::Inert,
        }
    }
}

/// Per-entity simulation state carried explicitly from board to board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    /// State of a baddie.
    Baddie {
        /// Current horizontal travel direction.
        heading: Heading,
    },
    /// State of a turret.
    Turret {
        /// Ticks remaining before the turret may fire.
        cooldown: u32,
        /// Remaining health; the turret is destroyed at zero or below.
        health: i32,
    },
    /// Entities without simulation state.
    Inert,
}

impl EntityState {
    /// Heading of a baddie state.
    #[must_use]
    pub const fn heading(&self) -> Option<Heading> {
        match self {
            Self::Baddie { heading } => Some(*heading),
            _ => None,
        }
    }

    /// Remaining health of a turret state.
    #[must_use]
    pub const fn health(&self) -> Option<i32> {
        match self {
            Self::Turret { health, .. } => Some(*health),
            _ => None,
        }
    }

    /// Remaining cooldown of a turret state.
    #[must_use]
    pub const fn cooldown(&self) -> Option<u32> {
        match self {
            Self::Turret { cooldown, .. } => Some(*cooldown),
            _ => None,
        }
    }
}

/// Result of probing a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellContent {
    /// The coordinate lies outside the board.
    OutOfBounds,
    /// The cell exists and is unoccupied.
    Empty,
    /// The cell holds the provided entity.
    Occupied(EntityId),
}

impl CellContent {
    /// Entity occupying the cell, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<EntityId> {
        match self {
            Self::Occupied(entity) => Some(*entity),
            _ => None,
        }
    }
}

/// A single shot fired during a tick, retained for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShotAnimation {
    /// Entity that fired.
    pub source: EntityId,
    /// Entity that was hit.
    pub target: EntityId,
}

/// Reasons a placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the board.
    #[error("cell lies outside the board")]
    OutOfBounds,
    /// Row zero is reserved for wave spawning.
    #[error("the top row is reserved for spawning")]
    SpawnRow,
    /// The requested cell already holds an entity.
    #[error("cell is already occupied")]
    Occupied,
    /// Not enough points have accrued since the last placement.
    #[error("not enough points for a placement")]
    InsufficientPoints,
}

/// Outcome of a player request to place an entity at a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Nothing changed.
    Rejected {
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// The pending turret was placed.
    Placed {
        /// Identifier allocated to the new turret.
        entity: EntityId,
    },
    /// The cell held a link, which the caller should follow.
    ActivatedLink {
        /// Destination carried by the link.
        target: LinkTarget,
    },
}

/// A queued group of baddies spawning one per tick at a fixed column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wave {
    remaining: u32,
    variant: BaddieVariant,
    heading: Heading,
    column: i32,
}

impl Wave {
    /// Creates a new wave description.
    #[must_use]
    pub const fn new(remaining: u32, variant: BaddieVariant, heading: Heading, column: i32) -> Self {
        Self {
            remaining,
            variant,
            heading,
            column,
        }
    }

    /// Number of baddies still to spawn, including the next one.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Variant of every baddie in the wave.
    #[must_use]
    pub const fn variant(&self) -> BaddieVariant {
        self.variant
    }

    /// Heading assigned to each spawned baddie.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Column of the spawn cell in row zero.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Wave left over after one baddie spawned, if any remain.
    #[must_use]
    pub const fn after_spawn(self) -> Option<Self> {
        if self.remaining > 1 {
            Some(Self {
                remaining: self.remaining - 1,
                ..self
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BaddieVariant, CellCoord, EntityKind, EntityState, Facing, Heading, PlacementError,
        TurretProfile, TurretVariant, Wave,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn heading_flip_reverses_sign() {
        assert_eq!(Heading::Left.sign(), -1);
        assert_eq!(Heading::Right.sign(), 1);
        assert_eq!(Heading::Left.flipped(), Heading::Right);
        assert_eq!(Heading::Right.flipped().sign(), -1);
    }

    #[test]
    fn facings_are_unit_steps() {
        for facing in Facing::ALL {
            let (columns, rows) = facing.delta();
            assert_eq!(columns.abs() + rows.abs(), 1, "{facing:?}");
        }
    }

    #[test]
    fn offset_may_leave_the_board() {
        let cell = CellCoord::new(0, 0).offset(-1, 2);
        assert_eq!(cell, CellCoord::new(-1, 2));
    }

    #[test]
    fn turret_initial_state_is_ready_at_full_health() {
        let kind = EntityKind::Turret(TurretProfile::new(TurretVariant::Knight, 3, 7));
        assert_eq!(
            kind.initial_state(),
            EntityState::Turret {
                cooldown: 0,
                health: 7
            }
        );
        assert_eq!(
            EntityKind::Baddie(BaddieVariant::Falling)
                .initial_state()
                .heading(),
            Some(Heading::Right)
        );
    }

    #[test]
    fn wave_requeues_until_last_spawn() {
        let wave = Wave::new(2, BaddieVariant::Marching, Heading::Left, 3);
        let next = wave.after_spawn().expect("one more baddie");
        assert_eq!(next.remaining(), 1);
        assert_eq!(next.column(), 3);
        assert!(next.after_spawn().is_none());
    }

    #[test]
    fn shared_contracts_round_trip_through_bincode() {
        assert_round_trip(&EntityKind::Turret(TurretProfile::new(
            TurretVariant::Directional(Facing::Left),
            2,
            5,
        )));
        assert_round_trip(&PlacementError::InsufficientPoints);
        assert_round_trip(&Wave::new(9, BaddieVariant::Falling, Heading::Right, 0));
    }
}
