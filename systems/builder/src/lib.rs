#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for turret placement and the points ledger.

use rand::Rng;
use tower_march_core::{
    CellContent, CellCoord, EntityKind, Facing, PlacementError, PlacementOutcome,
    SimulationConfig, TurretProfile, TurretVariant,
};
use tower_march_system_combat::covered_cells;
use tower_march_world::{query, SimRng, World};

const TURRET_CHOICES: [TurretVariant; 6] = [
    TurretVariant::Directional(Facing::ALL[0]),
    TurretVariant::Directional(Facing::ALL[1]),
    TurretVariant::Directional(Facing::ALL[2]),
    TurretVariant::Directional(Facing::ALL[3]),
    TurretVariant::Knight,
    TurretVariant::Bishop,
];

/// Base `(cooldown, health)` of a turret variant before strength scaling.
#[must_use]
pub const fn base_stats(variant: TurretVariant) -> (u32, i32) {
    match variant {
        TurretVariant::Directional(_) => (2, 6),
        TurretVariant::Knight => (3, 5),
        TurretVariant::Bishop => (2, 5),
    }
}

/// Declarative placement preview describing the pending turret at a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Turret the placement would produce.
    pub turret: TurretProfile,
    /// Cell the turret would stand on.
    pub origin: CellCoord,
    /// Cells the turret would cover if placed now.
    pub covered: Vec<CellCoord>,
    /// Indicates whether a placement at `origin` would currently succeed.
    pub placeable: bool,
}

/// Builder system that rolls turret templates and applies placements.
#[derive(Clone, Copy, Debug)]
pub struct Builder {
    strength: f32,
}

impl Default for Builder {
    fn default() -> Self {
        Self { strength: 1.0 }
    }
}

impl Builder {
    /// Creates a builder scaling turret stats by `strength`.
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }

    /// Derives the builder from the simulation parameters.
    #[must_use]
    pub fn from_simulation(config: &SimulationConfig) -> Self {
        Self::new(config.turret_strength)
    }

    /// Draws the next turret template uniformly among all variants.
    #[must_use]
    pub fn roll(&self, rng: &mut SimRng) -> TurretProfile {
        let variant = TURRET_CHOICES[rng.gen_range(0..TURRET_CHOICES.len())];
        self.profile(variant)
    }

    /// Turret template of `variant` scaled by the builder's strength.
    ///
    /// Scaled stats are rounded and clamped to `1..=STAT_CEILING`.
    #[must_use]
    pub fn profile(&self, variant: TurretVariant) -> TurretProfile {
        let (cooldown, health) = base_stats(variant);
        let health = scale_stat(health as f32 * self.strength);
        let cooldown = scale_stat(cooldown as f32 / self.strength);
        TurretProfile::new(variant, u32::from(cooldown), i32::from(health))
    }

    /// Checks whether the pending turret could be placed at `cell`.
    ///
    /// Links are reported through [`PlacementOutcome::ActivatedLink`]; a
    /// `None` result means the placement would succeed.
    #[must_use]
    pub fn validate(&self, world: &World, cell: CellCoord) -> Option<PlacementOutcome> {
        match query::get_object(world, cell) {
            CellContent::OutOfBounds => Some(rejected(PlacementError::OutOfBounds)),
            CellContent::Occupied(entity) => match query::get_kind(world, entity) {
                Some(EntityKind::Link(target)) => Some(PlacementOutcome::ActivatedLink { target }),
                _ if cell.row() == 0 => Some(rejected(PlacementError::SpawnRow)),
                _ => Some(rejected(PlacementError::Occupied)),
            },
            CellContent::Empty if cell.row() == 0 => Some(rejected(PlacementError::SpawnRow)),
            CellContent::Empty if !query::economy(world).can_afford() => {
                Some(rejected(PlacementError::InsufficientPoints))
            }
            CellContent::Empty => None,
        }
    }

    /// Places the pending turret at `cell`, debits the ledger and rolls its successor.
    ///
    /// Rejections and link activations leave the world untouched.
    pub fn place(&self, world: &mut World, cell: CellCoord) -> PlacementOutcome {
        if let Some(outcome) = self.validate(world, cell) {
            tracing::debug!(
                column = cell.column(),
                row = cell.row(),
                ?outcome,
                "placement not applied"
            );
            return outcome;
        }

        let turret = query::economy(world).next_turret();
        let entity = world.spawn_entity(cell, EntityKind::Turret(turret), None);
        let successor = self.roll(world.rng_mut());
        world.economy_mut().spend(successor);
        tracing::info!(
            entity = entity.get(),
            column = cell.column(),
            row = cell.row(),
            variant = ?turret.variant(),
            "turret placed"
        );
        PlacementOutcome::Placed { entity }
    }

    /// Preview of the pending turret at the hovered cell, if the cell is on the board.
    #[must_use]
    pub fn preview(&self, world: &World) -> Option<PlacementPreview> {
        let origin = query::hover(world)?;
        let board = query::board(world);
        if !board.contains(origin) {
            return None;
        }
        let turret = query::economy(world).next_turret();
        Some(PlacementPreview {
            turret,
            origin,
            covered: covered_cells(board, origin, turret.variant()),
            placeable: self.validate(world, origin).is_none(),
        })
    }
}

/// Largest health or cooldown a scaled turret template may carry.
pub const STAT_CEILING: u16 = u16::MAX;

fn scale_stat(value: f32) -> u16 {
    if value.is_nan() {
        return 1;
    }
    let clamped = value.round().clamp(1.0, f32::from(STAT_CEILING));
    // The clamp keeps the value inside the target range.
    clamped as u16
}

const fn rejected(reason: PlacementError) -> PlacementOutcome {
    PlacementOutcome::Rejected { reason }
}
