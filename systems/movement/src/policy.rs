//! Ordered destination preferences for each entity kind.

use tower_march_core::{BaddieVariant, CellCoord, EntityId, EntityKind, EntityState, Heading};
use tower_march_world::Board;

/// A destination an entity would like to occupy next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Cell to occupy.
    pub cell: CellCoord,
    /// Heading the entity carries if it settles on `cell`.
    pub heading: Heading,
}

impl Candidate {
    const fn new(cell: CellCoord, heading: Heading) -> Self {
        Self { cell, heading }
    }
}

/// Preferred destinations of a baddie, most preferred first.
///
/// The list always ends with staying in place with a flipped heading.
#[must_use]
pub fn baddie_candidates(
    variant: BaddieVariant,
    origin: CellCoord,
    heading: Heading,
) -> Vec<Candidate> {
    let forward = heading.sign();
    let flipped = heading.flipped();
    match variant {
        BaddieVariant::Marching => vec![
            Candidate::new(origin.offset(forward, 0), heading),
            Candidate::new(origin.offset(0, 1), flipped),
            Candidate::new(origin.offset(-forward, 0), flipped),
            Candidate::new(origin, flipped),
        ],
        BaddieVariant::Falling => vec![
            Candidate::new(origin.offset(0, 1), heading),
            Candidate::new(origin.offset(forward, 1), heading),
            Candidate::new(origin.offset(-forward, 1), flipped),
            Candidate::new(origin.offset(forward, 0), heading),
            Candidate::new(origin.offset(-forward, 0), flipped),
            Candidate::new(origin, flipped),
        ],
    }
}

/// Preferred destinations of an entity as it stands on `board`.
///
/// Stationary kinds and entities absent from the board yield no candidates.
#[must_use]
pub fn preferred_locations(board: &Board, entity: EntityId) -> Vec<Candidate> {
    let (Some(kind), Some(origin), Some(state)) = (
        board.kind_of(entity),
        board.location_of(entity),
        board.state_of(entity),
    ) else {
        return Vec::new();
    };

    match (kind, state) {
        (EntityKind::Baddie(variant), EntityState::Baddie { heading }) => {
            baddie_candidates(variant, origin, heading)
        }
        _ => Vec::new(),
    }
}

/// State an entity keeps when it settles on its own cell without moving.
#[must_use]
pub fn settled_state(state: EntityState) -> EntityState {
    match state {
        EntityState::Turret { cooldown, health } => EntityState::Turret {
            cooldown: cooldown.saturating_sub(1),
            health,
        },
        other => other,
    }
}
