#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat resolution performed on the board under construction.
//!
//! Baddies retaliate against neighbouring turrets the moment their own move
//! is settled; turrets fire in a separate pass once every entity stands on
//! its new cell.

mod coverage;

use tower_march_core::{CellContent, CellCoord, EntityId, EntityKind, EntityState, ShotAnimation};
use tower_march_world::Board;

pub use coverage::covered_cells;

const RETALIATION_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Cells the turret currently covers on `board`; empty for anything else.
#[must_use]
pub fn covered_cells_of(board: &Board, entity: EntityId) -> Vec<CellCoord> {
    match (board.kind_of(entity), board.location_of(entity)) {
        (Some(EntityKind::Turret(profile)), Some(origin)) => {
            covered_cells(board, origin, profile.variant())
        }
        _ => Vec::new(),
    }
}

/// Lets a settled baddie strike the weakest orthogonally adjacent turret.
///
/// Neighbours are inspected left, right, up, down; among equally weak
/// turrets the first inspected wins. Returns the turret that was hit.
pub fn retaliate(board: &mut Board, baddie: EntityId, damage: i32) -> Option<EntityId> {
    if !board.kind_of(baddie).is_some_and(|kind| kind.is_baddie()) {
        return None;
    }
    let origin = board.location_of(baddie)?;

    let mut weakest: Option<(EntityId, u32, i32)> = None;
    for (columns, rows) in RETALIATION_OFFSETS {
        let CellContent::Occupied(neighbor) = board.get(origin.offset(columns, rows)) else {
            continue;
        };
        let Some(EntityState::Turret { cooldown, health }) = board.state_of(neighbor) else {
            continue;
        };
        if weakest.map_or(true, |(_, _, lowest)| health < lowest) {
            weakest = Some((neighbor, cooldown, health));
        }
    }

    let (turret, cooldown, health) = weakest?;
    board.record_shot(ShotAnimation {
        source: baddie,
        target: turret,
    });
    let health = health - damage;
    if health <= 0 {
        board.destroy(turret, Some(baddie));
    } else {
        board.set_state(turret, EntityState::Turret { cooldown, health });
    }
    Some(turret)
}

/// Fires a ready turret at the first live baddie among its covered cells.
///
/// A hit resets the cooldown and costs the turret one health; a turret whose
/// health runs out destroys itself. Returns the baddie that was hit.
pub fn fire(board: &mut Board, turret: EntityId) -> Option<EntityId> {
    let Some(EntityKind::Turret(profile)) = board.kind_of(turret) else {
        return None;
    };
    let Some(EntityState::Turret { cooldown, health }) = board.state_of(turret) else {
        return None;
    };
    if cooldown != 0 {
        return None;
    }

    let target = covered_cells_of(board, turret).into_iter().find_map(|cell| {
        board
            .get(cell)
            .occupant()
            .filter(|&occupant| board.kind_of(occupant).is_some_and(|kind| kind.is_baddie()))
    })?;

    board.record_shot(ShotAnimation {
        source: turret,
        target,
    });
    board.destroy(target, Some(turret));

    let health = health - 1;
    if health <= 0 {
        board.destroy(turret, None);
    } else {
        board.set_state(
            turret,
            EntityState::Turret {
                cooldown: profile.cooldown(),
                health,
            },
        );
    }
    Some(target)
}

/// Turret fire pass executed after all movement is resolved.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<EntityId>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets every live turret on `board` fire once, in resolution order.
    ///
    /// Returns the number of baddies destroyed.
    pub fn handle(&mut self, board: &mut Board) -> usize {
        self.scratch.clear();
        self.scratch.extend(board.entities_in_scan_order());

        let mut hits = 0;
        for &entity in &self.scratch {
            if board.is_destroyed(entity) {
                continue;
            }
            if fire(board, entity).is_some() {
                hits += 1;
            }
        }

        if hits > 0 {
            tracing::debug!(hits, "turrets fired");
        }
        hits
    }
}
