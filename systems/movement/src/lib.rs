#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that resolves where every entity stands next tick.
//!
//! Entities are resolved lazily: when a baddie wants a cell that is still
//! held on the previous board by an entity that has not moved yet, that
//! entity is resolved first. The dependency chain is kept on an explicit
//! work stack, and an entity that is already on the stack blocks the cell
//! it holds, which breaks every cycle.
//!
//! Cells claimed ahead of movement (spawn cells of queued waves) refuse
//! every newcomer. Only the entity already standing on such a cell may stay.

mod policy;

use std::collections::{BTreeMap, BTreeSet};

use tower_march_core::{CellContent, CellCoord, EntityId, EntityKind, EntityState};
use tower_march_world::Board;

pub use policy::{baddie_candidates, preferred_locations, settled_state, Candidate};

/// Resolution progress of a single entity within one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The entity has not been placed on the new board.
    Unresolved,
    /// The entity is on the work stack waiting for a dependency.
    InProgress,
    /// The entity has been placed on the new board.
    Resolved,
}

/// Outcome of checking a single candidate cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The acting entity may settle on the cell.
    Free,
    /// The acting entity must try its next preference.
    Blocked,
    /// The cell is held by an unresolved entity that must be resolved first.
    Await(EntityId),
}

/// Movement system that reuses its memo table and work stack between ticks.
#[derive(Debug, Default)]
pub struct Movement {
    status: BTreeMap<EntityId, Resolution>,
    stack: Vec<Frame>,
}

impl Movement {
    /// Creates a new movement system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places every live entity of `old` onto `new`.
    ///
    /// Entities already present on `new` block their cells, and no entity
    /// may enter a `reserved` cell it does not already stand on.
    /// `on_settled` runs once for each entity right after it is placed, so
    /// per-entity reactions observe the board exactly as far as it has been
    /// resolved.
    pub fn resolve<F>(
        &mut self,
        old: &Board,
        new: &mut Board,
        reserved: &BTreeSet<CellCoord>,
        mut on_settled: F,
    ) where
        F: FnMut(&mut Board, EntityId),
    {
        self.status.clear();
        self.stack.clear();

        let order = old.entities_in_scan_order();

        // Stationary entities never depend on anything, so settling them up
        // front yields the same board as settling them on demand.
        for &entity in &order {
            if let Some(kind) = old.kind_of(entity) {
                if !kind.is_baddie() {
                    self.settle_stationary(old, new, entity, kind);
                    on_settled(new, entity);
                }
            }
        }

        for entity in order {
            if self.resolution(entity) == Resolution::Unresolved {
                self.run(old, new, reserved, entity, &mut on_settled);
            }
        }
    }

    /// Resolution progress of an entity during the last call to [`Movement::resolve`].
    #[must_use]
    pub fn resolution(&self, entity: EntityId) -> Resolution {
        self.status
            .get(&entity)
            .copied()
            .unwrap_or(Resolution::Unresolved)
    }

    fn settle_stationary(&mut self, old: &Board, new: &mut Board, entity: EntityId, kind: EntityKind) {
        let (Some(cell), Some(state)) = (old.location_of(entity), old.state_of(entity)) else {
            return;
        };
        new.place(cell, entity, kind, Some(settled_state(state)));
        let _ = self.status.insert(entity, Resolution::Resolved);
    }

    fn run<F>(
        &mut self,
        old: &Board,
        new: &mut Board,
        reserved: &BTreeSet<CellCoord>,
        root: EntityId,
        on_settled: &mut F,
    ) where
        F: FnMut(&mut Board, EntityId),
    {
        self.push(old, root);

        while let Some(frame) = self.stack.last_mut() {
            match frame.step(old, new, reserved, &self.status) {
                Step::Await(other) => self.push(old, other),
                Step::Settle { cell, state } => {
                    let Some(frame) = self.stack.pop() else {
                        break;
                    };
                    new.place(cell, frame.entity, frame.kind, Some(state));
                    let _ = self.status.insert(frame.entity, Resolution::Resolved);
                    tracing::trace!(
                        entity = frame.entity.get(),
                        from_column = frame.origin.column(),
                        from_row = frame.origin.row(),
                        to_column = cell.column(),
                        to_row = cell.row(),
                        "entity settled"
                    );
                    on_settled(new, frame.entity);
                }
            }
        }
    }

    fn push(&mut self, old: &Board, entity: EntityId) {
        let (Some(kind), Some(origin), Some(state)) = (
            old.kind_of(entity),
            old.location_of(entity),
            old.state_of(entity),
        ) else {
            return;
        };

        let _ = self.status.insert(entity, Resolution::InProgress);
        self.stack.push(Frame {
            entity,
            kind,
            origin,
            state,
            candidates: preferred_locations(old, entity),
            cursor: 0,
        });
    }
}

#[derive(Clone, Debug)]
struct Frame {
    entity: EntityId,
    kind: EntityKind,
    origin: CellCoord,
    state: EntityState,
    candidates: Vec<Candidate>,
    cursor: usize,
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Await(EntityId),
    Settle { cell: CellCoord, state: EntityState },
}

impl Frame {
    fn step(
        &mut self,
        old: &Board,
        new: &Board,
        reserved: &BTreeSet<CellCoord>,
        status: &BTreeMap<EntityId, Resolution>,
    ) -> Step {
        while let Some(candidate) = self.candidates.get(self.cursor).copied() {
            let verdict = check_cell(
                old,
                new,
                reserved,
                status,
                self.entity,
                self.origin,
                candidate.cell,
            );
            tracing::trace!(
                entity = self.entity.get(),
                column = candidate.cell.column(),
                row = candidate.cell.row(),
                ?verdict,
                "collision check"
            );
            match verdict {
                Verdict::Free => {
                    return Step::Settle {
                        cell: candidate.cell,
                        state: EntityState::Baddie {
                            heading: candidate.heading,
                        },
                    };
                }
                Verdict::Blocked => self.cursor += 1,
                Verdict::Await(other) => return Step::Await(other),
            }
        }

        Step::Settle {
            cell: self.origin,
            state: settled_state(self.state),
        }
    }
}

/// Decides whether `entity`, standing on `origin` in `old`, may occupy `cell` in `new`.
///
/// Entities absent from `status` count as unresolved. A `reserved` cell is
/// blocked unless it is `origin`.
#[must_use]
pub fn check_cell(
    old: &Board,
    new: &Board,
    reserved: &BTreeSet<CellCoord>,
    status: &BTreeMap<EntityId, Resolution>,
    entity: EntityId,
    origin: CellCoord,
    cell: CellCoord,
) -> Verdict {
    if cell != origin && reserved.contains(&cell) {
        return Verdict::Blocked;
    }

    match new.get(cell) {
        CellContent::OutOfBounds => return Verdict::Blocked,
        CellContent::Occupied(occupant) if occupant != entity => return Verdict::Blocked,
        _ => {}
    }

    let other = match old.get(cell) {
        CellContent::Occupied(other) if other != entity => other,
        _ => return Verdict::Free,
    };

    match status.get(&other).copied().unwrap_or(Resolution::Unresolved) {
        Resolution::InProgress => Verdict::Blocked,
        Resolution::Unresolved => Verdict::Await(other),
        Resolution::Resolved => {
            let landing = new.location_of(other);
            if landing == Some(cell) {
                return Verdict::Blocked;
            }
            swap_verdict(old, other, landing, origin, cell)
        }
    }
}

/// Refuses moves that would pass through a baddie heading the other way.
///
/// Walks the preferences `other` had on `old` up to the cell it settled on.
/// Meeting `origin` first means `other` wanted the acting entity's cell, so
/// the two would swap. Lists that reach neither cell leave the move free.
fn swap_verdict(
    old: &Board,
    other: EntityId,
    landing: Option<CellCoord>,
    origin: CellCoord,
    cell: CellCoord,
) -> Verdict {
    if !old.kind_of(other).is_some_and(|kind| kind.is_baddie()) {
        return Verdict::Free;
    }

    for candidate in preferred_locations(old, other) {
        if candidate.cell == origin {
            return Verdict::Blocked;
        }
        if candidate.cell == cell || Some(candidate.cell) == landing {
            return Verdict::Free;
        }
    }

    Verdict::Free
}
