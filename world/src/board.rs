//! Dense grid storage with an inverse occupant index.

use std::collections::BTreeMap;

use tower_march_core::{CellCoord, CellContent, EntityId, EntityKind, EntityState, ShotAnimation};

/// Record kept for an entity destroyed while its board was being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Destruction {
    /// Entity that fired the killing shot; `None` when the entity destroyed itself.
    pub destroyer: Option<EntityId>,
    /// Kind of the destroyed entity.
    pub kind: EntityKind,
    /// Last cell the entity occupied.
    pub cell: CellCoord,
}

/// Immutable view of a single live entity used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntitySnapshot {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Kind of the entity.
    pub kind: EntityKind,
    /// Cell the entity occupies.
    pub cell: CellCoord,
    /// State stored for the entity on this board.
    pub state: EntityState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Occupant {
    kind: EntityKind,
    cell: CellCoord,
    state: EntityState,
}

/// Fixed-size grid mapping cells to occupants and occupants back to cells.
///
/// A board only changes while it is the result of the tick being built or
/// while the player places an entity between ticks. Every live entity
/// occupies exactly one cell and owns exactly one state entry.
#[derive(Clone, Debug)]
pub struct Board {
    columns: u32,
    rows: u32,
    cells: Vec<Option<EntityId>>,
    occupants: BTreeMap<EntityId, Occupant>,
    destroyed: BTreeMap<EntityId, Destruction>,
    shots: Vec<ShotAnimation>,
}

impl Board {
    /// Creates an empty board with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
            occupants: BTreeMap::new(),
            destroyed: BTreeMap::new(),
            shots: Vec::new(),
        }
    }

    /// Provides the `(columns, rows)` dimensions of the board.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Probes the provided cell.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> CellContent {
        match self.index(cell) {
            None => CellContent::OutOfBounds,
            Some(index) => match self.cells[index] {
                None => CellContent::Empty,
                Some(entity) => CellContent::Occupied(entity),
            },
        }
    }

    /// Places an entity at the cell together with its state.
    ///
    /// When `state` is `None` the kind's initial state is used. An entity
    /// already on the board is moved rather than duplicated, and a different
    /// entity previously holding the cell is evicted from the board.
    pub fn place(
        &mut self,
        cell: CellCoord,
        entity: EntityId,
        kind: EntityKind,
        state: Option<EntityState>,
    ) {
        let Some(index) = self.index(cell) else {
            debug_assert!(false, "placement outside the board at {cell:?}");
            return;
        };

        if let Some(previous) = self.occupants.get(&entity).map(|occupant| occupant.cell) {
            if let Some(previous_index) = self.index(previous) {
                self.cells[previous_index] = None;
            }
        }

        if let Some(evicted) = self.cells[index] {
            if evicted != entity {
                tracing::warn!(
                    entity = evicted.get(),
                    column = cell.column(),
                    row = cell.row(),
                    "placement evicted an occupant"
                );
                let _ = self.occupants.remove(&evicted);
            }
        }

        self.cells[index] = Some(entity);
        let state = state.unwrap_or_else(|| kind.initial_state());
        let _ = self.occupants.insert(entity, Occupant { kind, cell, state });
    }

    /// Cell occupied by the entity, or `None` when it is not on the board.
    #[must_use]
    pub fn location_of(&self, entity: EntityId) -> Option<CellCoord> {
        self.occupants.get(&entity).map(|occupant| occupant.cell)
    }

    /// Kind of a live entity on the board.
    #[must_use]
    pub fn kind_of(&self, entity: EntityId) -> Option<EntityKind> {
        self.occupants.get(&entity).map(|occupant| occupant.kind)
    }

    /// State stored for a live entity on the board.
    #[must_use]
    pub fn state_of(&self, entity: EntityId) -> Option<EntityState> {
        self.occupants.get(&entity).map(|occupant| occupant.state)
    }

    /// Overwrites the state of a live entity without moving it.
    pub fn set_state(&mut self, entity: EntityId, state: EntityState) {
        if let Some(occupant) = self.occupants.get_mut(&entity) {
            occupant.state = state;
        }
    }

    /// Removes a live entity from the grid and records who destroyed it.
    pub fn destroy(&mut self, entity: EntityId, destroyer: Option<EntityId>) {
        let Some(occupant) = self.occupants.remove(&entity) else {
            return;
        };
        if let Some(index) = self.index(occupant.cell) {
            self.cells[index] = None;
        }
        let _ = self.destroyed.insert(
            entity,
            Destruction {
                destroyer,
                kind: occupant.kind,
                cell: occupant.cell,
            },
        );
    }

    /// Reports whether the entity was destroyed while this board was built.
    #[must_use]
    pub fn is_destroyed(&self, entity: EntityId) -> bool {
        self.destroyed.contains_key(&entity)
    }

    /// Destruction record of an entity destroyed on this board.
    #[must_use]
    pub fn destruction(&self, entity: EntityId) -> Option<&Destruction> {
        self.destroyed.get(&entity)
    }

    /// Iterator over every destruction recorded on this board.
    pub fn destroyed(&self) -> impl Iterator<Item = (EntityId, &Destruction)> {
        self.destroyed.iter().map(|(entity, record)| (*entity, record))
    }

    /// Records a shot for presentation.
    pub fn record_shot(&mut self, shot: ShotAnimation) {
        self.shots.push(shot);
    }

    /// Shots fired while this board was built.
    #[must_use]
    pub fn shots(&self) -> &[ShotAnimation] {
        &self.shots
    }

    /// Number of live entities on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    /// Reports whether the board holds no live entity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Cells in resolution order: columns left to right, each bottom to top.
    pub fn scan_order(&self) -> impl Iterator<Item = CellCoord> {
        let columns = i32::try_from(self.columns).unwrap_or(0);
        let rows = i32::try_from(self.rows).unwrap_or(0);
        (0..columns).flat_map(move |column| {
            (0..rows)
                .rev()
                .map(move |row| CellCoord::new(column, row))
        })
    }

    /// Live entities in resolution order.
    #[must_use]
    pub fn entities_in_scan_order(&self) -> Vec<EntityId> {
        self.scan_order()
            .filter_map(|cell| self.get(cell).occupant())
            .collect()
    }

    /// Snapshot of every live entity ordered by identifier.
    #[must_use]
    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        self.occupants
            .iter()
            .map(|(id, occupant)| EntitySnapshot {
                id: *id,
                kind: occupant.kind,
                cell: occupant.cell,
                state: occupant.state,
            })
            .collect()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
