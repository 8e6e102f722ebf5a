//! Cells each turret variant can hit.

use tower_march_core::{CellContent, CellCoord, TurretVariant};
use tower_march_world::Board;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

const BISHOP_DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

const BISHOP_REACH: usize = 2;

/// Cells a turret of `variant` standing on `origin` covers, in firing priority.
///
/// Off-board cells and cells holding a turret are never covered. Rays stop
/// in front of them; empty and baddie-held cells are covered and let the ray
/// continue.
#[must_use]
pub fn covered_cells(board: &Board, origin: CellCoord, variant: TurretVariant) -> Vec<CellCoord> {
    let mut covered = Vec::new();
    match variant {
        TurretVariant::Directional(facing) => {
            let (columns, rows) = facing.delta();
            cast_ray(board, origin, (columns, rows), usize::MAX, &mut covered);
        }
        TurretVariant::Knight => {
            covered.extend(
                KNIGHT_OFFSETS
                    .iter()
                    .map(|&(columns, rows)| origin.offset(columns, rows))
                    .filter(|&cell| !stops_fire(board, cell)),
            );
        }
        TurretVariant::Bishop => {
            for step in BISHOP_DIAGONALS {
                cast_ray(board, origin, step, BISHOP_REACH, &mut covered);
            }
        }
    }
    covered
}

fn cast_ray(
    board: &Board,
    origin: CellCoord,
    (columns, rows): (i32, i32),
    reach: usize,
    out: &mut Vec<CellCoord>,
) {
    let mut cell = origin;
    for _ in 0..reach {
        cell = cell.offset(columns, rows);
        if stops_fire(board, cell) {
            break;
        }
        out.push(cell);
    }
}

fn stops_fire(board: &Board, cell: CellCoord) -> bool {
    match board.get(cell) {
        CellContent::OutOfBounds => true,
        CellContent::Empty => false,
        CellContent::Occupied(entity) => board.kind_of(entity).is_some_and(|kind| kind.is_turret()),
    }
}
