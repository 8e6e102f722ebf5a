//! Plain-text board rendering.

use std::fmt::Write as _;

use tower_march_core::{
    BaddieVariant, CellContent, CellCoord, EntityKind, EntityState, Facing, Heading,
    TurretVariant,
};
use tower_march_simulation::{query, World};

const EMPTY: char = '.';

/// Renders one row per line, top row first.
pub(crate) fn board(world: &World) -> String {
    let (columns, rows) = query::board(world).dimensions();
    let mut out = String::new();
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(
                i32::try_from(column).unwrap_or(i32::MAX),
                i32::try_from(row).unwrap_or(i32::MAX),
            );
            out.push(glyph(world, cell));
        }
        out.push('\n');
    }
    out
}

/// One-line status shown under each rendered board.
pub(crate) fn status(world: &World) -> String {
    let economy = query::economy(world);
    let mut line = format!(
        "tick {} score {} points {}/{} next {:?}",
        query::tick_index(world),
        query::score(world),
        economy.place_turret_points(),
        economy.place_turret_cooldown(),
        economy.next_turret().variant(),
    );
    let shots = query::shot_animations(world).len();
    if shots > 0 {
        let _ = write!(line, " shots {shots}");
    }
    let destroyed = query::destructions(world);
    if !destroyed.is_empty() {
        let baddies = destroyed
            .iter()
            .filter(|(_, record)| record.kind.is_baddie())
            .count();
        let _ = write!(
            line,
            " destroyed {baddies} baddies {} turrets",
            destroyed.len() - baddies
        );
    }
    if query::is_lost(world) {
        line.push_str(" LOST");
    }
    line
}

fn glyph(world: &World, cell: CellCoord) -> char {
    let CellContent::Occupied(entity) = query::get_object(world, cell) else {
        return EMPTY;
    };
    match (query::get_kind(world, entity), query::get_state(world, entity)) {
        (Some(EntityKind::Baddie(variant)), Some(EntityState::Baddie { heading })) => {
            baddie_glyph(variant, heading)
        }
        (Some(EntityKind::Turret(profile)), _) => turret_glyph(profile.variant()),
        (Some(EntityKind::Link(_)), _) => '#',
        _ => '?',
    }
}

const fn baddie_glyph(variant: BaddieVariant, heading: Heading) -> char {
    match (variant, heading) {
        (BaddieVariant::Marching, Heading::Left) => '<',
        (BaddieVariant::Marching, Heading::Right) => '>',
        (BaddieVariant::Falling, Heading::Left) => '{',
        (BaddieVariant::Falling, Heading::Right) => '}',
    }
}

const fn turret_glyph(variant: TurretVariant) -> char {
    match variant {
        TurretVariant::Directional(Facing::Up) => 'U',
        TurretVariant::Directional(Facing::Down) => 'D',
        TurretVariant::Directional(Facing::Left) => 'L',
        TurretVariant::Directional(Facing::Right) => 'R',
        TurretVariant::Knight => 'N',
        TurretVariant::Bishop => 'B',
    }
}
