use std::{error::Error, fmt, num::ParseIntError};

use tower_march_core::CellCoord;

/// Separates the cell from the optional tick it is scheduled for.
const TICK_DELIMITER: char = '@';

/// Turret placement requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScheduledPlacement {
    /// Cell to place the pending turret on.
    pub(crate) cell: CellCoord,
    /// Tick before which the placement is attempted.
    pub(crate) tick: u64,
}

/// Parses `x,y` or `x,y@tick`; placements without a tick run before the first tick.
pub(crate) fn parse(value: &str) -> Result<ScheduledPlacement, PlacementArgError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlacementArgError::Empty);
    }

    let (cell, tick) = match trimmed.split_once(TICK_DELIMITER) {
        Some((cell, tick)) => (
            cell,
            tick.trim()
                .parse::<u64>()
                .map_err(|error| PlacementArgError::InvalidTick(tick.to_owned(), error))?,
        ),
        None => (trimmed, 0),
    };

    let (column, row) = cell
        .split_once(',')
        .ok_or_else(|| PlacementArgError::MissingRow(cell.to_owned()))?;
    let column = parse_axis(column)?;
    let row = parse_axis(row)?;

    Ok(ScheduledPlacement {
        cell: CellCoord::new(column, row),
        tick,
    })
}

fn parse_axis(value: &str) -> Result<i32, PlacementArgError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|error| PlacementArgError::InvalidCoordinate(value.to_owned(), error))
}

/// Errors raised while parsing `--place` arguments.
#[derive(Debug)]
pub(crate) enum PlacementArgError {
    /// The argument was empty or whitespace.
    Empty,
    /// The argument did not contain a `,` separating column and row.
    MissingRow(String),
    /// A coordinate was not an integer.
    InvalidCoordinate(String, ParseIntError),
    /// The tick suffix was not a non-negative integer.
    InvalidTick(String, ParseIntError),
}

impl fmt::Display for PlacementArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "placement was empty"),
            Self::MissingRow(cell) => write!(f, "placement '{cell}' must look like x,y"),
            Self::InvalidCoordinate(value, _) => {
                write!(f, "could not parse coordinate '{value}'")
            }
            Self::InvalidTick(value, _) => write!(f, "could not parse tick '{value}'"),
        }
    }
}

impl Error for PlacementArgError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCoordinate(_, error) | Self::InvalidTick(_, error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_without_tick() {
        let placement = parse("2,5").expect("valid placement");
        assert_eq!(placement.cell, CellCoord::new(2, 5));
        assert_eq!(placement.tick, 0);
    }

    #[test]
    fn parses_scheduled_cell_with_whitespace() {
        let placement = parse(" 3, 4 @ 12 ").expect("valid placement");
        assert_eq!(placement.cell, CellCoord::new(3, 4));
        assert_eq!(placement.tick, 12);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse(""), Err(PlacementArgError::Empty)));
        assert!(matches!(parse("3"), Err(PlacementArgError::MissingRow(_))));
        assert!(matches!(
            parse("a,1"),
            Err(PlacementArgError::InvalidCoordinate(_, _))
        ));
        assert!(matches!(
            parse("1,1@soon"),
            Err(PlacementArgError::InvalidTick(_, _))
        ));
    }
}
