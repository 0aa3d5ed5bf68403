//! Checks for records arriving from storage or from the opponent.
//!
//! The board assumes its input is well formed. Anything that did not come from a local
//! board goes through here first so bad data fails with a typed error instead of
//! corrupting a board.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    board::{CannotPlaceReason, Coordinate, Gameboard, ShotResult},
    events::{GameEvent, PlacementRecord},
    ships::{ShipId, MAX_SHIP_LENGTH, SHIP_COUNT},
};

/// Why a stored or received record was rejected.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("coordinate {0:?} is outside the 10x10 grid")]
    CoordinateOutOfRange(Coordinate),

    #[error("ship length {0} is not between 1 and {}", MAX_SHIP_LENGTH)]
    InvalidShipLength(usize),

    #[error("{0} placement records exceed the fleet of {} ships", SHIP_COUNT)]
    TooManyPlacements(usize),

    #[error("ship id {0} is used by more than one placement")]
    DuplicateShipId(ShipId),

    #[error("placement of ship {ship} is not legal: {reason}")]
    IllegalPlacement {
        ship: ShipId,
        reason: CannotPlaceReason,
    },

    #[error("event at {0:?} reports a hit without naming a ship")]
    MissingShipId(Coordinate),

    #[error("event at {coord:?} names unknown ship {ship}")]
    UnknownShip { coord: Coordinate, ship: ShipId },
}

/// Reject coordinates off the board.
pub fn coordinate(coord: Coordinate) -> Result<Coordinate, ValidationError> {
    if coord.in_bounds() {
        Ok(coord)
    } else {
        Err(ValidationError::CoordinateOutOfRange(coord))
    }
}

/// Check a stored placement log: every record in range, at most one fleet, unique ids,
/// and the whole log must replay onto an empty board.
pub fn placements(records: &[PlacementRecord]) -> Result<(), ValidationError> {
    if records.len() > SHIP_COUNT {
        return Err(ValidationError::TooManyPlacements(records.len()));
    }
    let mut ids = HashSet::new();
    let mut scratch = Gameboard::new();
    for record in records {
        coordinate(record.coordinates)?;
        if record.ship_length == 0 || record.ship_length > MAX_SHIP_LENGTH {
            return Err(ValidationError::InvalidShipLength(record.ship_length));
        }
        if !ids.insert(&record.ship_id) {
            return Err(ValidationError::DuplicateShipId(record.ship_id.clone()));
        }
        scratch
            .place_ship_at(
                record.coordinates,
                record.axis,
                record.ship_length,
                Some(record.ship_id.clone()),
            )
            .map_err(|err| ValidationError::IllegalPlacement {
                ship: record.ship_id.clone(),
                reason: err.reason(),
            })?;
    }
    Ok(())
}

/// Check an event log. Hits must name a ship; if the placements of the attacked board
/// are known, that ship must be one of them.
pub fn events(
    events: &[GameEvent],
    placements: Option<&[PlacementRecord]>,
) -> Result<(), ValidationError> {
    let known: Option<HashSet<&ShipId>> =
        placements.map(|records| records.iter().map(|record| &record.ship_id).collect());
    for event in events {
        let coord = coordinate(event.coordinates)?;
        match (&event.result, &event.ship_id) {
            (ShotResult::ShotMiss, _) => {}
            (_, None) => return Err(ValidationError::MissingShipId(coord)),
            (_, Some(ship)) => {
                if let Some(ref known) = known {
                    if !known.contains(ship) {
                        return Err(ValidationError::UnknownShip {
                            coord,
                            ship: ship.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
