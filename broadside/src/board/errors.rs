//! Errors used by the `Gameboard`.

use thiserror::Error;

use crate::board::{Axis, Coordinate};

/// Reason why a ship could not be placed at a given position.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// The ship would run past the edge of the board.
    #[error("insufficient space for the ship at the specified position")]
    OutOfBounds,
    /// One or more of the cells was already occupied.
    #[error("the requested position was already occupied")]
    AlreadyOccupied,
    /// No ship of the requested length is left in the fleet.
    #[error("no ship of that length remains to be placed")]
    FleetExhausted,
    /// A ship with the supplied id is already on the board.
    #[error("ship was already placed")]
    AlreadyPlaced,
}

/// Error caused when attempting to place a ship in an invalid position.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("could not place ship of length {length} at {coord:?} along {axis:?}: {reason}")]
pub struct PlaceError {
    reason: CannotPlaceReason,
    coord: Coordinate,
    axis: Axis,
    length: usize,
}

impl PlaceError {
    pub(super) fn new(
        reason: CannotPlaceReason,
        coord: Coordinate,
        axis: Axis,
        length: usize,
    ) -> Self {
        Self {
            reason,
            coord,
            axis,
            length,
        }
    }

    /// Get the reason placement was aborted.
    pub fn reason(&self) -> CannotPlaceReason {
        self.reason
    }

    /// Anchor coordinate where placement was attempted.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// Reason why a particular cell could not be shot.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotShootReason {
    /// Every ship on the board was already sunk.
    #[error("every ship on the board was already sunk")]
    AlreadyDefeated,

    /// The cell selected was out of bounds on the board.
    #[error("the target coordinate is out of bounds")]
    OutOfBounds,

    /// A shot has already been fired at that cell.
    #[error("the target cell was already shot")]
    AlreadyShot,
}

/// Error returned when trying to shoot a cell.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("could not shoot cell {coord:?}: {reason}")]
pub struct ShotError {
    /// Reason why the cell could not be shot.
    reason: CannotShootReason,

    /// The coordinates of the cell.
    coord: Coordinate,
}

impl ShotError {
    /// Construct a shot error with the given reason for the specified cell.
    pub(crate) fn new(reason: CannotShootReason, coord: Coordinate) -> Self {
        Self { reason, coord }
    }

    /// Get the reason the shot failed.
    pub fn reason(&self) -> CannotShootReason {
        self.reason
    }

    /// Get the coordinate of the shot cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}

/// Returned when random placement gives up.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("could not place the fleet after {attempts} random placements")]
pub struct PopulateError {
    attempts: usize,
}

impl PopulateError {
    pub(super) fn new(attempts: usize) -> Self {
        Self { attempts }
    }

    /// Number of random placements that were tried.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}
