//! A single position in a player's grid.

use serde::{Deserialize, Serialize};

use crate::{board::Coordinate, ships::ShipId};

/// Game state of a cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellState {
    /// Nothing here and never shot.
    Empty,
    /// Occupied by a ship that has not been shot here.
    Ship,
    /// Shot, nothing was here.
    ShotMiss,
    /// Shot, hit a ship that is still afloat.
    ShipHit,
    /// Part of a ship that has been sunk.
    ShipSunk,
}

impl CellState {
    /// Whether this cell has been shot at.
    pub fn attacked(self) -> bool {
        match self {
            CellState::Empty | CellState::Ship => false,
            CellState::ShotMiss | CellState::ShipHit | CellState::ShipSunk => true,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        CellState::Empty
    }
}

/// Outcome of a single shot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShotResult {
    ShotMiss,
    ShipHit,
    ShipSunk,
}

impl From<ShotResult> for CellState {
    fn from(result: ShotResult) -> Self {
        match result {
            ShotResult::ShotMiss => CellState::ShotMiss,
            ShotResult::ShipHit => CellState::ShipHit,
            ShotResult::ShipSunk => CellState::ShipSunk,
        }
    }
}

/// Rendering hint for a cell. Never consulted by placement or attack logic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CellStyle {
    None,
    /// Part of a placement preview that would not fit.
    Invalid,
    /// Part of a placement preview that would fit.
    Valid,
    /// Cursor over a cell that can still be attacked.
    SelectedValid,
    /// Cursor over a cell already known to hold a ship.
    SelectedInvalidShip,
    /// Cursor over a cell that was already a miss.
    SelectedInvalidMiss,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle::None
    }
}

/// A single cell in the player's grid.
#[derive(Debug, Clone)]
pub struct Cell {
    coord: Coordinate,
    state: CellState,
    style: CellStyle,
    /// The ID of the ship that occupies this cell, if any.
    ship: Option<ShipId>,
}

impl Cell {
    pub(crate) fn new(coord: Coordinate) -> Self {
        Self {
            coord,
            state: CellState::Empty,
            style: CellStyle::None,
            ship: None,
        }
    }

    /// The grid coordinate of this cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn style(&self) -> CellStyle {
        self.style
    }

    /// ID of the ship bound to this cell, if any.
    pub fn ship_id(&self) -> Option<&ShipId> {
        self.ship.as_ref()
    }

    /// Whether this cell has been shot at.
    pub fn attacked(&self) -> bool {
        self.state.attacked()
    }

    /// Bind this cell to a ship. Placement validation must already have ruled out
    /// occupied cells.
    pub(crate) fn add_ship(&mut self, id: ShipId) {
        debug_assert!(self.ship.is_none(), "{:?} is already occupied", self.coord);
        self.ship = Some(id);
        self.state = CellState::Ship;
    }

    /// Mark this cell as shot. Returns the ship bound to it, if any; the caller is
    /// responsible for damaging that ship and for never shooting a cell twice.
    pub(crate) fn receive_attack(&mut self) -> Option<&ShipId> {
        self.state = if self.ship.is_some() {
            CellState::ShipHit
        } else {
            CellState::ShotMiss
        };
        self.ship.as_ref()
    }

    /// Record what an opponent reported about this cell. Used for mirror boards, which
    /// never hold real ships.
    pub(crate) fn observe(&mut self, state: CellState, ship: Option<ShipId>) {
        self.state = state;
        if ship.is_some() {
            self.ship = ship;
        }
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub(crate) fn set_style(&mut self, style: CellStyle) {
        self.style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_records_a_miss() {
        let mut cell = Cell::new(Coordinate::new(3, 4));
        assert!(cell.receive_attack().is_none());
        assert_eq!(cell.state(), CellState::ShotMiss);
        assert!(cell.attacked());
    }

    #[test]
    fn occupied_cell_reports_its_ship() {
        let mut cell = Cell::new(Coordinate::new(0, 0));
        cell.add_ship(ShipId::from("s1"));
        assert_eq!(cell.state(), CellState::Ship);
        assert!(!cell.attacked());
        assert_eq!(cell.receive_attack(), Some(&ShipId::from("s1")));
        assert_eq!(cell.state(), CellState::ShipHit);
    }

    #[test]
    fn results_serialize_in_screaming_case() {
        assert_eq!(
            serde_json::to_string(&ShotResult::ShipSunk).unwrap(),
            "\"SHIP_SUNK\""
        );
    }
}
