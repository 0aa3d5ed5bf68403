//! Ships, their identifiers and the fixed fleet every board must place.

use std::fmt;

use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::board::{CellState, Coordinate, Grid, ShotResult};

pub use self::linear::{Line, ShapeProjection};

mod linear;

/// Length of the generated ship ids.
const GENERATED_ID_LEN: usize = 8;

/// Identifier of a ship, stable across replay.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipId(String);

impl ShipId {
    /// Generate a fresh random id.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ShipId(
            (0..GENERATED_ID_LEN)
                .map(|_| rng.sample(Alphanumeric))
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShipId {
    fn from(id: &str) -> Self {
        ShipId(id.to_owned())
    }
}

impl From<String> for ShipId {
    fn from(id: String) -> Self {
        ShipId(id)
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A placed ship. Owns the list of coordinates it occupies; the cells only refer back
/// to it by id.
#[derive(Debug, Clone)]
pub struct Ship {
    id: ShipId,
    /// Remaining health. Starts at the ship's length and may go negative if damaged
    /// more often than it has cells.
    health: i32,
    /// Occupied cells, head to tail along the placement axis.
    cells: Vec<Coordinate>,
}

impl Ship {
    pub(crate) fn new(id: ShipId, length: usize) -> Self {
        Self {
            id,
            health: length as i32,
            cells: Vec::with_capacity(length),
        }
    }

    pub fn id(&self) -> &ShipId {
        &self.id
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn sunk(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn add_cell(&mut self, coord: Coordinate) {
        self.cells.push(coord);
    }

    /// Take one point of damage. When health runs out, every cell of the ship in `grid`
    /// is marked sunk.
    pub(crate) fn damage(&mut self, grid: &mut Grid) -> ShotResult {
        self.health -= 1;
        if self.health <= 0 {
            for &coord in &self.cells {
                grid[coord].set_state(CellState::ShipSunk);
            }
            ShotResult::ShipSunk
        } else {
            ShotResult::ShipHit
        }
    }
}

/// Ship lengths and how many of each make up a fleet, longest first.
pub const FLEET: [(usize, usize); 5] = [(5, 1), (4, 1), (3, 1), (2, 2), (1, 2)];

/// Number of ships in a fleet.
pub const SHIP_COUNT: usize = 7;

/// Number of cells covered by a full fleet.
pub const FLEET_CELLS: usize = 18;

/// Longest ship in the fleet.
pub const MAX_SHIP_LENGTH: usize = 5;

/// Tracks how many ships of each length have been placed on a board.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    placed: [usize; MAX_SHIP_LENGTH + 1],
}

impl Fleet {
    /// Length of the next ship still waiting to be placed, longest first. Returns 0
    /// once the whole fleet is placed.
    pub fn next_length(&self) -> usize {
        FLEET
            .iter()
            .find(|&&(len, count)| self.placed[len] < count)
            .map_or(0, |&(len, _)| len)
    }

    /// Whether a ship of `length` may still be placed.
    pub fn has_slot(&self, length: usize) -> bool {
        FLEET
            .iter()
            .any(|&(len, count)| len == length && self.placed[len] < count)
    }

    /// Total number of ships placed.
    pub fn placed(&self) -> usize {
        self.placed.iter().sum()
    }

    pub(crate) fn record(&mut self, length: usize) {
        self.placed[length] += 1;
    }

    pub(crate) fn reset(&mut self) {
        self.placed = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn fleet_is_offered_longest_first() {
        let mut fleet = Fleet::default();
        let mut order = Vec::new();
        loop {
            let len = fleet.next_length();
            if len == 0 {
                break;
            }
            order.push(len);
            fleet.record(len);
        }
        assert_eq!(order, vec![5, 4, 3, 2, 2, 1, 1]);
        assert_eq!(order.len(), SHIP_COUNT);
        assert_eq!(order.iter().sum::<usize>(), FLEET_CELLS);
        assert!(!fleet.has_slot(2));
    }

    #[test]
    fn damage_sinks_on_last_cell() {
        let mut grid = Grid::new();
        let mut ship = Ship::new(ShipId::from("s"), 2);
        for x in 0..2 {
            let coord = Coordinate::new(x, 0);
            grid[coord].add_ship(ship.id().clone());
            ship.add_cell(coord);
        }
        assert_eq!(ship.damage(&mut grid), ShotResult::ShipHit);
        assert!(!ship.sunk());
        assert_eq!(ship.damage(&mut grid), ShotResult::ShipSunk);
        assert!(ship.sunk());
        assert_eq!(grid[Coordinate::new(0, 0)].state(), CellState::ShipSunk);
        assert_eq!(grid[Coordinate::new(1, 0)].state(), CellState::ShipSunk);
    }

    #[test]
    fn generated_ids_are_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = ShipId::generate(&mut rng);
        let b = ShipId::generate(&mut rng);
        assert_eq!(a.as_str().len(), GENERATED_ID_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
