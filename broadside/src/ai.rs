//! Hunt/target opponent for the computer player.
//!
//! While no unresolved hit is known the engine searches: it picks a uniformly random
//! cell it has not fired at yet. Once a hit on a ship that has not sunk shows up in the
//! history, it switches to hunting and tries the neighbors of those hits first. Two
//! unresolved hits in a row or column fix the direction of the ship, so neighbors along
//! that line are queued ahead of the others.

use std::collections::{HashSet, VecDeque};

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, trace};

use crate::{
    board::{Axis, CellState, Coordinate, ShotResult, TOTAL_CELLS},
    events::{reconcile_sunk, GameEvent},
};

/// Computes the computer's next shot from the outcomes of its previous ones.
#[derive(Debug, Clone)]
pub struct TargetingEngine {
    /// What the engine knows about each cell of the opponent's board, row-major.
    tracking: Box<[CellState]>,

    /// Cells to try next while hunting, front first.
    candidates: VecDeque<Coordinate>,

    /// Hits on ships not yet known to be sunk, oldest first.
    unresolved: Vec<Coordinate>,

    /// Every cell the engine has fired at or learned about.
    attacked: HashSet<Coordinate>,
}

impl TargetingEngine {
    pub fn new() -> Self {
        Self {
            tracking: vec![CellState::Empty; TOTAL_CELLS].into_boxed_slice(),
            candidates: VecDeque::new(),
            unresolved: Vec::new(),
            attacked: HashSet::new(),
        }
    }

    /// Hits on ships that are still afloat, oldest first.
    pub fn unresolved_hits(&self) -> &[Coordinate] {
        &self.unresolved
    }

    /// Cells queued for hunting, in the order they will be tried.
    pub fn candidates(&self) -> impl Iterator<Item = &Coordinate> {
        self.candidates.iter()
    }

    /// What the engine knows about `coord`.
    pub fn tracked(&self, coord: Coordinate) -> Option<CellState> {
        coord.linearize().map(|i| self.tracking[i])
    }

    /// Recompute the engine's view from the full history of its own shots.
    pub fn calculate_move_set(&mut self, events: &[GameEvent]) {
        self.unresolved.clear();
        for event in reconcile_sunk(events) {
            let coord = event.coordinates;
            let idx = match coord.linearize() {
                Some(idx) => idx,
                None => continue,
            };
            self.tracking[idx] = event.result.into();
            self.attacked.insert(coord);
            if event.result == ShotResult::ShipHit {
                self.unresolved.push(coord);
            }
        }

        let preference = self.axis_preference();
        let order = match preference {
            Some(axis) => [axis, axis.other()],
            None => [Axis::X, Axis::Y],
        };
        self.candidates.clear();
        for &axis in order.iter() {
            for &hit in self.unresolved.iter().rev() {
                for neighbor in hit.neighbors_along(axis) {
                    if self.is_open(neighbor) && !self.candidates.contains(&neighbor) {
                        self.candidates.push_back(neighbor);
                    }
                }
            }
        }
        trace!(
            unresolved = self.unresolved.len(),
            candidates = self.candidates.len(),
            ?preference,
            "recalculated move set"
        );
    }

    /// The axis the two most recent unresolved hits lie along, if they share a row or a
    /// column.
    fn axis_preference(&self) -> Option<Axis> {
        match self.unresolved.as_slice() {
            [.., a, b] if a.x == b.x => Some(Axis::Y),
            [.., a, b] if a.y == b.y => Some(Axis::X),
            _ => None,
        }
    }

    /// Whether `coord` may still hold an unseen ship and has not been fired at.
    fn is_open(&self, coord: Coordinate) -> bool {
        self.tracked(coord) == Some(CellState::Empty) && !self.attacked.contains(&coord)
    }

    /// Choose the next cell to fire at and remember it. Returns `None` once every cell
    /// on the board has been fired at.
    pub fn get_ai_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coordinate> {
        if self.attacked.len() >= TOTAL_CELLS {
            return None;
        }
        while let Some(coord) = self.candidates.pop_front() {
            if self.attacked.insert(coord) {
                debug!(?coord, "hunting");
                return Some(coord);
            }
        }
        let open: Vec<Coordinate> = Coordinate::all()
            .filter(|coord| !self.attacked.contains(coord))
            .collect();
        let coord = *open.choose(rng)?;
        self.attacked.insert(coord);
        debug!(?coord, "searching");
        Some(coord)
    }

    /// Forget everything, ready for a new round.
    pub fn reset(&mut self) {
        for state in self.tracking.iter_mut() {
            *state = CellState::Empty;
        }
        self.candidates.clear();
        self.unresolved.clear();
        self.attacked.clear();
    }
}

impl Default for TargetingEngine {
    fn default() -> Self {
        Self::new()
    }
}
