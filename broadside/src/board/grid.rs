//! Defines the grid of cells owned by a [`Gameboard`][crate::board::Gameboard].

use std::ops::{Index, IndexMut};

use crate::board::{Cell, Coordinate, BOARD_SIZE, TOTAL_CELLS};

/// Row-major storage for the 10x10 cells of a board.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    cells: Box<[Cell]>,
}

impl Grid {
    pub(crate) fn new() -> Self {
        let cells = (0..TOTAL_CELLS)
            .map(|i| Cell::new(Coordinate::un_linearize(i)))
            .collect();
        Self { cells }
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(crate) fn get(&self, coord: Coordinate) -> Option<&Cell> {
        coord.linearize().and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(crate) fn get_mut(&mut self, coord: Coordinate) -> Option<&mut Cell> {
        coord.linearize().and_then(move |i| self.cells.get_mut(i))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Iterate the rows of the grid, top to bottom.
    pub(crate) fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(BOARD_SIZE)
    }
}

impl Index<Coordinate> for Grid {
    type Output = Cell;

    fn index(&self, coord: Coordinate) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}

impl IndexMut<Coordinate> for Grid {
    fn index_mut(&mut self, coord: Coordinate) -> &mut Self::Output {
        self.get_mut(coord).expect("coordinate out of bounds")
    }
}
