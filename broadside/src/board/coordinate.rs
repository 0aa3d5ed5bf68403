//! Coordinates, axes and directions on the 10x10 grid.

use once_cell::sync::Lazy;
use rand::{
    distributions::{
        uniform::{SampleBorrow, SampleUniform, Uniform, UniformSampler},
        Distribution, Standard,
    },
    Rng,
};
use serde::{Deserialize, Serialize};

/// Width and height of every board.
pub const BOARD_SIZE: usize = 10;

/// Number of cells on a board.
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Uniform distribution over every coordinate on the board.
pub static FULL_GRID: Lazy<Uniform<Coordinate>> = Lazy::new(|| {
    Uniform::new(
        Coordinate::new(0, 0),
        Coordinate::new(BOARD_SIZE, BOARD_SIZE),
    )
});

/// The coordinates of a [`Cell`][crate::board::Cell] in the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal position of the cell.
    pub x: usize,
    /// Vertical position of the cell.
    pub y: usize,
}

impl Coordinate {
    /// Construct a [`Coordinate`] from the given `x` and `y`.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Whether this coordinate lies on the board.
    pub fn in_bounds(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// Convert to a row-major index. Returns `None` if out of bounds.
    pub fn linearize(&self) -> Option<usize> {
        if self.in_bounds() {
            Some(self.y * BOARD_SIZE + self.x)
        } else {
            None
        }
    }

    /// Get back a coordinate from a row-major index. Panics if `idx >= TOTAL_CELLS`.
    pub fn un_linearize(idx: usize) -> Self {
        assert!(idx < TOTAL_CELLS, "index {} is out of bounds", idx);
        Self {
            x: idx % BOARD_SIZE,
            y: idx / BOARD_SIZE,
        }
    }

    /// Iterate every coordinate on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..TOTAL_CELLS).map(Coordinate::un_linearize)
    }

    /// The coordinate `n` cells further along `axis`, if it is still on the board.
    pub fn step(self, axis: Axis, n: usize) -> Option<Coordinate> {
        let next = match axis {
            Axis::X => Coordinate::new(self.x.checked_add(n)?, self.y),
            Axis::Y => Coordinate::new(self.x, self.y.checked_add(n)?),
        };
        if next.in_bounds() {
            Some(next)
        } else {
            None
        }
    }

    /// The neighboring coordinate in the given direction, if it is on the board.
    pub fn offset(self, dir: Direction) -> Option<Coordinate> {
        let next = match dir {
            Direction::Up => Coordinate::new(self.x, self.y.checked_sub(1)?),
            Direction::Down => Coordinate::new(self.x, self.y + 1),
            Direction::Left => Coordinate::new(self.x.checked_sub(1)?, self.y),
            Direction::Right => Coordinate::new(self.x + 1, self.y),
        };
        if next.in_bounds() {
            Some(next)
        } else {
            None
        }
    }

    /// Like [`offset`][Coordinate::offset] but stays on the edge instead of leaving the
    /// board.
    pub fn clamped_offset(self, dir: Direction) -> Coordinate {
        self.offset(dir).unwrap_or(self)
    }

    /// Neighbors that lie along `axis`, lower index first. Cells off the board are
    /// skipped.
    pub fn neighbors_along(self, axis: Axis) -> impl Iterator<Item = Coordinate> {
        axis.directions()
            .iter()
            .filter_map(move |&dir| self.offset(dir))
    }
}

/// Sampler backing `Uniform<Coordinate>`. Samples `x` and `y` independently.
#[derive(Debug, Clone, Copy)]
pub struct UniformCoordinate {
    x: Uniform<usize>,
    y: Uniform<usize>,
}

impl UniformSampler for UniformCoordinate {
    type X = Coordinate;

    fn new<B1, B2>(low: B1, high: B2) -> Self
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let (low, high) = (low.borrow(), high.borrow());
        Self {
            x: Uniform::new(low.x, high.x),
            y: Uniform::new(low.y, high.y),
        }
    }

    fn new_inclusive<B1, B2>(low: B1, high: B2) -> Self
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let (low, high) = (low.borrow(), high.borrow());
        Self {
            x: Uniform::new_inclusive(low.x, high.x),
            y: Uniform::new_inclusive(low.y, high.y),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinate {
        Coordinate::new(self.x.sample(rng), self.y.sample(rng))
    }
}

impl SampleUniform for Coordinate {
    type Sampler = UniformCoordinate;
}

/// Orientation along which a ship extends from its anchor coordinate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal: the ship grows towards larger `x`.
    X,
    /// Vertical: the ship grows towards larger `y`.
    Y,
}

impl Axis {
    /// The other axis.
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// The two directions that move along this axis, decreasing one first.
    pub fn directions(self) -> &'static [Direction; 2] {
        match self {
            Axis::X => &[Direction::Left, Direction::Right],
            Axis::Y => &[Direction::Up, Direction::Down],
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Axis::X
    }
}

impl Distribution<Axis> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Axis {
        if rng.gen() {
            Axis::X
        } else {
            Axis::Y
        }
    }
}

/// A single step on the grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn linearize_round_trips_every_cell() {
        for (i, coord) in Coordinate::all().enumerate() {
            assert_eq!(coord.linearize(), Some(i));
        }
        assert_eq!(Coordinate::new(10, 0).linearize(), None);
    }

    #[test]
    fn step_stops_at_the_edge() {
        let start = Coordinate::new(5, 9);
        assert_eq!(start.step(Axis::X, 4), Some(Coordinate::new(9, 9)));
        assert_eq!(start.step(Axis::X, 5), None);
        assert_eq!(start.step(Axis::Y, 1), None);
    }

    #[test]
    fn neighbors_are_clipped_at_corners() {
        let corner = Coordinate::new(0, 0);
        let along_x: Vec<_> = corner.neighbors_along(Axis::X).collect();
        let along_y: Vec<_> = corner.neighbors_along(Axis::Y).collect();
        assert_eq!(along_x, vec![Coordinate::new(1, 0)]);
        assert_eq!(along_y, vec![Coordinate::new(0, 1)]);

        let middle = Coordinate::new(4, 4);
        let along_x: Vec<_> = middle.neighbors_along(Axis::X).collect();
        assert_eq!(along_x, vec![Coordinate::new(3, 4), Coordinate::new(5, 4)]);
    }

    #[test]
    fn full_grid_samples_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(rng.sample(&*FULL_GRID).in_bounds());
        }
    }

    #[test]
    fn axis_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Axis::Y).unwrap(), "\"y\"");
    }
}
