// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use crate::board::{Axis, Coordinate};

/// Projection of a ship onto the grid, head to tail.
pub type ShapeProjection = Vec<Coordinate>;

/// A linear ship shape, with a given length.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Line(usize);

impl Line {
    /// Construct a linear ship with the specified length.
    pub fn new(len: usize) -> Self {
        Line(len)
    }

    /// Walk the cells this line would cover from `start` along `axis`. Yields `None` for
    /// every position past the edge of the board. Does not account for whether cells are
    /// already occupied.
    pub fn project(self, start: Coordinate, axis: Axis) -> impl Iterator<Item = Option<Coordinate>> {
        (0..self.0).map(move |i| start.step(axis, i))
    }
}
