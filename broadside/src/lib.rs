//! Engine for the classic two-player Battleship game.
//!
//! The crate is split into a few layers:
//!
//! - [`board`] holds a player's [`Gameboard`][board::Gameboard]: the 10x10 grid, the
//!   fleet placed on it and every shot it has taken. Boards can be rebuilt from their
//!   placement log and the event log, which is how saved or remote matches come back.
//! - [`ships`] defines the ships and the fixed fleet composition.
//! - [`events`] has the records that cross storage and network boundaries.
//! - [`ai`] is the hunt/target opponent used by the computer player.
//! - [`validate`] checks records that did not come from a local board.
//! - [`game`] wires these together into singleplayer and networked matches.

pub mod ai;
pub mod board;
pub mod events;
pub mod game;
pub mod ships;
pub mod validate;
