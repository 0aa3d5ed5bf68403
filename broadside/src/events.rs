//! Records exchanged with storage and the opponent: ship placements, attack outcomes
//! and the append-only log of game events.
//!
//! All of these serialize with camelCase field names, which is the shape the transport
//! and storage layers expect.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    board::{Axis, Coordinate, ShotResult},
    ships::ShipId,
};

/// One entry of a board's placement log. Replaying a board's records in order
/// reproduces its ship layout, including the ship ids.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub coordinates: Coordinate,
    pub axis: Axis,
    pub ship_length: usize,
    pub ship_id: ShipId,
}

/// Result of a successful attack on a board. This is the only authority on whether a
/// shot hit; transports relay it, they do not recompute it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub result: ShotResult,
    /// The ship that was hit. `None` on a miss.
    pub ship_id: Option<ShipId>,
    /// True exactly when this attack sank the last ship on the board.
    pub all_ships_sunk: bool,
}

/// A single attack in the match history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub coordinates: Coordinate,
    /// The player who fired the shot.
    pub player_id: String,
    pub result: ShotResult,
    pub ship_id: Option<ShipId>,
}

impl GameEvent {
    /// Build the event for an attack by `player_id` at `coordinates`.
    pub fn new(coordinates: Coordinate, player_id: impl Into<String>, outcome: &AttackOutcome) -> Self {
        Self {
            coordinates,
            player_id: player_id.into(),
            result: outcome.result,
            ship_id: outcome.ship_id.clone(),
        }
    }
}

/// Upgrade every hit on a ship that is reported sunk later in the log to
/// [`ShotResult::ShipSunk`].
///
/// A ship only sinks when its last cell is hit, so the log shows its earlier cells as
/// plain hits. Walking the log backwards, once a sink event for a ship has been seen,
/// every earlier event naming that ship is rewritten.
pub fn reconcile_sunk(events: &[GameEvent]) -> Vec<GameEvent> {
    let mut sunk = HashSet::new();
    let mut reconciled: Vec<GameEvent> = events
        .iter()
        .rev()
        .map(|event| {
            let mut event = event.clone();
            if let Some(ref id) = event.ship_id {
                if event.result == ShotResult::ShipSunk {
                    sunk.insert(id.clone());
                } else if sunk.contains(id) {
                    event.result = ShotResult::ShipSunk;
                }
            }
            event
        })
        .collect();
    reconciled.reverse();
    reconciled
}

/// Events fired by the given player, in log order.
pub fn fired_by<'a>(
    events: &'a [GameEvent],
    player_id: &'a str,
) -> impl 'a + Iterator<Item = &'a GameEvent> {
    events.iter().filter(move |event| event.player_id == player_id)
}
