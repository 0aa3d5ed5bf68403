//! The local half of a match against a remote peer.
//!
//! Each peer owns its real board and a mirror of the opponent's. A shot travels as a
//! [`Message::Attack`]; the attacked peer resolves it on its own board, which is the
//! only authority on the result, and answers with a [`Message::Outcome`] carrying the
//! event both sides append to their logs. An attack the peer cannot accept is answered
//! with a [`Message::Rejected`] so the attacker may try again.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    board::{CannotShootReason, Coordinate, Gameboard, ShotError},
    events::{fired_by, GameEvent, PlacementRecord},
    game::{MatchError, Phase},
    validate,
};

/// Messages exchanged between peers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    /// `player_id` fires at `coordinates` on the receiver's board.
    Attack {
        coordinates: Coordinate,
        #[serde(rename = "playerId")]
        player_id: String,
    },
    /// The resolved result of the receiver's last attack.
    Outcome { event: GameEvent },
    /// `player_id` refused the receiver's attack at `coordinates`; no shot was taken.
    Rejected {
        coordinates: Coordinate,
        #[serde(rename = "playerId")]
        player_id: String,
        reason: String,
    },
    /// `player_id` cleared its boards for another round.
    Rematch {
        #[serde(rename = "playerId")]
        player_id: String,
    },
}

/// One peer's state in a networked match.
#[derive(Debug, Clone)]
pub struct Session {
    local_id: String,
    remote_id: String,

    /// The local fleet.
    player_board: Gameboard,

    /// What the local player knows about the remote fleet.
    enemy_board: Gameboard,

    /// Both players' shots, in the order they were resolved.
    events: Vec<GameEvent>,

    /// Whether the local player shoots first in a round.
    local_first: bool,

    local_turn: bool,

    /// Target of the local attack awaiting its outcome.
    pending: Option<Coordinate>,

    phase: Phase<String>,
}

impl Session {
    pub fn new(local_id: impl Into<String>, remote_id: impl Into<String>, local_first: bool) -> Self {
        Self {
            local_id: local_id.into(),
            remote_id: remote_id.into(),
            player_board: Gameboard::new(),
            enemy_board: Gameboard::new(),
            events: Vec::new(),
            local_first,
            local_turn: local_first,
            pending: None,
            phase: Phase::Setup,
        }
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn remote_id(&self) -> &str {
        &self.remote_id
    }

    pub fn player_board(&self) -> &Gameboard {
        &self.player_board
    }

    /// The local board, for placing ships. Only available during setup.
    pub fn player_board_mut(&mut self) -> Result<&mut Gameboard, MatchError> {
        match self.phase {
            Phase::Setup => Ok(&mut self.player_board),
            _ => Err(MatchError::AlreadyStarted),
        }
    }

    pub fn enemy_board(&self) -> &Gameboard {
        &self.enemy_board
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn phase(&self) -> &Phase<String> {
        &self.phase
    }

    /// Id of the winner once the match is over.
    pub fn winner(&self) -> Option<&str> {
        match self.phase {
            Phase::Finished(ref winner) => Some(winner.as_str()),
            _ => None,
        }
    }

    /// Whether the local player may attack now.
    pub fn is_local_turn(&self) -> bool {
        self.phase == Phase::InProgress && self.local_turn && self.pending.is_none()
    }

    /// Finish local setup. The local fleet must be fully placed.
    pub fn start(&mut self) -> Result<(), MatchError> {
        if self.phase != Phase::Setup {
            return Err(MatchError::AlreadyStarted);
        }
        if self.player_board.ship_length() != 0 {
            return Err(MatchError::SetupIncomplete);
        }
        self.player_board.clear_styles();
        self.phase = Phase::InProgress;
        self.local_turn = self.local_first;
        info!(local = %self.local_id, remote = %self.remote_id, "session started");
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), MatchError> {
        match self.phase {
            Phase::Setup => Err(MatchError::NotStarted),
            Phase::Finished(_) => Err(MatchError::GameOver),
            Phase::InProgress => Ok(()),
        }
    }

    /// Fire at the remote board. Returns the message to send to the peer.
    #[instrument(skip(self), fields(local = %self.local_id))]
    pub fn attack(&mut self, coord: Coordinate) -> Result<Message, MatchError> {
        self.ensure_in_progress()?;
        if self.pending.is_some() {
            return Err(MatchError::AttackPending);
        }
        if !self.local_turn {
            return Err(MatchError::NotYourTurn);
        }
        validate::coordinate(coord)?;
        if !self.enemy_board.can_attack(coord) {
            return Err(ShotError::new(CannotShootReason::AlreadyShot, coord).into());
        }
        self.pending = Some(coord);
        Ok(Message::Attack {
            coordinates: coord,
            player_id: self.local_id.clone(),
        })
    }

    /// Apply a message from the peer. Returns the reply to send back, if any.
    #[instrument(skip(self), fields(local = %self.local_id))]
    pub fn handle(&mut self, message: Message) -> Result<Option<Message>, MatchError> {
        match message {
            Message::Attack {
                coordinates,
                player_id,
            } => {
                self.check_remote(&player_id)?;
                match self.resolve_attack(coordinates) {
                    Ok(event) => Ok(Some(Message::Outcome { event })),
                    Err(err) => {
                        warn!(coord = ?coordinates, %err, "refusing incoming attack");
                        Ok(Some(Message::Rejected {
                            coordinates,
                            player_id: self.local_id.clone(),
                            reason: err.to_string(),
                        }))
                    }
                }
            }
            Message::Outcome { event } => {
                if event.player_id != self.local_id {
                    return Err(MatchError::UnknownPlayer(event.player_id));
                }
                self.ensure_in_progress()?;
                validate::events(std::slice::from_ref(&event), None)?;
                if self.pending != Some(event.coordinates) {
                    return Err(MatchError::UnexpectedOutcome(event.coordinates));
                }
                self.pending = None;
                debug!(coord = ?event.coordinates, result = ?event.result, "outgoing attack resolved");
                self.events.push(event);
                let shots: Vec<GameEvent> =
                    fired_by(&self.events, &self.local_id).cloned().collect();
                self.enemy_board.build_enemy_board(&shots);
                if self.enemy_board.all_ships_sunk() {
                    info!(winner = %self.local_id, "match over");
                    self.phase = Phase::Finished(self.local_id.clone());
                } else {
                    self.local_turn = false;
                }
                Ok(None)
            }
            Message::Rejected {
                coordinates,
                player_id,
                reason,
            } => {
                self.check_remote(&player_id)?;
                if self.pending != Some(coordinates) {
                    return Err(MatchError::UnexpectedOutcome(coordinates));
                }
                self.pending = None;
                warn!(coord = ?coordinates, %reason, "attack was refused by the peer");
                Ok(None)
            }
            Message::Rematch { player_id } => {
                self.check_remote(&player_id)?;
                self.reset();
                Ok(None)
            }
        }
    }

    /// Apply an attack by the remote player to the local board.
    fn resolve_attack(&mut self, coordinates: Coordinate) -> Result<GameEvent, MatchError> {
        self.ensure_in_progress()?;
        if self.local_turn {
            return Err(MatchError::NotYourTurn);
        }
        validate::coordinate(coordinates)?;
        let outcome = self.player_board.receive_attack(coordinates)?;
        let event = GameEvent::new(coordinates, self.remote_id.clone(), &outcome);
        debug!(coord = ?coordinates, result = ?event.result, "resolved incoming attack");
        self.events.push(event.clone());
        if outcome.all_ships_sunk {
            info!(winner = %self.remote_id, "match over");
            self.phase = Phase::Finished(self.remote_id.clone());
        } else {
            self.local_turn = true;
        }
        Ok(event)
    }

    fn check_remote(&self, player_id: &str) -> Result<(), MatchError> {
        if player_id == self.remote_id {
            Ok(())
        } else {
            Err(MatchError::UnknownPlayer(player_id.to_owned()))
        }
    }

    /// Clear both boards for another round. Returns the message telling the peer.
    pub fn rematch(&mut self) -> Message {
        self.reset();
        Message::Rematch {
            player_id: self.local_id.clone(),
        }
    }

    fn reset(&mut self) {
        self.player_board.reset();
        self.enemy_board.reset();
        self.events.clear();
        self.pending = None;
        self.local_turn = self.local_first;
        self.phase = Phase::Setup;
    }

    /// Rebuild the session from the stored local placement log and the match's event
    /// log, replacing any current state.
    pub fn rehydrate(
        &mut self,
        placements: &[PlacementRecord],
        events: &[GameEvent],
    ) -> Result<(), MatchError> {
        validate::placements(placements)?;
        if let Some(event) = events
            .iter()
            .find(|event| event.player_id != self.local_id && event.player_id != self.remote_id)
        {
            return Err(MatchError::UnknownPlayer(event.player_id.clone()));
        }
        let incoming: Vec<GameEvent> = fired_by(events, &self.remote_id).cloned().collect();
        let outgoing: Vec<GameEvent> = fired_by(events, &self.local_id).cloned().collect();
        validate::events(&incoming, Some(placements))?;
        validate::events(&outgoing, None)?;

        self.reset();
        self.player_board.build_player_board(&incoming, placements)?;
        self.enemy_board.build_enemy_board(&outgoing);
        self.events = events.to_vec();
        self.local_turn = match events.last() {
            Some(event) => event.player_id == self.remote_id,
            None => self.local_first,
        };
        self.phase = if self.enemy_board.all_ships_sunk() {
            Phase::Finished(self.local_id.clone())
        } else if self.player_board.all_ships_sunk() {
            Phase::Finished(self.remote_id.clone())
        } else if self.player_board.ship_length() == 0 {
            Phase::InProgress
        } else {
            Phase::Setup
        };
        debug!(events = events.len(), phase = ?self.phase, "rehydrated session");
        Ok(())
    }
}
