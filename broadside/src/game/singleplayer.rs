//! Match against the computer.
//!
//! The human's fleet is placed on [`Match::player_board_mut`] during setup; the computer
//! places its fleet at random when the match starts. The human sees the computer's
//! board only through a mirror rebuilt from the outcomes of their own shots.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    ai::TargetingEngine,
    board::{Coordinate, Gameboard},
    events::{fired_by, GameEvent, PlacementRecord},
    game::{MatchError, Phase},
    validate,
};

/// The two sides of a singleplayer match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Human,
    Computer,
}

impl Player {
    /// Id used for this side in the event log.
    pub fn id(self) -> &'static str {
        match self {
            Player::Human => "player",
            Player::Computer => "computer",
        }
    }

    /// Look up a side by its event log id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "player" => Some(Player::Human),
            "computer" => Some(Player::Computer),
            _ => None,
        }
    }

    /// Get the opponent of this player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }
}

/// A match between a human and the computer.
#[derive(Debug, Clone)]
pub struct Match {
    /// The human's fleet.
    player_board: Gameboard,

    /// The computer's fleet. Hidden from the human until the match is over.
    computer_board: Gameboard,

    /// What the human knows about the computer's board.
    enemy_board: Gameboard,

    engine: TargetingEngine,

    events: Vec<GameEvent>,

    /// Who shoots first, kept for rematches.
    first: Player,

    turn: Player,

    phase: Phase<Player>,
}

impl Match {
    /// Create a match in the setup phase.
    pub fn new(first: Player) -> Self {
        Self {
            player_board: Gameboard::new(),
            computer_board: Gameboard::new(),
            enemy_board: Gameboard::new(),
            engine: TargetingEngine::new(),
            events: Vec::new(),
            first,
            turn: first,
            phase: Phase::Setup,
        }
    }

    /// Rebuild a match from stored placement logs and its event log.
    pub fn restore(
        first: Player,
        player_placements: &[PlacementRecord],
        computer_placements: &[PlacementRecord],
        events: &[GameEvent],
    ) -> Result<Self, MatchError> {
        validate::placements(player_placements)?;
        validate::placements(computer_placements)?;
        if let Some(event) = events
            .iter()
            .find(|event| Player::from_id(&event.player_id).is_none())
        {
            return Err(MatchError::UnknownPlayer(event.player_id.clone()));
        }
        let human_shots: Vec<GameEvent> = fired_by(events, Player::Human.id()).cloned().collect();
        let computer_shots: Vec<GameEvent> =
            fired_by(events, Player::Computer.id()).cloned().collect();
        validate::events(&human_shots, Some(computer_placements))?;
        validate::events(&computer_shots, Some(player_placements))?;

        let mut game = Self::new(first);
        game.player_board
            .build_player_board(&computer_shots, player_placements)?;
        game.computer_board
            .build_player_board(&human_shots, computer_placements)?;
        game.enemy_board.build_enemy_board(&human_shots);
        game.engine.calculate_move_set(&computer_shots);
        game.events = events.to_vec();
        game.turn = events
            .last()
            .and_then(|event| Player::from_id(&event.player_id))
            .map_or(first, Player::opponent);
        game.phase = if game.computer_board.all_ships_sunk() {
            Phase::Finished(Player::Human)
        } else if game.player_board.all_ships_sunk() {
            Phase::Finished(Player::Computer)
        } else if game.player_board.ship_length() == 0 && game.computer_board.ship_length() == 0 {
            Phase::InProgress
        } else {
            Phase::Setup
        };
        debug!(events = events.len(), phase = ?game.phase, "restored match");
        Ok(game)
    }

    pub fn player_board(&self) -> &Gameboard {
        &self.player_board
    }

    /// The human's board, for placing ships. Only available during setup.
    pub fn player_board_mut(&mut self) -> Result<&mut Gameboard, MatchError> {
        match self.phase {
            Phase::Setup => Ok(&mut self.player_board),
            _ => Err(MatchError::AlreadyStarted),
        }
    }

    /// The human's view of the computer's board.
    pub fn enemy_board(&self) -> &Gameboard {
        &self.enemy_board
    }

    /// The computer's real board.
    pub fn computer_board(&self) -> &Gameboard {
        &self.computer_board
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn first(&self) -> Player {
        self.first
    }

    /// The player whose turn it currently is.
    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn phase(&self) -> &Phase<Player> {
        &self.phase
    }

    /// Returns `None` while the match is in progress, otherwise the winner.
    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Finished(winner) => Some(winner),
            _ => None,
        }
    }

    /// Finish setup. The human's fleet must be fully placed; the computer's fleet is
    /// placed at random.
    #[instrument(skip(self, rng))]
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MatchError> {
        if self.phase != Phase::Setup {
            return Err(MatchError::AlreadyStarted);
        }
        if self.player_board.ship_length() != 0 {
            return Err(MatchError::SetupIncomplete);
        }
        self.computer_board.populate_board(rng)?;
        self.player_board.clear_styles();
        self.phase = Phase::InProgress;
        self.turn = self.first;
        info!(first = ?self.first, "match started");
        Ok(())
    }

    /// Fire the human's shot at the computer's board.
    #[instrument(skip(self))]
    pub fn player_attack(&mut self, coord: Coordinate) -> Result<GameEvent, MatchError> {
        self.ensure_turn(Player::Human)?;
        validate::coordinate(coord)?;
        let outcome = self.computer_board.receive_attack(coord)?;
        let event = GameEvent::new(coord, Player::Human.id(), &outcome);
        self.record(Player::Human, event.clone(), outcome.all_ships_sunk);

        let shots: Vec<GameEvent> = fired_by(&self.events, Player::Human.id()).cloned().collect();
        self.enemy_board.build_enemy_board(&shots);
        Ok(event)
    }

    /// Let the computer choose and fire its shot at the human's board.
    #[instrument(skip(self, rng))]
    pub fn ai_attack<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GameEvent, MatchError> {
        self.ensure_turn(Player::Computer)?;
        let shots: Vec<GameEvent> =
            fired_by(&self.events, Player::Computer.id()).cloned().collect();
        self.engine.calculate_move_set(&shots);
        let coord = self
            .engine
            .get_ai_move(rng)
            .ok_or(MatchError::BoardExhausted)?;
        let outcome = self.player_board.receive_attack(coord)?;
        let event = GameEvent::new(coord, Player::Computer.id(), &outcome);
        self.record(Player::Computer, event.clone(), outcome.all_ships_sunk);
        Ok(event)
    }

    fn ensure_turn(&self, player: Player) -> Result<(), MatchError> {
        match self.phase {
            Phase::Setup => Err(MatchError::NotStarted),
            Phase::Finished(_) => Err(MatchError::GameOver),
            Phase::InProgress if self.turn != player => Err(MatchError::NotYourTurn),
            Phase::InProgress => Ok(()),
        }
    }

    fn record(&mut self, by: Player, event: GameEvent, all_ships_sunk: bool) {
        debug!(player = ?by, coord = ?event.coordinates, result = ?event.result, "shot fired");
        self.events.push(event);
        if all_ships_sunk {
            info!(winner = ?by, shots = self.events.len(), "match over");
            self.phase = Phase::Finished(by);
        } else {
            self.turn = by.opponent();
        }
    }

    /// Clear every board and the computer's memory for another round.
    pub fn rematch(&mut self, first: Player) {
        self.player_board.reset();
        self.computer_board.reset();
        self.enemy_board.reset();
        self.engine.reset();
        self.events.clear();
        self.first = first;
        self.turn = first;
        self.phase = Phase::Setup;
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::board::{CannotShootReason, CellState, TOTAL_CELLS};

    fn started(seed: u64, first: Player) -> (Match, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Match::new(first);
        game.player_board_mut()
            .unwrap()
            .populate_board(&mut rng)
            .unwrap();
        game.start(&mut rng).unwrap();
        (game, rng)
    }

    fn play_out(game: &mut Match, rng: &mut StdRng) {
        let mut targets = Coordinate::all();
        while game.winner().is_none() {
            match game.turn() {
                Player::Human => {
                    game.player_attack(targets.next().unwrap()).unwrap();
                }
                Player::Computer => {
                    game.ai_attack(rng).unwrap();
                }
            }
        }
    }

    #[test]
    fn cannot_start_without_a_fleet() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = Match::new(Player::Human);
        assert_eq!(game.start(&mut rng), Err(MatchError::SetupIncomplete));
        assert_eq!(
            game.player_attack(Coordinate::new(0, 0)),
            Err(MatchError::NotStarted)
        );
    }

    #[test]
    fn turns_alternate() {
        let (mut game, mut rng) = started(2, Player::Human);
        assert!(game.player_board_mut().is_err());
        assert_eq!(game.ai_attack(&mut rng), Err(MatchError::NotYourTurn));
        let event = game.player_attack(Coordinate::new(0, 0)).unwrap();
        assert_eq!(event.player_id, "player");
        assert_eq!(game.turn(), Player::Computer);
        assert_eq!(
            game.player_attack(Coordinate::new(1, 0)),
            Err(MatchError::NotYourTurn)
        );
        let event = game.ai_attack(&mut rng).unwrap();
        assert_eq!(event.player_id, "computer");
        assert_eq!(game.turn(), Player::Human);
        assert_eq!(game.events().len(), 2);
    }

    #[test]
    fn repeated_shot_emits_nothing() {
        let (mut game, mut rng) = started(3, Player::Human);
        game.player_attack(Coordinate::new(4, 4)).unwrap();
        game.ai_attack(&mut rng).unwrap();
        match game.player_attack(Coordinate::new(4, 4)) {
            Err(MatchError::Shot(err)) => assert_eq!(err.reason(), CannotShootReason::AlreadyShot),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(game.events().len(), 2);
        assert_eq!(game.turn(), Player::Human);
    }

    #[test]
    fn match_plays_to_completion() {
        let (mut game, mut rng) = started(4, Player::Computer);
        play_out(&mut game, &mut rng);
        let winner = game.winner().unwrap();
        let loser_board = match winner {
            Player::Human => game.computer_board(),
            Player::Computer => game.player_board(),
        };
        assert!(loser_board.all_ships_sunk());
        assert!(game.events().len() <= 2 * TOTAL_CELLS);
        assert_eq!(
            game.player_attack(Coordinate::new(9, 9)),
            Err(MatchError::GameOver)
        );
    }

    #[test]
    fn mirror_tracks_the_computer_board() {
        let (mut game, mut rng) = started(5, Player::Human);
        play_out(&mut game, &mut rng);
        for coord in game.enemy_board().hits().iter() {
            let seen = game.enemy_board().cell(*coord).unwrap().state();
            let real = game.computer_board().cell(*coord).unwrap().state();
            assert_eq!(seen, real, "mismatch at {:?}", coord);
        }
        for coord in Coordinate::all() {
            if !game.enemy_board().hits().contains(&coord) {
                assert_eq!(game.enemy_board().cell(coord).unwrap().state(), CellState::Empty);
            }
        }
    }

    #[test]
    fn restore_rebuilds_the_same_match() {
        let (mut game, mut rng) = started(6, Player::Human);
        for _ in 0..20 {
            let target = Coordinate::all()
                .find(|coord| game.computer_board().can_attack(*coord))
                .unwrap();
            game.player_attack(target).unwrap();
            game.ai_attack(&mut rng).unwrap();
        }
        let restored = Match::restore(
            game.first(),
            game.player_board().placements(),
            game.computer_board().placements(),
            game.events(),
        )
        .unwrap();
        assert_eq!(restored.phase(), &Phase::InProgress);
        assert_eq!(restored.turn(), Player::Human);
        assert_eq!(restored.events(), game.events());
        for coord in Coordinate::all() {
            assert_eq!(
                restored.player_board().cell(coord).unwrap().state(),
                game.player_board().cell(coord).unwrap().state()
            );
            assert_eq!(
                restored.enemy_board().cell(coord).unwrap().state(),
                game.enemy_board().cell(coord).unwrap().state()
            );
        }
    }

    #[test]
    fn restore_rejects_unknown_players() {
        let (mut game, _) = started(7, Player::Human);
        let mut event = game.player_attack(Coordinate::new(0, 0)).unwrap();
        event.player_id = "mallory".into();
        assert_eq!(
            Match::restore(
                Player::Human,
                game.player_board().placements(),
                game.computer_board().placements(),
                &[event],
            )
            .unwrap_err(),
            MatchError::UnknownPlayer("mallory".into())
        );
    }

    #[test]
    fn rematch_starts_over() {
        let (mut game, mut rng) = started(8, Player::Human);
        play_out(&mut game, &mut rng);
        game.rematch(Player::Computer);
        assert_eq!(game.phase(), &Phase::Setup);
        assert!(game.events().is_empty());
        assert_eq!(game.player_board().ship_length(), 5);
        assert!(game.enemy_board().hits().is_empty());
        assert_eq!(game.turn(), Player::Computer);

        game.player_board_mut()
            .unwrap()
            .populate_board(&mut rng)
            .unwrap();
        game.start(&mut rng).unwrap();
        assert!(game.ai_attack(&mut rng).is_ok());
    }
}
