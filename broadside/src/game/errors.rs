use thiserror::Error;

use crate::{
    board::{Coordinate, PlaceError, PopulateError, ShotError},
    validate::ValidationError,
};

/// Reason an orchestrator refused an action. A refused action emits no event.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum MatchError {
    /// Ships are still being placed.
    #[error("the match has not started")]
    NotStarted,

    #[error("the match has already started")]
    AlreadyStarted,

    /// The local fleet is not fully placed.
    #[error("not every ship has been placed")]
    SetupIncomplete,

    #[error("player attempted to shoot out of turn")]
    NotYourTurn,

    #[error("the match is already over")]
    GameOver,

    /// The previous attack has not been answered yet.
    #[error("waiting for the outcome of the previous attack")]
    AttackPending,

    /// An outcome arrived for a shot that was never fired.
    #[error("received an outcome for {0:?}, which was not attacked")]
    UnexpectedOutcome(Coordinate),

    #[error("message from unknown player {0:?}")]
    UnknownPlayer(String),

    /// The targeting engine has fired at every cell.
    #[error("no cells are left to attack")]
    BoardExhausted,

    #[error(transparent)]
    Shot(#[from] ShotError),

    #[error(transparent)]
    Place(#[from] PlaceError),

    #[error(transparent)]
    Populate(#[from] PopulateError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
