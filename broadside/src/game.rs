//! Match orchestration on top of the boards and the targeting engine.
//!
//! [`singleplayer`] runs a match against the computer entirely in process.
//!
//! [`multiplayer`] runs the local half of a match against a remote peer; the transport
//! that carries its [`Message`][multiplayer::Message]s is up to the caller.
//!
//! Both keep turns strictly serialized: a board only ever has one attack in flight, and
//! nothing is fired once the match is over.

pub use self::errors::MatchError;

mod errors;
pub mod multiplayer;
pub mod singleplayer;

/// Lifecycle of a match.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Phase<P> {
    /// Ships are being placed.
    Setup,
    /// Shots are being exchanged.
    InProgress,
    /// The given player won.
    Finished(P),
}
