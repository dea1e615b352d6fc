mod ai;
mod human;
mod remote;

use std::collections::VecDeque;
use std::io;

use crate::board::{Board, Choice, IllegalMove, Mark};
use crate::net::{PacketError, Peer, Transport};
use crate::session::{CommitError, SessionConfig, SessionEvent};

pub use ai::LocalAi;
pub use human::{LocalHuman, parse_number};
pub use remote::{Disposition, RemoteHuman, classify};

/// Everything a move source may look at or touch while producing one move.
pub struct Turn<'a> {
    pub board: &'a Board,
    pub mark: Mark,
    pub peer: &'a mut Peer,
    pub transport: &'a mut dyn Transport,
    pub config: &'a SessionConfig,
    pub events: &'a mut VecDeque<SessionEvent>,
}

/// Produces the next move for whoever owns the current turn.
pub trait MoveSource {
    fn name(&self) -> &str;

    /// Returns a move that is legal on `turn.board`, or the reason the
    /// session cannot continue.
    fn next_move(&mut self, turn: &mut Turn<'_>) -> Result<Choice, TurnError>;
}

/// How the local side picks its moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerKind {
    #[default]
    Ai,
    Human,
}

impl PlayerKind {
    /// Builds the local source. Humans play on stdin/stdout.
    pub fn into_source(self) -> Box<dyn MoveSource> {
        match self {
            PlayerKind::Ai => Box::new(LocalAi::new()),
            PlayerKind::Human => Box::new(LocalHuman::stdio()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("protocol version {got} not supported (expected {expected})")]
    VersionMismatch { expected: u8, got: u8 },
    #[error("malformed datagram: {0}")]
    Malformed(PacketError),
    #[error("MOVE without a payload")]
    MissingPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("peer ran out of time to respond")]
    PeerAbandoned,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("illegal move from peer: {0}")]
    IllegalRemoteMove(IllegalMove),
    #[error("local input closed")]
    InputClosed,
    #[error("no open cells left")]
    NoMovesLeft,
    #[error("local move rejected: {0}")]
    Rejected(#[from] CommitError),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<io::Error> for TurnError {
    fn from(e: io::Error) -> Self {
        TurnError::Transport(e.to_string())
    }
}
