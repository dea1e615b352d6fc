use std::fmt;
use std::net::SocketAddr;

use crate::board::{Choice, Mark};
use crate::player::TurnError;

use super::config::Side;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PeerBound {
        addr: SocketAddr,
        session_id: Option<u8>,
    },
    MovePlayed {
        side: Side,
        mark: Mark,
        choice: Choice,
    },
    DatagramDropped {
        from: SocketAddr,
        reason: DropReason,
    },
    Ended {
        outcome: SessionOutcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Truncated,
    ForeignPeer,
    /// NEW_GAME while a session is already running.
    SessionBusy,
    StaleSession,
    /// Anything but NEW_GAME while idle.
    NotNewGame,
    VersionMismatch,
    UnknownCommand,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Truncated => "truncated datagram",
            DropReason::ForeignPeer => "not from the bound peer",
            DropReason::SessionBusy => "a session is already active",
            DropReason::StaleSession => "tagged for another session",
            DropReason::NotNewGame => "expected a NEW_GAME request",
            DropReason::VersionMismatch => "protocol version not supported",
            DropReason::UnknownCommand => "unknown command",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Won { winner: Side, mark: Mark },
    Draw,
    PeerAbandoned,
    Aborted(TurnError),
}

impl SessionOutcome {
    pub fn is_abort(&self) -> bool {
        matches!(self, SessionOutcome::Aborted(_))
    }
}

impl From<TurnError> for SessionOutcome {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::PeerAbandoned => SessionOutcome::PeerAbandoned,
            other => SessionOutcome::Aborted(other),
        }
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Won { winner, mark } => {
                write!(f, "{} wins ({} player)", mark, winner.as_str())
            }
            SessionOutcome::Draw => write!(f, "it's a draw"),
            SessionOutcome::PeerAbandoned => write!(f, "peer abandoned the game"),
            SessionOutcome::Aborted(e) => write!(f, "aborted: {}", e),
        }
    }
}
