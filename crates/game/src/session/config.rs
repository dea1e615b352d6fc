use std::time::Duration;

use crate::board::Mark;
use crate::net::{DEFAULT_TURN_TIMEOUT_SECS, PROTOCOL_VERSION};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub protocol_version: u8,
    /// How long the remote peer has for each of its moves.
    pub turn_timeout: Duration,
    /// Tag outbound packets with the session id byte.
    pub extended: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            turn_timeout: Duration::from_secs(DEFAULT_TURN_TIMEOUT_SECS),
            extended: false,
        }
    }
}

/// Which seat the local process occupies. Player one plays X and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    PlayerOne,
    PlayerTwo,
}

impl Role {
    pub fn mark(self) -> Mark {
        match self {
            Role::PlayerOne => Mark::X,
            Role::PlayerTwo => Mark::O,
        }
    }

    pub fn first_mover(self) -> Side {
        match self {
            Role::PlayerOne => Side::Local,
            Role::PlayerTwo => Side::Remote,
        }
    }
}

/// Turn owner, seen from the local process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Local,
    Remote,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Local => Side::Remote,
            Side::Remote => Side::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Local => "local",
            Side::Remote => "remote",
        }
    }
}
