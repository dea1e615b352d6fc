//! One match against one bound peer, and the idle loop that waits for the next.
//!
//! A host sits in `Idle` until a NEW_GAME of the supported version arrives,
//! binds the sender as its peer and runs a `Session` in `Active` until the
//! board is decided, the peer goes silent past its deadline, or the peer
//! breaks protocol. It then reports `Terminated` and goes back to `Idle`.

mod config;
mod events;
mod host;

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::board::{Board, Choice, GameStatus, IllegalMove, Mark};
use crate::net::{Packet, Peer, Transport};
use crate::player::{MoveSource, Turn, TurnError};

pub use config::{Role, SessionConfig, Side};
pub use events::{DropReason, SessionEvent, SessionOutcome};
pub use host::{Host, SessionReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Terminated(SessionOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("session is not active")]
    NotActive,
    #[error("it is not the {} side's turn", .0.as_str())]
    OutOfTurn(Side),
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
}

pub struct Session {
    peer: Peer,
    role: Role,
    board: Board,
    turn: Side,
    state: SessionState,
    config: SessionConfig,
    moves: Vec<Choice>,
    started_at: Instant,
    events: VecDeque<SessionEvent>,
}

impl Session {
    pub fn new(peer: Peer, role: Role, config: SessionConfig) -> Self {
        log::info!("Initializing shared game board with {}", peer.addr);

        let mut events = VecDeque::new();
        events.push_back(SessionEvent::PeerBound {
            addr: peer.addr,
            session_id: peer.session_id,
        });

        Self {
            peer,
            role,
            board: Board::new(),
            turn: role.first_mover(),
            state: SessionState::Active,
            config,
            moves: Vec::new(),
            started_at: Instant::now(),
            events,
        }
    }

    /// Asks the host at `addr` for a game and returns the session that
    /// follows, with the local process as player two.
    pub fn challenge(
        transport: &mut dyn Transport,
        addr: SocketAddr,
        config: SessionConfig,
        session_id: u8,
    ) -> io::Result<Self> {
        let tag = config.extended.then_some(session_id);
        let mut request = Packet::new_game(config.protocol_version);
        if let Some(id) = tag {
            request = request.with_session_id(id);
        }

        transport.send_to(&request, addr)?;
        log::info!("Requested a new game from {}", addr);

        Ok(Self::new(Peer::new(addr, tag), Role::PlayerTwo, config))
    }

    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn moves(&self) -> &[Choice] {
        &self.moves
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        match &self.state {
            SessionState::Terminated(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn mark_of(&self, side: Side) -> Mark {
        match side {
            Side::Local => self.role.mark(),
            Side::Remote => self.role.mark().opponent(),
        }
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Applies `choice` for `side` and advances the turn, or ends the session
    /// if the move decides the game.
    pub fn commit(&mut self, side: Side, choice: Choice) -> Result<GameStatus, CommitError> {
        if self.state != SessionState::Active {
            return Err(CommitError::NotActive);
        }
        if side != self.turn {
            return Err(CommitError::OutOfTurn(side));
        }

        let mark = self.mark_of(side);
        self.board.apply(choice, mark)?;
        self.moves.push(choice);
        self.events
            .push_back(SessionEvent::MovePlayed { side, mark, choice });
        log::debug!("{} played {}\n{}", mark, choice, self.board);

        let status = self.board.evaluate();
        match status {
            GameStatus::InProgress => self.turn = side.other(),
            GameStatus::Won(mark) => {
                self.finish(SessionOutcome::Won { winner: side, mark });
            }
            GameStatus::Draw => {
                self.finish(SessionOutcome::Draw);
            }
        }

        Ok(status)
    }

    /// Ends an active session because the turn could not be completed.
    pub fn abort(&mut self, error: TurnError) -> SessionOutcome {
        match &error {
            TurnError::PeerAbandoned => log::warn!("{} ran out of time to respond", self.peer.addr),
            e => log::warn!("Session with {} aborted: {}", self.peer.addr, e),
        }
        self.finish(error.into())
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        self.peer.disarm();
        self.state = SessionState::Terminated(outcome.clone());
        self.events.push_back(SessionEvent::Ended {
            outcome: outcome.clone(),
        });
        log::info!("Session with {} over: {}\n{}", self.peer.addr, outcome, self.board);
        outcome
    }

    fn send_move(&mut self, transport: &mut dyn Transport, choice: Choice) -> io::Result<usize> {
        let mut packet = Packet::movement(self.config.protocol_version, choice);
        if self.config.extended {
            if let Some(id) = self.peer.session_id {
                packet = packet.with_session_id(id);
            }
        }
        transport.send_to(&packet, self.peer.addr)
    }

    /// Runs one turn. Returns the outcome once the session has ended.
    pub fn play_turn(
        &mut self,
        transport: &mut dyn Transport,
        local: &mut dyn MoveSource,
        remote: &mut dyn MoveSource,
    ) -> Option<SessionOutcome> {
        if let Some(outcome) = self.outcome() {
            return Some(outcome.clone());
        }

        let side = self.turn;
        let mark = self.mark_of(side);
        let source: &mut dyn MoveSource = match side {
            Side::Local => local,
            Side::Remote => {
                self.peer.arm_deadline(self.config.turn_timeout);
                remote
            }
        };

        let result = {
            let mut turn = Turn {
                board: &self.board,
                mark,
                peer: &mut self.peer,
                transport: &mut *transport,
                config: &self.config,
                events: &mut self.events,
            };
            source.next_move(&mut turn)
        };
        self.peer.disarm();

        let choice = match result {
            Ok(choice) => choice,
            Err(e) => return Some(self.abort(e)),
        };

        if side == Side::Local {
            if let Err(e) = self.board.with_move(choice, mark) {
                return Some(self.abort(CommitError::from(e).into()));
            }
            if let Err(e) = self.send_move(transport, choice) {
                return Some(self.abort(e.into()));
            }
        }

        match self.commit(side, choice) {
            Ok(GameStatus::InProgress) => None,
            Ok(_) => self.outcome().cloned(),
            Err(e) => Some(self.abort(e.into())),
        }
    }

    /// Plays turns until the session ends.
    pub fn play(
        &mut self,
        transport: &mut dyn Transport,
        local: &mut dyn MoveSource,
        remote: &mut dyn MoveSource,
    ) -> SessionOutcome {
        loop {
            if let Some(outcome) = self.play_turn(transport, local, remote) {
                return outcome;
            }
        }
    }
}
