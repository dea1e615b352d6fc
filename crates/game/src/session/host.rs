use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use crate::board::{Board, Choice};
use crate::net::{Command, PacketError, Peer, Received, Transport};
use crate::player::{MoveSource, RemoteHuman};

use super::config::{Role, SessionConfig};
use super::events::{DropReason, SessionEvent, SessionOutcome};
use super::{Session, SessionState};

/// Summary of one finished session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session_id: Option<u8>,
    pub peer: SocketAddr,
    pub outcome: SessionOutcome,
    pub board: Board,
    pub moves: Vec<Choice>,
    pub duration: Duration,
}

impl SessionReport {
    fn from_session(session: &Session, outcome: SessionOutcome) -> Self {
        Self {
            session_id: session.peer().session_id,
            peer: session.peer().addr,
            outcome,
            board: *session.board(),
            moves: session.moves().to_vec(),
            duration: session.elapsed(),
        }
    }
}

/// Player one's side of the protocol: waits for a challenger, plays the
/// session out, then waits again. One session at a time.
pub struct Host<T> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
    next_session_id: u8,
    events: VecDeque<SessionEvent>,
}

impl<T: Transport> Host<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Idle,
            next_session_id: 0,
            events: VecDeque::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    fn allocate_session_id(&mut self) -> u8 {
        let id = self.next_session_id;
        self.next_session_id = self.next_session_id.wrapping_add(1);
        id
    }

    fn drop_datagram(&mut self, from: SocketAddr, reason: DropReason) {
        log::debug!("Ignoring datagram from {} while idle: {}", from, reason);
        self.events
            .push_back(SessionEvent::DatagramDropped { from, reason });
    }

    /// Blocks until a NEW_GAME of the supported version arrives and returns
    /// its sender as the peer to bind.
    pub fn wait_for_challenger(&mut self) -> io::Result<Peer> {
        self.state = SessionState::Idle;
        log::info!("Waiting for Player 2 to join...");

        loop {
            let (packet, from) = match self.transport.receive(None)? {
                Received::TimedOut => continue,
                Received::Malformed(PacketError::Truncated { .. }, from) => {
                    self.drop_datagram(from, DropReason::Truncated);
                    continue;
                }
                Received::Malformed(PacketError::UnknownCommand(_), from) => {
                    self.drop_datagram(from, DropReason::UnknownCommand);
                    continue;
                }
                Received::Packet(packet, from) => (packet, from),
            };

            if packet.version != self.config.protocol_version {
                self.drop_datagram(from, DropReason::VersionMismatch);
                continue;
            }
            if packet.command != Command::NewGame {
                self.drop_datagram(from, DropReason::NotNewGame);
                continue;
            }

            let session_id = if self.config.extended {
                Some(match packet.session_id {
                    Some(tag) => tag,
                    None => self.allocate_session_id(),
                })
            } else {
                None
            };

            log::info!("Player 2 at {} has requested a new game", from);
            return Ok(Peer::new(from, session_id));
        }
    }

    /// Waits for one challenger and plays the session to its end.
    pub fn serve_one(&mut self, local: &mut dyn MoveSource) -> io::Result<SessionReport> {
        let peer = self.wait_for_challenger()?;

        let mut session = Session::new(peer, Role::PlayerOne, self.config.clone());
        self.state = SessionState::Active;

        let mut remote = RemoteHuman::new();
        let outcome = session.play(&mut self.transport, local, &mut remote);

        self.events.extend(session.drain_events());
        self.state = SessionState::Terminated(outcome.clone());

        Ok(SessionReport::from_session(&session, outcome))
    }

    /// Serves sessions back to back for as long as the process lives, handing
    /// each report to `on_report` along with the events recorded since the
    /// last one.
    pub fn run(
        &mut self,
        local: &mut dyn MoveSource,
        mut on_report: impl FnMut(&SessionReport, Vec<SessionEvent>),
    ) -> ! {
        loop {
            match self.serve_one(local) {
                Ok(report) => {
                    let events = self.events.drain(..).collect();
                    on_report(&report, events);
                }
                Err(e) => log::error!("Receive failed while waiting for a challenger: {}", e),
            }
        }
    }
}
