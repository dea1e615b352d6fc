use std::net::SocketAddr;

use crate::board::{self, Board, Choice};
use crate::net::{Command, PacketError, Peer, Received};
use crate::session::{DropReason, SessionEvent};

use super::{MoveSource, ProtocolError, Turn, TurnError};

/// What to do with one receive while waiting on the bound peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Accept(Choice),
    Drop { from: SocketAddr, reason: DropReason },
    Abort(TurnError),
    Expired,
}

/// Judges a receive against the bound peer and the current board.
///
/// Anything not from the bound peer is dropped. From the bound peer, a
/// NEW_GAME or a datagram tagged for another session is dropped too; any
/// other deviation from a legal MOVE ends the session.
pub fn classify(received: Received, peer: &Peer, board: &Board, version: u8) -> Disposition {
    let (packet, from) = match received {
        Received::TimedOut => return Disposition::Expired,
        Received::Malformed(PacketError::Truncated { .. }, from) => {
            return Disposition::Drop {
                from,
                reason: DropReason::Truncated,
            };
        }
        Received::Malformed(_, from) if !peer.is(&from) => {
            return Disposition::Drop {
                from,
                reason: DropReason::ForeignPeer,
            };
        }
        Received::Malformed(e, _) => {
            return Disposition::Abort(ProtocolError::Malformed(e).into());
        }
        Received::Packet(packet, from) => (packet, from),
    };

    if !peer.is(&from) {
        return Disposition::Drop {
            from,
            reason: DropReason::ForeignPeer,
        };
    }
    if packet.command == Command::NewGame {
        return Disposition::Drop {
            from,
            reason: DropReason::SessionBusy,
        };
    }
    if !peer.accepts_tag(packet.session_id) {
        return Disposition::Drop {
            from,
            reason: DropReason::StaleSession,
        };
    }
    if packet.version != version {
        return Disposition::Abort(
            ProtocolError::VersionMismatch {
                expected: version,
                got: packet.version,
            }
            .into(),
        );
    }

    let Some(number) = packet.move_number() else {
        return Disposition::Abort(ProtocolError::MissingPayload.into());
    };
    match board::validate(number, board) {
        Ok(choice) => Disposition::Accept(choice),
        Err(e) => Disposition::Abort(TurnError::IllegalRemoteMove(e)),
    }
}

/// Waits on the transport for the bound peer's move until the turn deadline.
#[derive(Debug, Default)]
pub struct RemoteHuman;

impl RemoteHuman {
    pub fn new() -> Self {
        Self
    }
}

impl MoveSource for RemoteHuman {
    fn name(&self) -> &str {
        "remote"
    }

    fn next_move(&mut self, turn: &mut Turn<'_>) -> Result<Choice, TurnError> {
        log::info!("Waiting for {} to make a move...", turn.peer.addr);

        loop {
            let received = turn.transport.receive(turn.peer.deadline())?;

            match classify(received, turn.peer, turn.board, turn.config.protocol_version) {
                Disposition::Accept(choice) => {
                    log::info!("Peer ({}) chose {}", turn.mark, choice);
                    return Ok(choice);
                }
                Disposition::Drop { from, reason } => {
                    log::debug!("Dropped datagram from {}: {}", from, reason.as_str());
                    turn.events
                        .push_back(SessionEvent::DatagramDropped { from, reason });
                }
                Disposition::Abort(e) => return Err(e),
                Disposition::Expired => return Err(TurnError::PeerAbandoned),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::*;
    use crate::board::{IllegalMove, Mark};
    use crate::net::{PROTOCOL_VERSION, Packet};
    use crate::player::testing::ScriptedTransport;
    use crate::session::SessionConfig;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn bound() -> Peer {
        Peer::new(addr(5000), None)
    }

    fn mv(n: u8) -> Packet {
        Packet::movement(PROTOCOL_VERSION, Choice::new(n as i64).unwrap())
    }

    fn judge(received: Received) -> Disposition {
        classify(received, &bound(), &Board::new(), PROTOCOL_VERSION)
    }

    #[test]
    fn test_accepts_move_from_bound_peer() {
        assert_eq!(
            judge(Received::Packet(mv(4), addr(5000))),
            Disposition::Accept(Choice::new(4).unwrap())
        );
    }

    #[test]
    fn test_drops_foreign_peer_even_with_bad_version() {
        let mut packet = mv(4);
        packet.version = 9;

        assert_eq!(
            judge(Received::Packet(packet, addr(5001))),
            Disposition::Drop {
                from: addr(5001),
                reason: DropReason::ForeignPeer
            }
        );
        assert_eq!(
            judge(Received::Malformed(PacketError::UnknownCommand(7), addr(5001))),
            Disposition::Drop {
                from: addr(5001),
                reason: DropReason::ForeignPeer
            }
        );
    }

    #[test]
    fn test_drops_new_game_while_active() {
        for from in [addr(5000), addr(6000)] {
            assert!(matches!(
                judge(Received::Packet(Packet::new_game(PROTOCOL_VERSION), from)),
                Disposition::Drop { .. }
            ));
        }
    }

    #[test]
    fn test_drops_truncated() {
        assert_eq!(
            judge(Received::Malformed(
                PacketError::Truncated { len: 1 },
                addr(5000)
            )),
            Disposition::Drop {
                from: addr(5000),
                reason: DropReason::Truncated
            }
        );
    }

    #[test]
    fn test_drops_stale_session_tag() {
        let peer = Peer::new(addr(5000), Some(3));
        let disposition = classify(
            Received::Packet(mv(4).with_session_id(2), addr(5000)),
            &peer,
            &Board::new(),
            PROTOCOL_VERSION,
        );

        assert_eq!(
            disposition,
            Disposition::Drop {
                from: addr(5000),
                reason: DropReason::StaleSession
            }
        );
    }

    #[test]
    fn test_aborts_on_version_mismatch_from_bound_peer() {
        let mut packet = mv(4);
        packet.version = 1;

        assert_eq!(
            judge(Received::Packet(packet, addr(5000))),
            Disposition::Abort(TurnError::Protocol(ProtocolError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                got: 1
            }))
        );
    }

    #[test]
    fn test_aborts_on_bad_payloads() {
        let mut no_payload = mv(4);
        no_payload.payload = None;
        let mut zero = mv(4);
        zero.payload = Some(b'0');

        assert_eq!(
            judge(Received::Packet(no_payload, addr(5000))),
            Disposition::Abort(TurnError::Protocol(ProtocolError::MissingPayload))
        );
        assert_eq!(
            judge(Received::Packet(zero, addr(5000))),
            Disposition::Abort(TurnError::IllegalRemoteMove(IllegalMove::OutOfRange(0)))
        );
        assert!(matches!(
            judge(Received::Malformed(PacketError::UnknownCommand(9), addr(5000))),
            Disposition::Abort(TurnError::Protocol(ProtocolError::Malformed(_)))
        ));
    }

    #[test]
    fn test_aborts_on_occupied_cell() {
        let board: Board = "X........".parse().unwrap();
        let disposition = classify(
            Received::Packet(mv(1), addr(5000)),
            &bound(),
            &board,
            PROTOCOL_VERSION,
        );

        assert_eq!(
            disposition,
            Disposition::Abort(TurnError::IllegalRemoteMove(IllegalMove::Occupied(
                Choice::new(1).unwrap()
            )))
        );
    }

    #[test]
    fn test_next_move_skips_noise_and_records_drops() {
        let mut peer = bound();
        peer.arm_deadline(Duration::from_secs(5));
        let deadline = peer.deadline();
        let mut transport = ScriptedTransport::new([
            Received::Packet(mv(1), addr(6000)),
            Received::Packet(Packet::new_game(PROTOCOL_VERSION), addr(6001)),
            Received::Malformed(PacketError::Truncated { len: 0 }, addr(5000)),
            Received::Packet(mv(9), addr(5000)),
        ]);
        let config = SessionConfig::default();
        let mut events = VecDeque::new();
        let board = Board::new();
        let mut turn = Turn {
            board: &board,
            mark: Mark::O,
            peer: &mut peer,
            transport: &mut transport,
            config: &config,
            events: &mut events,
        };

        let result = RemoteHuman::new().next_move(&mut turn);

        assert_eq!(result, Ok(Choice::new(9).unwrap()));
        assert_eq!(events.len(), 3);
        assert_eq!(peer.deadline(), deadline);
    }

    #[test]
    fn test_silence_is_abandonment() {
        let mut peer = bound();
        let mut transport = ScriptedTransport::default();
        let config = SessionConfig::default();
        let mut events = VecDeque::new();
        let board = Board::new();
        let mut turn = Turn {
            board: &board,
            mark: Mark::O,
            peer: &mut peer,
            transport: &mut transport,
            config: &config,
            events: &mut events,
        };

        assert_eq!(
            RemoteHuman::new().next_move(&mut turn),
            Err(TurnError::PeerAbandoned)
        );
    }
}
