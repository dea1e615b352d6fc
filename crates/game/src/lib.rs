pub mod board;
pub mod net;
pub mod player;
pub mod search;
pub mod session;

pub use board::{Board, BoardParseError, CELL_COUNT, Choice, GameStatus, IllegalMove, Mark};
pub use net::{
    Command, DEFAULT_TURN_TIMEOUT_SECS, NetworkEndpoint, NetworkStats, Packet,
    PacketError, Peer, PROTOCOL_VERSION, Received, Transport,
};
pub use player::{
    LocalAi, LocalHuman, MoveSource, PlayerKind, ProtocolError, RemoteHuman, Turn, TurnError,
};
pub use search::{Evaluation, best_move};
pub use session::{
    CommitError, DropReason, Host, Role, Session, SessionConfig, SessionEvent, SessionOutcome,
    SessionReport, SessionState, Side,
};
