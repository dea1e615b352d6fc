mod endpoint;
mod peer;
mod protocol;
mod stats;

pub use endpoint::{NetworkEndpoint, Received, Transport};
pub use peer::Peer;
pub use protocol::{
    BASIC_PACKET_SIZE, Command, DEFAULT_TURN_TIMEOUT_SECS, EXTENDED_PACKET_SIZE,
    MAX_DATAGRAM_SIZE, PROTOCOL_VERSION, Packet, PacketError,
};
pub use stats::NetworkStats;
