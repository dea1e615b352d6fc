use crate::board::Choice;

pub const PROTOCOL_VERSION: u8 = 2;
pub const DEFAULT_TURN_TIMEOUT_SECS: u64 = 15;

/// Version, command and payload.
pub const BASIC_PACKET_SIZE: usize = 3;
/// Basic layout plus a trailing session id.
pub const EXTENDED_PACKET_SIZE: usize = 4;
/// Receive buffer size. Anything past the extended layout is ignored.
pub const MAX_DATAGRAM_SIZE: usize = 64;

const MIN_DECODABLE_SIZE: usize = 2;
const NEW_GAME_PAYLOAD: u8 = b'0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Move,
}

impl Command {
    pub const NEW_GAME: u8 = 0x00;
    pub const MOVE: u8 = 0x01;

    pub fn to_byte(self) -> u8 {
        match self {
            Command::NewGame => Self::NEW_GAME,
            Command::Move => Self::MOVE,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            Self::NEW_GAME => Some(Command::NewGame),
            Self::MOVE => Some(Command::Move),
            _ => None,
        }
    }
}

/// A single game datagram.
///
/// The codec only cares about layout. Whether `version` is supported or
/// `payload` names a real cell is decided by the session that receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub version: u8,
    pub command: Command,
    pub payload: Option<u8>,
    pub session_id: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    #[error("datagram too short: {len} byte(s), need at least 2")]
    Truncated { len: usize },
    #[error("unknown command byte {0:#04x}")]
    UnknownCommand(u8),
}

impl Packet {
    pub fn new_game(version: u8) -> Self {
        Self {
            version,
            command: Command::NewGame,
            payload: Some(NEW_GAME_PAYLOAD),
            session_id: None,
        }
    }

    pub fn movement(version: u8, choice: Choice) -> Self {
        Self {
            version,
            command: Command::Move,
            payload: Some(choice.to_ascii()),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: u8) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Payload read as the digit a MOVE carries. Non-digits map outside 1-9
    /// so validation rejects them as out of range.
    pub fn move_number(&self) -> Option<i64> {
        self.payload.map(|byte| byte as i64 - b'0' as i64)
    }

    pub fn encoded_len(&self) -> usize {
        if self.session_id.is_some() {
            EXTENDED_PACKET_SIZE
        } else {
            BASIC_PACKET_SIZE
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.encoded_len());
        data.push(self.version);
        data.push(self.command.to_byte());
        data.push(self.payload.unwrap_or(NEW_GAME_PAYLOAD));
        if let Some(id) = self.session_id {
            data.push(id);
        }
        data
    }

    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() < MIN_DECODABLE_SIZE {
            return Err(PacketError::Truncated { len: data.len() });
        }

        let command = Command::from_byte(data[1]).ok_or(PacketError::UnknownCommand(data[1]))?;

        Ok(Self {
            version: data[0],
            command,
            payload: data.get(2).copied(),
            session_id: data.get(3).copied(),
        })
    }
}
