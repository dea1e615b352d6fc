use tictactoe::{PlayerKind, SessionConfig};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
    /// Who plays O on this side.
    pub player: PlayerKind,
    /// Tag sent with NEW_GAME in extended mode.
    pub session_id: u8,
}

impl ClientConfig {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
