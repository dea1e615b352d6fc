use tictactoe::{PlayerKind, SessionConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub session: SessionConfig,
    /// Who plays X on this side.
    pub player: PlayerKind,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
