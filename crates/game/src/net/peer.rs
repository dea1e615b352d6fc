use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// The one remote address a session talks to, and when it must answer by.
#[derive(Debug, Clone)]
pub struct Peer {
    pub addr: SocketAddr,
    pub session_id: Option<u8>,
    deadline: Option<Instant>,
}

impl Peer {
    pub fn new(addr: SocketAddr, session_id: Option<u8>) -> Self {
        Self {
            addr,
            session_id,
            deadline: None,
        }
    }

    pub fn is(&self, addr: &SocketAddr) -> bool {
        self.addr == *addr
    }

    /// Tags that do not match the session are stale. Untagged datagrams are
    /// accepted so basic-layout peers keep working in extended mode.
    pub fn accepts_tag(&self, tag: Option<u8>) -> bool {
        match (self.session_id, tag) {
            (Some(expected), Some(tag)) => expected == tag,
            _ => true,
        }
    }

    /// Starts a fresh wait: the peer has `timeout` from now to answer.
    pub fn arm_deadline(&mut self, timeout: Duration) -> Instant {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(deadline);
        deadline
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_identity_is_address_and_port() {
        let peer = Peer::new(addr(4000), None);

        assert!(peer.is(&addr(4000)));
        assert!(!peer.is(&addr(4001)));
        assert!(!peer.is(&SocketAddr::from(([10, 0, 0, 1], 4000))));
    }

    #[test]
    fn test_session_tag_matching() {
        let tagged = Peer::new(addr(4000), Some(7));
        let untagged = Peer::new(addr(4000), None);

        assert!(tagged.accepts_tag(Some(7)));
        assert!(tagged.accepts_tag(None));
        assert!(!tagged.accepts_tag(Some(8)));
        assert!(untagged.accepts_tag(Some(8)));
    }

    #[test]
    fn test_deadline_lifecycle() {
        let mut peer = Peer::new(addr(4000), None);
        assert_eq!(peer.deadline(), None);

        let before = Instant::now();
        let first = peer.arm_deadline(Duration::from_secs(60));
        assert!(first >= before + Duration::from_secs(60));
        assert_eq!(peer.deadline(), Some(first));

        let second = peer.arm_deadline(Duration::from_secs(1));
        assert!(second < first);
        assert_eq!(peer.deadline(), Some(second));

        peer.disarm();
        assert_eq!(peer.deadline(), None);
    }
}
