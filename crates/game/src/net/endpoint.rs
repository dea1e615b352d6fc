use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use super::protocol::{MAX_DATAGRAM_SIZE, Packet, PacketError};
use super::stats::NetworkStats;

/// Result of one blocking receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Packet(Packet, SocketAddr),
    Malformed(PacketError, SocketAddr),
    TimedOut,
}

/// Datagram send/receive as the session sees it.
pub trait Transport {
    fn send_to(&mut self, packet: &Packet, addr: SocketAddr) -> io::Result<usize>;

    /// Blocks until a datagram arrives or `deadline` passes. `None` waits forever.
    fn receive(&mut self, deadline: Option<Instant>) -> io::Result<Received>;
}

pub struct NetworkEndpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
    stats: NetworkStats,
    recv_buffer: [u8; MAX_DATAGRAM_SIZE],
}

impl NetworkEndpoint {
    pub fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(false)?;

        let local_addr = socket.local_addr()?;

        Ok(Self {
            socket,
            local_addr,
            stats: NetworkStats::default(),
            recv_buffer: [0u8; MAX_DATAGRAM_SIZE],
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    /// Sends raw bytes without going through the codec.
    pub fn send_raw(&mut self, data: &[u8], addr: SocketAddr) -> io::Result<usize> {
        let bytes = self.socket.send_to(data, addr)?;
        self.stats.record_sent(bytes);
        Ok(bytes)
    }

    fn read_timeout_for(deadline: Option<Instant>) -> Option<Option<Duration>> {
        match deadline {
            None => Some(None),
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                // A zero read timeout means "block forever" to the OS.
                (!remaining.is_zero()).then_some(Some(remaining))
            }
        }
    }
}

impl Transport for NetworkEndpoint {
    fn send_to(&mut self, packet: &Packet, addr: SocketAddr) -> io::Result<usize> {
        self.send_raw(&packet.encode(), addr)
    }

    fn receive(&mut self, deadline: Option<Instant>) -> io::Result<Received> {
        let Some(timeout) = Self::read_timeout_for(deadline) else {
            self.stats.receive_timeouts += 1;
            return Ok(Received::TimedOut);
        };
        self.socket.set_read_timeout(timeout)?;

        match self.socket.recv_from(&mut self.recv_buffer) {
            Ok((size, addr)) => {
                self.stats.record_received(size);
                match Packet::decode(&self.recv_buffer[..size]) {
                    Ok(packet) => Ok(Received::Packet(packet, addr)),
                    Err(e) => {
                        self.stats.packets_malformed += 1;
                        Ok(Received::Malformed(e, addr))
                    }
                }
            }
            Err(ref e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                self.stats.receive_timeouts += 1;
                Ok(Received::TimedOut)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::protocol::{Command, PROTOCOL_VERSION};

    fn loopback() -> NetworkEndpoint {
        NetworkEndpoint::bind("127.0.0.1:0").unwrap()
    }

    #[test]
    fn test_send_and_receive() {
        let mut a = loopback();
        let mut b = loopback();

        a.send_to(&Packet::new_game(PROTOCOL_VERSION), b.local_addr())
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);

        match b.receive(Some(deadline)).unwrap() {
            Received::Packet(packet, from) => {
                assert_eq!(packet.command, Command::NewGame);
                assert_eq!(from, a.local_addr());
            }
            other => panic!("Expected packet, got {:?}", other),
        }
        assert_eq!(a.stats().packets_sent, 1);
        assert_eq!(b.stats().bytes_received, 3);
    }

    #[test]
    fn test_truncated_datagram_is_reported() {
        let mut a = loopback();
        let mut b = loopback();

        a.send_raw(&[PROTOCOL_VERSION], b.local_addr()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);

        assert_eq!(
            b.receive(Some(deadline)).unwrap(),
            Received::Malformed(PacketError::Truncated { len: 1 }, a.local_addr())
        );
        assert_eq!(b.stats().packets_malformed, 1);
    }

    #[test]
    fn test_receive_times_out() {
        let mut a = loopback();
        let start = Instant::now();

        let result = a.receive(Some(start + Duration::from_millis(50))).unwrap();

        assert_eq!(result, Received::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(a.stats().receive_timeouts, 1);
    }

    #[test]
    fn test_past_deadline_returns_immediately() {
        let mut a = loopback();
        let now = Instant::now();

        assert_eq!(a.receive(Some(now)).unwrap(), Received::TimedOut);
    }
}
