//! UDP lookup transport (RFC 1035 §4.2.1)
//!
//! One attempt per call: a fresh ephemeral socket, one datagram out, and
//! the first reply from the server with the query's id, all within the
//! timeout. Messages are limited to 512 bytes.
//! Retrying is left to [`super::RetryingLookup`].

use async_trait::async_trait;
use ferrous_resolver_application::ports::LookupTransport;
use ferrous_resolver_domain::packet_buffer::MAX_PACKET_SIZE;
use ferrous_resolver_domain::{DnsQuery, DnsResponse, DomainError};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1200);

pub struct UdpLookup {
    port: u16,
    timeout: Duration,
}

impl UdpLookup {
    pub fn new(timeout: Duration) -> Self {
        Self {
            port: DEFAULT_DNS_PORT,
            timeout,
        }
    }

    /// Send to a non-standard port, e.g. a local test server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for UdpLookup {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl LookupTransport for UdpLookup {
    async fn lookup(&self, query: &DnsQuery, server: IpAddr) -> Result<DnsResponse, DomainError> {
        let server_addr = SocketAddr::new(server, self.port);
        let io_error = |e: std::io::Error| DomainError::TransportIo {
            server: server_addr.to_string(),
            message: e.to_string(),
        };
        let timed_out = |_| DomainError::TransportTimeout {
            server: server_addr.to_string(),
        };

        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr = match server {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(bind_addr).await.map_err(io_error)?;

        let message = query.to_bytes()?;
        let bytes_sent = tokio::time::timeout(self.timeout, socket.send_to(&message, server_addr))
            .await
            .map_err(timed_out)?
            .map_err(io_error)?;

        debug!(
            server = %server_addr,
            id = query.id(),
            question = %query.question,
            bytes_sent,
            "UDP query sent"
        );

        let response = tokio::time::timeout(
            self.timeout,
            recv_matching(&socket, server_addr, query.id()),
        )
        .await
        .map_err(timed_out)??;

        debug!(
            server = %server_addr,
            rcode = %response.result_code(),
            answers = response.answers.len(),
            "UDP response received"
        );

        Ok(response)
    }
}

/// Reads datagrams until one arrives from `server` carrying `id`.
/// Datagrams from other sources or with another id are discarded.
async fn recv_matching(
    socket: &UdpSocket,
    server: SocketAddr,
    id: u16,
) -> Result<DnsResponse, DomainError> {
    let mut recv_buf = [0u8; MAX_PACKET_SIZE];
    loop {
        let (bytes_received, from_addr) =
            socket
                .recv_from(&mut recv_buf)
                .await
                .map_err(|e| DomainError::TransportIo {
                    server: server.to_string(),
                    message: e.to_string(),
                })?;

        if from_addr != server {
            warn!(
                expected = %server,
                received_from = %from_addr,
                "Discarding UDP datagram from unexpected source"
            );
            continue;
        }

        let datagram = &recv_buf[..bytes_received];
        let received_id = match datagram {
            [hi, lo, ..] => u16::from_be_bytes([*hi, *lo]),
            _ => {
                warn!(server = %server, bytes_received, "Discarding runt UDP datagram");
                continue;
            }
        };
        if received_id != id {
            warn!(
                server = %server,
                expected = id,
                received = received_id,
                "Discarding UDP response with mismatched id"
            );
            continue;
        }

        return Ok(DnsResponse::from_bytes(datagram)?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_lookup_defaults() {
        let lookup = UdpLookup::default();
        assert_eq!(lookup.port(), 53);
        assert_eq!(lookup.timeout(), Duration::from_millis(1200));
    }

    #[test]
    fn test_udp_lookup_custom_port() {
        let lookup = UdpLookup::new(Duration::from_millis(50)).with_port(5353);
        assert_eq!(lookup.port(), 5353);
        assert_eq!(lookup.timeout(), Duration::from_millis(50));
    }
}
