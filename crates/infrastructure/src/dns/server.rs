use ferrous_resolver_application::use_cases::HandleDnsQueryUseCase;
use ferrous_resolver_domain::packet_buffer::MAX_PACKET_SIZE;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

/// Accept loop for the listening UDP socket. Each datagram is handled in its
/// own task; replies go out through the shared socket.
pub struct UdpDnsServer {
    socket: Arc<UdpSocket>,
    handler: Arc<HandleDnsQueryUseCase>,
}

impl UdpDnsServer {
    pub fn new(socket: UdpSocket, handler: Arc<HandleDnsQueryUseCase>) -> Self {
        Self {
            socket: Arc::new(socket),
            handler,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Runs until the task is cancelled. Receive errors are logged and skipped.
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!(bind_address = %addr, "DNS server ready");
        }

        let mut recv_buf = [0u8; MAX_PACKET_SIZE];
        loop {
            let (len, peer) = match self.socket.recv_from(&mut recv_buf).await {
                Ok(received) => received,
                Err(e) => {
                    error!(error = %e, "UDP recv error");
                    continue;
                }
            };

            debug!(client = %peer, bytes = len, "Datagram received");

            let datagram = recv_buf[..len].to_vec();
            let handler = Arc::clone(&self.handler);
            let socket = Arc::clone(&self.socket);
            tokio::spawn(async move {
                match handler.execute(&datagram).await {
                    Some(reply) => {
                        if let Err(e) = socket.send_to(&reply, peer).await {
                            error!(client = %peer, error = %e, "Failed to send reply");
                        }
                    }
                    None => debug!(client = %peer, "No reply sent"),
                }
            });
        }
    }
}
