#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

pub const MOCK_ANSWER: [u8; 4] = [93, 184, 216, 34];
pub const SPOOFED_ANSWER: [u8; 4] = [6, 6, 6, 6];

#[derive(Clone, Copy)]
enum Behavior {
    Answer,
    Silent,
    /// A reply with the wrong id, then the real one.
    WrongIdFirst,
    /// A reply with the right id from another socket, then the real one.
    ForeignSourceFirst,
}

/// Upstream answering every query for A 93.184.216.34.
pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start() -> Result<Self, std::io::Error> {
        Self::spawn(Behavior::Answer).await
    }

    /// Receives queries but never replies.
    pub async fn start_silent() -> Result<Self, std::io::Error> {
        Self::spawn(Behavior::Silent).await
    }

    /// Precedes each answer with a copy whose id is off by one.
    pub async fn start_wrong_id_first() -> Result<Self, std::io::Error> {
        Self::spawn(Behavior::WrongIdFirst).await
    }

    /// Precedes each answer with a reply for A 6.6.6.6 sent from a
    /// different port.
    pub async fn start_foreign_source_first() -> Result<Self, std::io::Error> {
        Self::spawn(Behavior::ForeignSourceFirst).await
    }

    async fn spawn(behavior: Behavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let foreign = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(AtomicUsize::new(0));
        let counter = received.clone();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            let query = &buf[..len];
                            match behavior {
                                Behavior::Answer => {}
                                Behavior::Silent => continue,
                                Behavior::WrongIdFirst => {
                                    let mut decoy = Self::build_mock_response(query, MOCK_ANSWER);
                                    if decoy.len() >= 2 {
                                        let id = u16::from_be_bytes([decoy[0], decoy[1]]).wrapping_add(1);
                                        decoy[..2].copy_from_slice(&id.to_be_bytes());
                                    }
                                    let _ = socket.send_to(&decoy, peer).await;
                                }
                                Behavior::ForeignSourceFirst => {
                                    let decoy = Self::build_mock_response(query, SPOOFED_ANSWER);
                                    let _ = foreign.send_to(&decoy, peer).await;
                                }
                            }
                            let response = Self::build_mock_response(query, MOCK_ANSWER);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    fn build_mock_response(query: &[u8], answer: [u8; 4]) -> Vec<u8> {
        if query.len() < 12 {
            return vec![];
        }

        let mut response = Vec::with_capacity(512);

        // id, QR|RD, RA
        response.extend_from_slice(&query[0..2]);
        response.push(0x81);
        response.push(0x80);

        // QDCOUNT from the query, ANCOUNT 1, NSCOUNT 0, ARCOUNT 0
        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        response.extend_from_slice(&[
            0xc0, 0x0c, // pointer to the question name
            0x00, 0x01, // A
            0x00, 0x01, // IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04, // RDLENGTH
        ]);
        response.extend_from_slice(&answer);

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
