use sieve_dns_domain::{Message, RData, RecordType, ResourceRecord, ResponseCode};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy)]
pub enum MockMode {
    /// Reply with one A record pointing at the address.
    Answer(Ipv4Addr),
    /// Count queries, never reply.
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(mode: MockMode) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(AtomicUsize::new(0));
        let counter = received.clone();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);
                        let MockMode::Answer(ip) = mode else { continue };
                        if let Some(response) = build_mock_response(&buf[..len], ip) {
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
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_mock_response(query: &[u8], ip: Ipv4Addr) -> Option<Vec<u8>> {
    let request = Message::decode(query).ok()?;
    answer_for(&request, ip, 60).encode().ok()
}

/// A NOERROR reply to `request` with one A record per question.
pub fn answer_for(request: &Message, ip: Ipv4Addr, ttl: u32) -> Message {
    let mut response = Message::response_to(request, ResponseCode::NoError);
    for question in &request.questions {
        response.answers.push(ResourceRecord::new(
            question.name.clone(),
            RecordType::A,
            ttl,
            RData::A(ip),
        ));
    }
    response.sync_counts();
    response
}
