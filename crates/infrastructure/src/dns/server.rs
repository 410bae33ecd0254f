use crate::dns::metrics::DnsMetrics;
use sieve_dns_application::use_cases::HandleDnsQueryUseCase;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Large enough for EDNS(0) clients; replies are still capped at 512 bytes.
const RECV_BUFFER_SIZE: usize = 4096;

const RECV_BACKOFF_START: Duration = Duration::from_millis(10);
const RECV_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Pause after a failed receive. Doubles per consecutive failure up to
/// [`RECV_BACKOFF_MAX`] and starts over after a successful receive.
#[derive(Debug)]
struct RecvBackoff {
    next: Duration,
}

impl RecvBackoff {
    fn new() -> Self {
        Self {
            next: RECV_BACKOFF_START,
        }
    }

    fn failed(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(RECV_BACKOFF_MAX);
        delay
    }

    fn reset(&mut self) {
        self.next = RECV_BACKOFF_START;
    }
}

/// Accept loop for inbound UDP queries.
///
/// One receive is outstanding at a time and every datagram is handled on its
/// own task, so a slow upstream never holds up other clients.
pub struct UdpDnsServer {
    socket: Arc<UdpSocket>,
    handler: Arc<HandleDnsQueryUseCase>,
    metrics: Option<Arc<DnsMetrics>>,
}

impl UdpDnsServer {
    pub fn new(socket: UdpSocket, handler: Arc<HandleDnsQueryUseCase>) -> Self {
        Self {
            socket: Arc::new(socket),
            handler,
            metrics: None,
        }
    }

    pub async fn bind(
        addr: SocketAddr,
        handler: Arc<HandleDnsQueryUseCase>,
    ) -> io::Result<Self> {
        Ok(Self::new(UdpSocket::bind(addr).await?, handler))
    }

    /// Takes a socket prepared elsewhere, e.g. with custom socket options.
    pub fn from_std(
        socket: std::net::UdpSocket,
        handler: Arc<HandleDnsQueryUseCase>,
    ) -> io::Result<Self> {
        socket.set_nonblocking(true)?;
        Ok(Self::new(UdpSocket::from_std(socket)?, handler))
    }

    pub fn with_metrics(mut self, metrics: Arc<DnsMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Runs until `shutdown` is cancelled. Per-query failures never end the loop.
    pub async fn run(self, shutdown: CancellationToken) {
        if let Ok(addr) = self.socket.local_addr() {
            info!(bind_address = %addr, "DNS server listening on UDP");
        }
        let mut recv_buf = [0u8; RECV_BUFFER_SIZE];
        let mut backoff = RecvBackoff::new();

        loop {
            let received = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                received = self.socket.recv_from(&mut recv_buf) => received,
            };

            let (len, from) = match received {
                Ok(received) => received,
                // Windows reports ICMP port-unreachable from an earlier send here.
                Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                    debug!(error = %e, "Ignoring connection reset on UDP socket");
                    continue;
                }
                Err(e) => {
                    let delay = backoff.failed();
                    error!(
                        error = %e,
                        retry_in_ms = delay.as_millis() as u64,
                        "UDP recv error"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(delay) => continue,
                    }
                }
            };
            backoff.reset();

            if let Some(metrics) = &self.metrics {
                metrics.record_request();
            }

            let datagram: Arc<[u8]> = Arc::from(&recv_buf[..len]);
            let socket = self.socket.clone();
            let handler = self.handler.clone();
            let cancel = shutdown.child_token();
            tokio::spawn(async move {
                let Some(reply) = handler.execute(from, &datagram, &cancel).await else {
                    debug!(client = %from, len = datagram.len(), "Dropping runt datagram");
                    return;
                };
                if let Err(e) = socket.send_to(&reply, from).await {
                    warn!(client = %from, error = %e, "Failed to send DNS reply");
                }
            });
        }

        info!("DNS server stopped");
    }
}
