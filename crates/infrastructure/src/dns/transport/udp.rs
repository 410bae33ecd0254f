//! Plain DNS over UDP (RFC 1035 §4.2.1).
//!
//! One socket is shared by every query this client sends and is guarded by
//! an async mutex, so queries through the same client are serialized.
//! After a question exhausts its attempts the socket is dropped and a fresh
//! one is bound on the next use.

use super::TransportOptions;
use crate::dns::load_balancer::EndpointProvider;
use async_trait::async_trait;
use sieve_dns_application::ports::DnsClient;
use sieve_dns_domain::wire::MAX_UDP_MESSAGE_SIZE;
use sieve_dns_domain::{DomainError, Message, Question};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Health of the shared socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocketState {
    #[default]
    Healthy,
    Retrying {
        failures: u32,
    },
    /// Budget spent; the next exchange binds a new socket.
    Reinitialized,
}

impl SocketState {
    pub fn on_success(self) -> Self {
        SocketState::Healthy
    }

    pub fn on_failure(self, budget: u32) -> Self {
        let failures = match self {
            SocketState::Retrying { failures } => failures + 1,
            SocketState::Healthy | SocketState::Reinitialized => 1,
        };
        if failures >= budget {
            SocketState::Reinitialized
        } else {
            SocketState::Retrying { failures }
        }
    }

    pub fn needs_new_socket(&self) -> bool {
        matches!(self, SocketState::Reinitialized)
    }
}

struct SocketSlot {
    socket: Option<UdpSocket>,
    state: SocketState,
}

pub struct UdpDnsClient {
    servers: Arc<dyn EndpointProvider<SocketAddr>>,
    options: TransportOptions,
    slot: Mutex<SocketSlot>,
}

impl UdpDnsClient {
    pub fn new(servers: Arc<dyn EndpointProvider<SocketAddr>>, options: TransportOptions) -> Self {
        Self {
            servers,
            options,
            slot: Mutex::new(SocketSlot {
                socket: None,
                state: SocketState::Healthy,
            }),
        }
    }

    pub async fn socket_state(&self) -> SocketState {
        self.slot.lock().await.state
    }

    async fn exchange(
        &self,
        slot: &mut SocketSlot,
        server: SocketAddr,
        request: &[u8],
        id: u16,
    ) -> Result<Message, DomainError> {
        let socket = ensure_socket(slot, server).await?;
        let deadline = Instant::now() + self.options.udp_timeout;

        tokio::time::timeout_at(deadline, socket.send_to(request, server))
            .await
            .map_err(|_| {
                DomainError::Transport(format!("Timeout sending UDP query to {}", server))
            })?
            .map_err(|e| {
                DomainError::Transport(format!("Failed to send UDP query to {}: {}", server, e))
            })?;

        let mut recv_buf = [0u8; MAX_UDP_MESSAGE_SIZE];
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| {
                        DomainError::Transport(format!(
                            "Timeout waiting for UDP response from {}",
                            server
                        ))
                    })?
                    .map_err(|e| {
                        DomainError::Transport(format!(
                            "Failed to receive UDP response from {}: {}",
                            server, e
                        ))
                    })?;

            if from_addr != server {
                debug!(expected = %server, received_from = %from_addr, "Ignoring datagram from unexpected source");
                continue;
            }

            let response = Message::decode(&recv_buf[..bytes_received])?;
            if response.id() != id {
                debug!(
                    server = %server,
                    expected_id = id,
                    received_id = response.id(),
                    "Ignoring stale UDP response"
                );
                continue;
            }
            return Ok(response);
        }
    }
}

async fn ensure_socket(
    slot: &mut SocketSlot,
    server: SocketAddr,
) -> Result<&UdpSocket, DomainError> {
    let family_matches = slot
        .socket
        .as_ref()
        .and_then(|s| s.local_addr().ok())
        .is_some_and(|local| local.is_ipv4() == server.is_ipv4());

    if !family_matches {
        let bind_addr: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::Transport(format!("Failed to bind UDP socket: {}", e))
        })?;
        slot.socket = Some(socket);
    }

    slot.socket
        .as_ref()
        .ok_or_else(|| DomainError::Transport("UDP socket unavailable".into()))
}

#[async_trait]
impl DnsClient for UdpDnsClient {
    async fn resolve(
        &self,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Message, DomainError> {
        let request = Message::query(fastrand::u16(..), question.clone());
        let request_bytes = request.encode()?;
        if request_bytes.len() > MAX_UDP_MESSAGE_SIZE {
            return Err(DomainError::MalformedMessage(format!(
                "Query for {} does not fit in a UDP datagram",
                question
            )));
        }

        let mut slot = tokio::select! {
            _ = cancel.cancelled() => return Err(DomainError::Cancelled),
            slot = self.slot.lock() => slot,
        };

        let attempts = self.options.attempts.max(1);
        for attempt in 1..=attempts {
            let server = self.servers.next_endpoint();
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                outcome = self.exchange(&mut slot, server, &request_bytes, request.id()) => outcome,
            };

            match outcome {
                Ok(response) => {
                    if slot.state != SocketState::Healthy {
                        info!(server = %server, "UDP socket healthy again");
                    }
                    slot.state = slot.state.on_success();
                    debug!(server = %server, question = %question, attempt, "UDP response received");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(server = %server, question = %question, attempt, error = %e, "UDP attempt failed");
                    slot.state = slot.state.on_failure(attempts);
                }
            }
        }

        if slot.state.needs_new_socket() {
            info!("Reinitializing UDP socket after exhausting attempts");
            slot.socket = None;
        }

        Err(DomainError::ClientExhausted {
            attempts,
            question: question.to_string(),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_walk_towards_reinitialization() {
        let state = SocketState::Healthy.on_failure(3);
        assert_eq!(state, SocketState::Retrying { failures: 1 });
        let state = state.on_failure(3);
        assert_eq!(state, SocketState::Retrying { failures: 2 });
        let state = state.on_failure(3);
        assert_eq!(state, SocketState::Reinitialized);
        assert!(state.needs_new_socket());
        assert_eq!(state.on_success(), SocketState::Healthy);
    }

    #[test]
    fn single_attempt_budget_reinitializes_immediately() {
        assert_eq!(SocketState::Healthy.on_failure(1), SocketState::Reinitialized);
    }

    #[test]
    fn success_mid_retry_resets_state() {
        let state = SocketState::Healthy.on_failure(3).on_success();
        assert_eq!(state, SocketState::Healthy);
    }
}
