use crate::ports::DnsResolver;
use sieve_dns_domain::wire::{Flags, Header, WireReader, HEADER_LEN, MAX_UDP_MESSAGE_SIZE};
use sieve_dns_domain::{DomainError, Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Turns one inbound datagram into at most one reply datagram.
///
/// Every failure past header parsing is answered with SERVFAIL for that
/// query only; nothing here returns an error to the accept loop.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    /// Returns `None` only when the datagram is too short to carry an id.
    pub async fn execute(
        &self,
        client: SocketAddr,
        datagram: &[u8],
        cancel: &CancellationToken,
    ) -> Option<Vec<u8>> {
        let request = match Message::decode(datagram) {
            Ok(request) => request,
            Err(e) => {
                warn!(client = %client, error = %e, "Malformed DNS query");
                return header_only_servfail(datagram);
            }
        };

        let response = match self.answer(&request, client, cancel).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    client = %client,
                    id = request.id(),
                    error = %e,
                    "Resolution failed, answering SERVFAIL"
                );
                Message::response_to(&request, ResponseCode::ServFail)
            }
        };

        encode_for_udp(&response)
    }

    async fn answer(
        &self,
        request: &Message,
        client: SocketAddr,
        cancel: &CancellationToken,
    ) -> Result<Message, DomainError> {
        let question = request.single_question().ok_or_else(|| {
            DomainError::MalformedMessage(format!(
                "expected exactly one question, got {}",
                request.questions.len()
            ))
        })?;

        let resolution = self.resolver.resolve(client.ip(), question, cancel).await?;

        let Some(result) = resolution.message else {
            return Ok(Message::response_to(request, ResponseCode::ServFail));
        };

        debug!(
            client = %client,
            question = %question,
            rcode = %result.response_code(),
            blocked = resolution.blocked,
            cached = resolution.cached,
            "Query resolved"
        );

        let mut response = request.clone();
        response.header.flags.set_response(true);
        response.header.flags.set_recursion_available(true);
        response
            .header
            .flags
            .set_response_code(result.response_code());
        response.answers = result.answers.clone();
        response.authorities = result.authorities.clone();
        response.additionals = result.additionals.clone();
        response.sync_counts();
        Ok(response)
    }
}

/// Oversized replies are cut down to the header and question with TC set.
fn encode_for_udp(response: &Message) -> Option<Vec<u8>> {
    match response.encode() {
        Ok(bytes) if bytes.len() <= MAX_UDP_MESSAGE_SIZE => Some(bytes),
        Ok(bytes) => {
            debug!(
                id = response.id(),
                size = bytes.len(),
                "Response exceeds UDP limit, truncating"
            );
            let mut truncated = Message {
                header: response.header,
                questions: response.questions.clone(),
                ..Message::default()
            };
            truncated.header.flags.set_truncated(true);
            truncated.sync_counts();
            truncated.encode().ok()
        }
        Err(e) => {
            warn!(id = response.id(), error = %e, "Failed to encode response");
            let mut flags = response.header.flags;
            flags.set_response_code(ResponseCode::ServFail);
            let fallback = Message {
                header: Header::new(response.id(), flags),
                ..Message::default()
            };
            fallback.encode().ok()
        }
    }
}

/// SERVFAIL carrying only the id, opcode and RD bit of an undecodable query.
fn header_only_servfail(datagram: &[u8]) -> Option<Vec<u8>> {
    if datagram.len() < HEADER_LEN {
        return None;
    }
    let mut reader = WireReader::new(datagram);
    let request_header = Header::decode(&mut reader).ok()?;

    let mut flags = Flags::default();
    flags.set_response(true);
    flags.set_opcode(request_header.flags.opcode());
    flags.set_recursion_desired(request_header.flags.recursion_desired());
    flags.set_recursion_available(true);
    flags.set_response_code(ResponseCode::ServFail);

    Message {
        header: Header::new(request_header.id, flags),
        ..Message::default()
    }
    .encode()
    .ok()
}
