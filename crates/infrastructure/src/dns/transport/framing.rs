use sieve_dns_domain::DomainError;
use std::io::ErrorKind;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Writes a DNS message behind its two-byte big-endian length (RFC 1035 §4.2.2).
pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::MalformedMessage(format!(
            "Message too large for a length prefix: {} bytes",
            message_bytes.len()
        ))
    })?;

    let mut frame = Vec::with_capacity(message_bytes.len() + 2);
    frame.extend_from_slice(&length.to_be_bytes());
    frame.extend_from_slice(message_bytes);

    stream
        .write_all(&frame)
        .await
        .map_err(|e| io_failure("Failed to write DNS message", e))?;
    stream
        .flush()
        .await
        .map_err(|e| io_failure("Failed to flush stream", e))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| io_failure("Failed to read response length", e))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| io_failure("Failed to read response body", e))?;

    Ok(response)
}

fn io_failure(context: &str, err: std::io::Error) -> DomainError {
    match err.kind() {
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::BrokenPipe => {
            DomainError::ConnectionClosed(format!("{}: {}", context, err))
        }
        _ => DomainError::Transport(format!("{}: {}", context, err)),
    }
}
