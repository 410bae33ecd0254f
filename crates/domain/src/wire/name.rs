//! Domain names and RFC 1035 §4.1.4 suffix compression.

use super::reader::WireReader;
use super::writer::WireWriter;
use crate::DomainError;
use std::fmt;
use std::str::FromStr;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

const POINTER_MARKER: u8 = 0xC0;
const POINTER_MASK: u16 = 0xC000;

/// Ordered sequence of labels. The root name has no labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DomainName {
    labels: Vec<String>,
}

impl DomainName {
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn from_labels<I, S>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut wire_len = 1;
        for label in &labels {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(
                    "empty label inside name".to_string(),
                ));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' is {} bytes (max {})",
                    label,
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
            wire_len += label.len() + 1;
        }
        if wire_len > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "name is {} bytes on the wire (max {})",
                wire_len, MAX_NAME_LEN
            )));
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Writes the name, replacing the longest already-written suffix with a
    /// single pointer.
    pub fn encode(&self, writer: &mut WireWriter) {
        for index in 0..self.labels.len() {
            let suffix = &self.labels[index..];
            if let Some(offset) = writer.name_offset(suffix) {
                writer.write_u16(POINTER_MASK | offset);
                return;
            }
            writer.record_name_offset(suffix);
            self.write_label(writer, index);
        }
        writer.write_u8(0);
    }

    /// Writes the name without consulting or updating the offset cache.
    pub fn encode_uncompressed(&self, writer: &mut WireWriter) {
        for index in 0..self.labels.len() {
            self.write_label(writer, index);
        }
        writer.write_u8(0);
    }

    fn write_label(&self, writer: &mut WireWriter, index: usize) {
        let label = self.labels[index].as_bytes();
        writer.write_u8(label.len() as u8);
        writer.write_bytes(label);
    }

    /// Reads a possibly compressed name. Afterwards the reader sits right
    /// after the first pointer (or the terminating zero when no pointer was
    /// followed).
    ///
    /// Every pointer must target an offset strictly below the previous jump,
    /// which rules out cycles.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let mut cursor = reader.clone();
        let mut resume_at: Option<usize> = None;
        let mut jump_limit = usize::MAX;
        let mut labels = Vec::new();
        let mut wire_len = 1;

        loop {
            let len = cursor.read_u8()?;
            match len & POINTER_MARKER {
                POINTER_MARKER => {
                    let low = cursor.read_u8()?;
                    let pointer_at = cursor.position() - 2;
                    let target = (((len & !POINTER_MARKER) as usize) << 8) | low as usize;
                    if target >= pointer_at || target >= jump_limit {
                        return Err(DomainError::MalformedMessage(format!(
                            "compression pointer at {} to {} does not point backwards",
                            pointer_at, target
                        )));
                    }
                    if resume_at.is_none() {
                        resume_at = Some(cursor.position());
                    }
                    jump_limit = target;
                    cursor.seek(target)?;
                }
                0x00 => {
                    if len == 0 {
                        break;
                    }
                    let bytes = cursor.read_bytes(len as usize)?;
                    wire_len += bytes.len() + 1;
                    if wire_len > MAX_NAME_LEN {
                        return Err(DomainError::MalformedMessage(format!(
                            "name exceeds {} bytes",
                            MAX_NAME_LEN
                        )));
                    }
                    let label = std::str::from_utf8(bytes).map_err(|_| {
                        DomainError::MalformedMessage("label is not valid text".to_string())
                    })?;
                    labels.push(label.to_string());
                }
                _ => {
                    return Err(DomainError::MalformedMessage(format!(
                        "reserved label type 0x{:02x} at offset {}",
                        len,
                        cursor.position() - 1
                    )));
                }
            }
        }

        reader.seek(resume_at.unwrap_or(cursor.position()))?;
        Ok(Self { labels })
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_suffix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        Self::from_labels(trimmed.split('.'))
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        write!(f, "{}", self.labels.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DomainName {
        s.parse().unwrap()
    }

    const EXAMPLE_COM: [u8; 13] = [
        0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00,
    ];

    #[test]
    fn test_encode_uncompressed_name() {
        let mut writer = WireWriter::new();
        name("example.com").encode(&mut writer);
        assert_eq!(writer.as_bytes(), &EXAMPLE_COM);
    }

    #[test]
    fn test_second_name_reuses_recorded_suffix() {
        let mut writer = WireWriter::new();
        name("example.com").encode(&mut writer);
        name("www.example.com").encode(&mut writer);

        let mut expected = EXAMPLE_COM.to_vec();
        expected.extend_from_slice(&[0x03, b'w', b'w', b'w', 0xC0, 0x00]);
        assert_eq!(writer.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_identical_name_becomes_single_pointer() {
        let mut writer = WireWriter::new();
        name("example.com").encode(&mut writer);
        name("example.com").encode(&mut writer);
        assert_eq!(&writer.as_bytes()[13..], &[0xC0, 0x00]);
    }

    #[test]
    fn test_decode_pointer_leaves_cursor_after_pointer() {
        let mut data = EXAMPLE_COM.to_vec();
        data.extend_from_slice(&[0xC0, 0x00, 0xFF]);

        let mut reader = WireReader::at(&data, 13);
        let decoded = DomainName::decode(&mut reader).unwrap();

        assert_eq!(decoded, name("example.com"));
        assert_eq!(reader.position(), 15);
    }

    #[test]
    fn test_decode_chained_pointers_resumes_after_first_pointer() {
        // 0: example.com, 13: www -> ptr(0), 19: mail -> ptr(13)
        let mut data = EXAMPLE_COM.to_vec();
        data.extend_from_slice(&[0x03, b'w', b'w', b'w', 0xC0, 0x00]);
        data.extend_from_slice(&[0x04, b'm', b'a', b'i', b'l', 0xC0, 0x0D]);

        let mut reader = WireReader::at(&data, 19);
        let decoded = DomainName::decode(&mut reader).unwrap();

        assert_eq!(decoded, name("mail.www.example.com"));
        assert_eq!(reader.position(), data.len());
    }

    #[test]
    fn test_decode_rejects_pointer_loop() {
        let data = [0x01, b'a', 0xC0, 0x00];
        let mut reader = WireReader::at(&data, 2);
        assert!(matches!(
            DomainName::decode(&mut reader),
            Err(DomainError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_decode_rejects_self_pointer() {
        let data = [0xC0, 0x00];
        let mut reader = WireReader::new(&data);
        assert!(DomainName::decode(&mut reader).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_label() {
        let data = [0x07, b'e', b'x'];
        let mut reader = WireReader::new(&data);
        assert!(DomainName::decode(&mut reader).is_err());
    }

    #[test]
    fn test_parse_rejects_long_label() {
        let label = "a".repeat(64);
        assert!(label.parse::<DomainName>().is_err());
    }

    #[test]
    fn test_parse_root_and_trailing_dot() {
        assert!(name("").is_root());
        assert!(name(".").is_root());
        assert_eq!(name("example.com."), name("example.com"));
        assert_eq!(name("example.com").to_string(), "example.com");
    }
}
