//! DNS message wire format (RFC 1035 §4).
//!
//! Decoding is bounds-checked throughout: inconsistent counts or lengths
//! produce [`crate::DomainError::MalformedMessage`], never a panic.

pub mod codes;
pub mod header;
pub mod message;
pub mod name;
pub mod question;
pub mod rdata;
pub mod reader;
pub mod record;
pub mod record_type;
pub mod writer;

pub use codes::{Opcode, RecordClass, ResponseCode};
pub use header::{Flags, Header, HEADER_LEN};
pub use message::Message;
pub use name::DomainName;
pub use question::Question;
pub use rdata::{MxData, RData, SoaData, SrvData};
pub use reader::WireReader;
pub use record::ResourceRecord;
pub use record_type::RecordType;
pub use writer::WireWriter;

/// Classic UDP payload limit without EDNS(0).
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;
