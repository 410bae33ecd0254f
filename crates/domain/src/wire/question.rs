use super::codes::RecordClass;
use super::name::DomainName;
use super::reader::WireReader;
use super::record_type::RecordType;
use super::writer::WireWriter;
use crate::DomainError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub name: DomainName,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl Question {
    pub fn new(name: DomainName, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            name,
            qtype,
            qclass,
        }
    }

    /// Internet-class question for `domain`.
    pub fn internet(domain: &str, qtype: RecordType) -> Result<Self, DomainError> {
        Ok(Self::new(domain.parse()?, qtype, RecordClass::IN))
    }

    pub fn encode(&self, writer: &mut WireWriter) {
        self.name.encode(writer);
        writer.write_u16(self.qtype.to_u16());
        writer.write_u16(self.qclass.to_u16());
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let name = DomainName::decode(reader)?;
        let qtype = RecordType::from_u16(reader.read_u16()?);
        let qclass = RecordClass::from_u16(reader.read_u16()?);
        Ok(Self::new(name, qtype, qclass))
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}
