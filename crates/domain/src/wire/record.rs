use super::codes::RecordClass;
use super::name::DomainName;
use super::rdata::RData;
use super::reader::WireReader;
use super::record_type::RecordType;
use super::writer::WireWriter;
use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DomainName,
    pub rtype: RecordType,
    pub rclass: RecordClass,
    pub ttl: u32,
    pub data: RData,
}

impl ResourceRecord {
    pub fn new(name: DomainName, rtype: RecordType, ttl: u32, data: RData) -> Self {
        Self {
            name,
            rtype,
            rclass: RecordClass::IN,
            ttl,
            data,
        }
    }

    /// RDLENGTH is computed from what the payload actually wrote.
    pub fn encode(&self, writer: &mut WireWriter) -> Result<(), DomainError> {
        self.name.encode(writer);
        writer.write_u16(self.rtype.to_u16());
        writer.write_u16(self.rclass.to_u16());
        writer.write_u32(self.ttl);

        let length_at = writer.position();
        writer.write_u16(0);
        self.data.encode(writer);

        let rdlength = writer.position() - length_at - 2;
        let rdlength = u16::try_from(rdlength).map_err(|_| {
            DomainError::MalformedMessage(format!(
                "{} record payload of {} bytes does not fit RDLENGTH",
                self.rtype, rdlength
            ))
        })?;
        writer.patch_u16(length_at, rdlength);
        Ok(())
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        let name = DomainName::decode(reader)?;
        let rtype = RecordType::from_u16(reader.read_u16()?);
        let rclass = RecordClass::from_u16(reader.read_u16()?);
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;
        let data = RData::decode(reader, rclass, rtype, rdlength)?;

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            data,
        })
    }
}
