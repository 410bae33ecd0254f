//! Typed record payloads. Decoding picks a variant from (class, type) and
//! falls back to [`RData::Unknown`] for anything not interpreted here.

use super::codes::RecordClass;
use super::name::DomainName;
use super::reader::WireReader;
use super::record_type::RecordType;
use super::writer::WireWriter;
use crate::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    pub mname: DomainName,
    pub rname: DomainName,
    pub serial: u32,
    pub refresh: i32,
    pub retry: i32,
    pub expire: i32,
    pub minimum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxData {
    pub preference: u16,
    pub exchange: DomainName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: DomainName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(DomainName),
    CNAME(DomainName),
    PTR(DomainName),
    SOA(SoaData),
    MX(MxData),
    SRV(SrvData),
    Unknown(Vec<u8>),
}

impl RData {
    /// Writes the payload only; the caller owns the RDLENGTH prefix.
    pub fn encode(&self, writer: &mut WireWriter) {
        match self {
            RData::A(addr) => writer.write_bytes(&addr.octets()),
            RData::AAAA(addr) => writer.write_bytes(&addr.octets()),
            RData::NS(name) | RData::CNAME(name) | RData::PTR(name) => name.encode(writer),
            RData::SOA(soa) => {
                soa.mname.encode(writer);
                soa.rname.encode(writer);
                writer.write_u32(soa.serial);
                writer.write_i32(soa.refresh);
                writer.write_i32(soa.retry);
                writer.write_i32(soa.expire);
                writer.write_u32(soa.minimum);
            }
            RData::MX(mx) => {
                writer.write_u16(mx.preference);
                mx.exchange.encode(writer);
            }
            RData::SRV(srv) => {
                writer.write_u16(srv.priority);
                writer.write_u16(srv.weight);
                writer.write_u16(srv.port);
                // RFC 2782: the target is never compressed
                srv.target.encode_uncompressed(writer);
            }
            RData::Unknown(bytes) => writer.write_bytes(bytes),
        }
    }

    /// Reads exactly `rdlength` bytes of payload.
    pub fn decode(
        reader: &mut WireReader<'_>,
        rclass: RecordClass,
        rtype: RecordType,
        rdlength: u16,
    ) -> Result<Self, DomainError> {
        let rdlength = rdlength as usize;
        if reader.remaining() < rdlength {
            return Err(DomainError::MalformedMessage(format!(
                "RDLENGTH {} exceeds remaining {} bytes",
                rdlength,
                reader.remaining()
            )));
        }

        let start = reader.position();
        let data = match (rclass, rtype) {
            (RecordClass::IN, RecordType::A) => {
                let b = reader.read_bytes(4)?;
                RData::A(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
            }
            (RecordClass::IN, RecordType::AAAA) => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(reader.read_bytes(16)?);
                RData::AAAA(Ipv6Addr::from(octets))
            }
            (RecordClass::IN, RecordType::NS) => RData::NS(DomainName::decode(reader)?),
            (RecordClass::IN, RecordType::CNAME) => RData::CNAME(DomainName::decode(reader)?),
            (RecordClass::IN, RecordType::PTR) => RData::PTR(DomainName::decode(reader)?),
            (RecordClass::IN, RecordType::SOA) => RData::SOA(SoaData {
                mname: DomainName::decode(reader)?,
                rname: DomainName::decode(reader)?,
                serial: reader.read_u32()?,
                refresh: reader.read_i32()?,
                retry: reader.read_i32()?,
                expire: reader.read_i32()?,
                minimum: reader.read_u32()?,
            }),
            (RecordClass::IN, RecordType::MX) => RData::MX(MxData {
                preference: reader.read_u16()?,
                exchange: DomainName::decode(reader)?,
            }),
            (RecordClass::IN, RecordType::SRV) => RData::SRV(SrvData {
                priority: reader.read_u16()?,
                weight: reader.read_u16()?,
                port: reader.read_u16()?,
                target: DomainName::decode(reader)?,
            }),
            _ => RData::Unknown(reader.read_bytes(rdlength)?.to_vec()),
        };

        let consumed = reader.position() - start;
        if consumed != rdlength {
            return Err(DomainError::MalformedMessage(format!(
                "{} record payload used {} bytes, RDLENGTH says {}",
                rtype, consumed, rdlength
            )));
        }
        Ok(data)
    }
}
