use super::codes::{Opcode, ResponseCode};
use super::reader::WireReader;
use super::writer::WireWriter;
use crate::DomainError;

pub const HEADER_LEN: usize = 12;

const FLAG_QR: u16 = 0x8000;
const OPCODE_MASK: u16 = 0x7800;
const OPCODE_SHIFT: u16 = 11;
const FLAG_AA: u16 = 0x0400;
const FLAG_TC: u16 = 0x0200;
const FLAG_RD: u16 = 0x0100;
const FLAG_RA: u16 = 0x0080;
const FLAG_Z: u16 = 0x0040;
const RCODE_MASK: u16 = 0x000F;

/// The 16-bit flags word of the header. Each accessor touches only its own bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u16);

impl Flags {
    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    fn set(&mut self, mask: u16, on: bool) {
        if on {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    pub fn is_response(&self) -> bool {
        self.0 & FLAG_QR != 0
    }

    pub fn set_response(&mut self, on: bool) {
        self.set(FLAG_QR, on);
    }

    pub fn opcode(&self) -> Opcode {
        Opcode::from_u8(((self.0 & OPCODE_MASK) >> OPCODE_SHIFT) as u8)
    }

    pub fn set_opcode(&mut self, opcode: Opcode) {
        self.0 = (self.0 & !OPCODE_MASK) | ((opcode.to_u8() as u16) << OPCODE_SHIFT);
    }

    pub fn is_authoritative(&self) -> bool {
        self.0 & FLAG_AA != 0
    }

    pub fn set_authoritative(&mut self, on: bool) {
        self.set(FLAG_AA, on);
    }

    pub fn is_truncated(&self) -> bool {
        self.0 & FLAG_TC != 0
    }

    pub fn set_truncated(&mut self, on: bool) {
        self.set(FLAG_TC, on);
    }

    pub fn recursion_desired(&self) -> bool {
        self.0 & FLAG_RD != 0
    }

    pub fn set_recursion_desired(&mut self, on: bool) {
        self.set(FLAG_RD, on);
    }

    pub fn recursion_available(&self) -> bool {
        self.0 & FLAG_RA != 0
    }

    pub fn set_recursion_available(&mut self, on: bool) {
        self.set(FLAG_RA, on);
    }

    pub fn z(&self) -> bool {
        self.0 & FLAG_Z != 0
    }

    pub fn set_z(&mut self, on: bool) {
        self.set(FLAG_Z, on);
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from_u8((self.0 & RCODE_MASK) as u8)
    }

    pub fn set_response_code(&mut self, rcode: ResponseCode) {
        self.0 = (self.0 & !RCODE_MASK) | rcode.to_u8() as u16;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    pub fn new(id: u16, flags: Flags) -> Self {
        Self {
            id,
            flags,
            ..Self::default()
        }
    }

    pub fn encode(&self, writer: &mut WireWriter) {
        writer.write_u16(self.id);
        writer.write_u16(self.flags.bits());
        writer.write_u16(self.question_count);
        writer.write_u16(self.answer_count);
        writer.write_u16(self.authority_count);
        writer.write_u16(self.additional_count);
    }

    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        Ok(Self {
            id: reader.read_u16()?,
            flags: Flags::from_bits(reader.read_u16()?),
            question_count: reader.read_u16()?,
            answer_count: reader.read_u16()?,
            authority_count: reader.read_u16()?,
            additional_count: reader.read_u16()?,
        })
    }
}
