use crate::DomainError;

/// Bounds-checked cursor over a received DNS message.
///
/// Every read fails with [`DomainError::MalformedMessage`] instead of reading
/// past the end of the buffer.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), DomainError> {
        if pos > self.buf.len() {
            return Err(DomainError::MalformedMessage(format!(
                "seek to {} beyond end of {}-byte message",
                pos,
                self.buf.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DomainError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn peek_u8(&self) -> Result<u8, DomainError> {
        self.buf.get(self.pos).copied().ok_or_else(|| self.eof(1))
    }

    pub fn read_u16(&mut self) -> Result<u16, DomainError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DomainError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32, DomainError> {
        self.read_u32().map(|v| v as i32)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DomainError> {
        let end = self.pos.checked_add(len).ok_or_else(|| self.eof(len))?;
        let slice = self.buf.get(self.pos..end).ok_or_else(|| self.eof(len))?;
        self.pos = end;
        Ok(slice)
    }

    fn eof(&self, wanted: usize) -> DomainError {
        DomainError::MalformedMessage(format!(
            "need {} byte(s) at offset {}, message is {} bytes",
            wanted,
            self.pos,
            self.buf.len()
        ))
    }
}
