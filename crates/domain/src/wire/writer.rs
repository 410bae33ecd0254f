use std::collections::HashMap;

/// Largest offset a compression pointer can address.
pub const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// Output buffer for one message plus the per-message name offset cache used
/// for suffix compression.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
    name_offsets: HashMap<Vec<String>, u16>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            name_offsets: HashMap::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrites two bytes already written at `pos` (used to backfill RDLENGTH).
    pub fn patch_u16(&mut self, pos: usize, value: u16) {
        if let Some(slot) = self.buf.get_mut(pos..pos + 2) {
            slot.copy_from_slice(&value.to_be_bytes());
        }
    }

    /// Suffixes are keyed on their label sequence, so a label holding a
    /// literal dot never matches the same text split into two labels.
    pub fn name_offset(&self, suffix: &[String]) -> Option<u16> {
        self.name_offsets.get(suffix).copied()
    }

    /// Records `suffix` as written at the current position. Offsets that do
    /// not fit in a pointer are not recorded.
    pub fn record_name_offset(&mut self, suffix: &[String]) {
        let pos = self.position();
        if pos <= MAX_POINTER_OFFSET && !self.name_offsets.contains_key(suffix) {
            self.name_offsets.insert(suffix.to_vec(), pos as u16);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
