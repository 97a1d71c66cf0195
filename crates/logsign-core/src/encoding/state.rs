//! Preencode / encode / decode states and the compact primitives.
//!
//! Integer layout (little-endian payloads):
//!
//! ```text
//! n <= 0xfc         -> [n]
//! n <= 0xffff       -> [0xfd, u16]
//! n <= 0xffff_ffff  -> [0xfe, u32]
//! otherwise         -> [0xff, u64]
//! ```

use super::error::CodecError;
use super::Codec;

/// Upper bound on any decoded array length.
pub const MAX_ARRAY_LEN: u64 = 0x10_0000;

const U16_TAG: u8 = 0xfd;
const U32_TAG: u8 = 0xfe;
const U64_TAG: u8 = 0xff;

fn uint_len(n: u64) -> usize {
    if n <= 0xfc {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Size accumulator for the preencode pass.
#[derive(Debug, Default)]
pub struct Sizer {
    end: usize,
}

impl Sizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes accounted for so far.
    pub fn len(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    pub fn raw(&mut self, n: usize) {
        self.end += n;
    }

    pub fn uint(&mut self, n: u64) {
        self.end += uint_len(n);
    }

    pub fn uint8(&mut self) {
        self.end += 1;
    }

    pub fn uint64(&mut self) {
        self.end += 8;
    }

    pub fn fixed32(&mut self) {
        self.end += 32;
    }

    pub fn array<T: Codec>(&mut self, items: &[T]) {
        self.uint(items.len() as u64);
        for item in items {
            item.preencode(self);
        }
    }
}

/// Append-only output buffer for the encode pass.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Allocate exactly `capacity` bytes (the preencode result).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn uint(&mut self, n: u64) {
        if n <= 0xfc {
            self.buf.push(n as u8);
        } else if n <= 0xffff {
            self.buf.push(U16_TAG);
            self.buf.extend_from_slice(&(n as u16).to_le_bytes());
        } else if n <= 0xffff_ffff {
            self.buf.push(U32_TAG);
            self.buf.extend_from_slice(&(n as u32).to_le_bytes());
        } else {
            self.buf.push(U64_TAG);
            self.buf.extend_from_slice(&n.to_le_bytes());
        }
    }

    pub fn uint8(&mut self, n: u8) {
        self.buf.push(n);
    }

    pub fn uint64(&mut self, n: u64) {
        self.buf.extend_from_slice(&n.to_le_bytes());
    }

    pub fn fixed32(&mut self, bytes: &[u8; 32]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn array<T: Codec>(&mut self, items: &[T]) {
        self.uint(items.len() as u64);
        for item in items {
            item.encode(self);
        }
    }
}

/// Cursor over a borrowed buffer for the decode pass.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    start: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, start: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.start
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.start
    }

    pub fn is_exhausted(&self) -> bool {
        self.start == self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::OutOfBounds {
                needed: n,
                remaining,
            });
        }
        let out = &self.buf[self.start..self.start + n];
        self.start += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn uint8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn uint(&mut self) -> Result<u64, CodecError> {
        match self.uint8()? {
            U16_TAG => Ok(u64::from(u16::from_le_bytes(self.take_array()?))),
            U32_TAG => Ok(u64::from(u32::from_le_bytes(self.take_array()?))),
            U64_TAG => Ok(u64::from_le_bytes(self.take_array()?)),
            n => Ok(u64::from(n)),
        }
    }

    pub fn uint64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn fixed32(&mut self) -> Result<[u8; 32], CodecError> {
        self.take_array()
    }

    pub fn array<T: Codec>(&mut self) -> Result<Vec<T>, CodecError> {
        let len = self.uint()?;
        if len > MAX_ARRAY_LEN {
            return Err(CodecError::ArrayTooLarge {
                len,
                max: MAX_ARRAY_LEN,
            });
        }
        // Every item takes at least one byte, so the remaining length bounds
        // the allocation for hostile prefixes.
        let mut items = Vec::with_capacity((len as usize).min(self.remaining()));
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }
}
