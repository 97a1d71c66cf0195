//! Compact binary encoding.
//!
//! Every wire type goes through three passes:
//!
//! 1. `preencode` accounts for the exact encoded size,
//! 2. `encode` writes into a buffer allocated from that size,
//! 3. `decode` reads back from a cursor over a borrowed slice.
//!
//! The passes must agree byte for byte; [`to_vec`] checks that in debug builds.

mod error;
mod state;

pub use error::CodecError;
pub use state::{Reader, Sizer, Writer, MAX_ARRAY_LEN};

/// A value with a canonical compact encoding.
pub trait Codec: Sized {
    fn preencode(&self, state: &mut Sizer);
    fn encode(&self, state: &mut Writer);
    fn decode(state: &mut Reader<'_>) -> Result<Self, CodecError>;
}

/// Exact encoded size of `value`.
pub fn encoded_len<T: Codec>(value: &T) -> usize {
    let mut sizer = Sizer::new();
    value.preencode(&mut sizer);
    sizer.len()
}

/// Encode `value` into an exactly-sized buffer.
pub fn to_vec<T: Codec>(value: &T) -> Vec<u8> {
    let size = encoded_len(value);
    let mut writer = Writer::with_capacity(size);
    value.encode(&mut writer);
    debug_assert_eq!(writer.len(), size, "preencode and encode disagree");
    writer.into_inner()
}
