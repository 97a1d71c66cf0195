//! Display identifiers for log keys.
//!
//! A log id is the z-base-32 rendering of its 32-byte key (52 characters).
//! Keys can also be given as 64 hex characters.

use crate::error::{SigningError, SigningResult};

const ALPHABET: &[u8; 32] = b"ybndrfg8ejkmcpqxot1uwisza345h769";

/// Length of a normalized id.
pub const ID_LEN: usize = 52;

/// Render a key as its normalized id.
pub fn normalize(key: &[u8; 32]) -> String {
    let mut out = String::with_capacity(ID_LEN);
    let mut acc: u32 = 0;
    let mut bits = 0;

    for &byte in key {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((acc >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((acc << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

/// Parse an id (z-base-32) or hex string back into a key.
pub fn decode_key(input: &str) -> SigningResult<[u8; 32]> {
    let input = input.trim();
    match input.len() {
        64 => {
            let mut key = [0u8; 32];
            hex::decode_to_slice(input, &mut key).map_err(|e| SigningError::InvalidKey {
                reason: format!("invalid hex: {e}"),
            })?;
            Ok(key)
        }
        ID_LEN => decode_z32(input),
        n => Err(SigningError::InvalidKey {
            reason: format!("expected {ID_LEN} (id) or 64 (hex) characters, got {n}"),
        }),
    }
}

fn decode_z32(input: &str) -> SigningResult<[u8; 32]> {
    let mut key = [0u8; 32];
    let mut acc: u32 = 0;
    let mut bits = 0;
    let mut pos = 0;

    for c in input.bytes() {
        let value = ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| SigningError::InvalidKey {
                reason: format!("invalid id character: {:?}", c as char),
            })?;
        acc = (acc << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            key[pos] = (acc >> bits) as u8;
            pos += 1;
        }
    }

    // 52 * 5 = 260 bits: the last four are padding and must be zero.
    if acc & ((1 << bits) - 1) != 0 {
        return Err(SigningError::InvalidKey {
            reason: "non-canonical id padding".to_string(),
        });
    }
    Ok(key)
}
