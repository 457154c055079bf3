//! CRC-16/XMODEM slot hashing and hash-tag extraction.

use crc16::{State, XMODEM};

/// Number of slots in the keyspace. Fixed by the protocol.
pub const NUM_SLOTS: u16 = 16384;

/// Returns the substring of `key` that should actually be hashed: the
/// contents of a `{tag}` hash tag if one is present (a `{` followed later
/// by a `}` with at least one byte between them), otherwise the whole key.
pub fn hash_tag(key: &[u8]) -> &[u8] {
    if let Some(open) = key.iter().position(|&b| b == b'{') {
        if let Some(close_rel) = key[open + 1..].iter().position(|&b| b == b'}') {
            if close_rel > 0 {
                return &key[open + 1..open + 1 + close_rel];
            }
        }
    }
    key
}

/// Maps a key to its slot: CRC-16/XMODEM (poly 0x1021, init 0x0000, no
/// reflection, no final xor) over the hash-tagged bytes, mod 16384.
pub fn slot_for_key(key: &[u8]) -> u16 {
    let tagged = hash_tag(key);
    State::<XMODEM>::calculate(tagged) % NUM_SLOTS
}
