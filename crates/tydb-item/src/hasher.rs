use tydb_types::Digest;

use crate::error::{ItemError, ItemResult};
use crate::item::Item;

const TAG_STRING: u8 = 0x01;
const TAG_NUMBER: u8 = 0x02;
const TAG_BOOLEAN: u8 = 0x03;
const TAG_ARRAY: u8 = 0x10;
const TAG_RECORD: u8 = 0x11;
const TAG_HASHMAP: u8 = 0x12;

/// Domain-separated BLAKE3 hasher over the canonical encoding of an item.
///
/// The encoding is length-prefixed and tagged per kind, so structurally
/// different items never share an encoding. Hashmap entries are encoded in
/// digest order, which makes a hashmap's digest independent of insertion
/// order.
pub struct KeyHasher {
    domain: &'static str,
}

impl KeyHasher {
    /// Hasher used for hashmap keys.
    pub const KEY: Self = Self {
        domain: "tydb-key-v1",
    };

    /// Digest of an item's content.
    ///
    /// Fails for non-finite numbers, which have no stable identity.
    pub fn digest(&self, item: &Item) -> ItemResult<Digest> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        encode(item, &mut hasher)?;
        Ok(Digest::from_hash(*hasher.finalize().as_bytes()))
    }
}

fn encode_len(len: usize, hasher: &mut blake3::Hasher) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn encode(item: &Item, hasher: &mut blake3::Hasher) -> ItemResult<()> {
    match item {
        Item::String(s) => {
            hasher.update(&[TAG_STRING]);
            encode_len(s.len(), hasher);
            hasher.update(s.as_bytes());
        }
        Item::Number(n) => {
            if !n.is_finite() {
                return Err(ItemError::Hash(format!("non-finite number {n}")));
            }
            // -0.0 and 0.0 compare equal, so they must hash equal.
            let n = if *n == 0.0 { 0.0f64 } else { *n };
            hasher.update(&[TAG_NUMBER]);
            hasher.update(&n.to_bits().to_le_bytes());
        }
        Item::Boolean(b) => {
            hasher.update(&[TAG_BOOLEAN, u8::from(*b)]);
        }
        Item::Array(array) => {
            hasher.update(&[TAG_ARRAY]);
            encode_len(array.len(), hasher);
            for elem in array.iter() {
                encode(elem, hasher)?;
            }
        }
        Item::Record(record) => {
            hasher.update(&[TAG_RECORD]);
            encode_len(record.record_type().len(), hasher);
            for (name, value) in record.iter() {
                encode_len(name.len(), hasher);
                hasher.update(name.as_bytes());
                encode(value, hasher)?;
            }
        }
        Item::Hashmap(map) => {
            hasher.update(&[TAG_HASHMAP]);
            encode_len(map.len(), hasher);
            for (digest, value) in map.sorted_entries() {
                hasher.update(digest.as_bytes());
                encode(value, hasher)?;
            }
        }
    }
    Ok(())
}
