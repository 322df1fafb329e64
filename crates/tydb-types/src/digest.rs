use std::fmt;

use serde::{Deserialize, Serialize};

/// Content hash of a hashmap key.
///
/// A `Digest` is a 256-bit BLAKE3 hash of a key's canonical encoding. Equal
/// keys always produce the same digest; the width makes accidental
/// collisions between distinct keys negligible.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Wrap a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn debug_is_short() {
        let d = Digest::from_hash([0xab; 32]);
        assert_eq!(format!("{d:?}"), "Digest(abababab)");
    }

    #[test]
    fn ordering_follows_bytes() {
        let mut low = [0u8; 32];
        low[31] = 1;
        let mut high = [0u8; 32];
        high[0] = 1;
        assert!(Digest::from_hash(low) < Digest::from_hash(high));
    }

    proptest! {
        #[test]
        fn display_is_full_hex(bytes in any::<[u8; 32]>()) {
            let d = Digest::from_hash(bytes);
            let text = d.to_string();
            prop_assert_eq!(text.len(), 64);
            prop_assert!(text.starts_with(&d.short_hex()));
            prop_assert_eq!(d.as_bytes(), &bytes);
        }
    }
}
