//! I define the integer identifiers assigned to terms by a [store](crate::store::TermStore).

use std::fmt;

/// An opaque identifier of one term encoding in a [`TermStore`](crate::store::TermStore).
///
/// Keys are content-addressed:
/// the same encoding always maps to the same key within a store.
/// Keys from different stores are not comparable.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermKey(pub u64);

impl TermKey {
    /// Size of a key, in bytes.
    pub const SIZE: usize = std::mem::size_of::<u64>();

    /// The little-endian bytes of this key.
    #[inline]
    pub fn to_le_bytes(self) -> [u8; Self::SIZE] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A triple of [`TermKey`]s, in subject-predicate-object order.
pub type TripleKey = [TermKey; 3];

/// The bytes of a [`TripleKey`], as hashed by in-memory sets.
pub fn triple_key_bytes(key: &TripleKey) -> [u8; 3 * TermKey::SIZE] {
    let mut ret = [0; 3 * TermKey::SIZE];
    for (chunk, k) in ret.chunks_exact_mut(TermKey::SIZE).zip(key) {
        chunk.copy_from_slice(&k.to_le_bytes());
    }
    ret
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_bytes() {
        let b = triple_key_bytes(&[TermKey(1), TermKey(2), TermKey(0x0300)]);
        assert_eq!(&b[0..8], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&b[8..16], &[2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&b[16..24], &[0, 3, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn display() {
        assert_eq!(TermKey(42).to_string(), "#42");
    }
}
