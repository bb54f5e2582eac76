/// Compile-time hashed string identifiers.
///
/// Technique names, asset names and pass names are compared through
/// 32-bit FNV-1a hashes instead of strings on the per-frame path.

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of a string, usable in `const` contexts
///
/// # Example
///
/// ```
/// use galaxy_3d_compositor::galaxy3d::StringId;
///
/// const FORWARD: StringId = StringId::new("Forward");
/// assert_eq!(FORWARD, StringId::from("Forward"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(u32);

impl StringId {
    /// Hash a string
    pub const fn new(value: &str) -> Self {
        let bytes = value.as_bytes();
        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Wrap an already computed hash
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Raw hash value
    pub const fn id(&self) -> u32 {
        self.0
    }
}

impl From<&str> for StringId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringId({:#010x})", self.0)
    }
}

#[cfg(test)]
#[path = "string_id_tests.rs"]
mod tests;
