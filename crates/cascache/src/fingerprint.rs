//! Content fingerprints identifying cached objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Width of the content-derived fingerprint value in bytes.
pub const FINGERPRINT_BYTES: usize = 16;

/// Identifies a cached object by its content.
///
/// Equality and hashing are defined over `value` only. `requester_id` records
/// which request produced the fingerprint and is carried for provenance; two
/// fingerprints with the same content value refer to the same cached object
/// regardless of requester.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Identifier of the request that produced this fingerprint.
    pub requester_id: u64,
    /// Content-derived value; the cache key.
    pub value: [u8; FINGERPRINT_BYTES],
}

impl Fingerprint {
    /// Creates a fingerprint from a requester id and a content value.
    pub fn new(requester_id: u64, value: [u8; FINGERPRINT_BYTES]) -> Self {
        Self {
            requester_id,
            value,
        }
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Fingerprint {}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:02x?}, requester {})", &self.value[..4], self.requester_id)
    }
}
