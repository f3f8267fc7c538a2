//! Record identifiers.

use std::fmt;

/// Size of a record identifier in bytes.
pub const RECORD_ID_SIZE: usize = 16;

/// A 16-byte record identifier (UUID-shaped).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId([u8; RECORD_ID_SIZE]);

impl RecordId {
    /// Generate a fresh identifier.
    ///
    /// Combines a nanosecond timestamp with a process-wide counter so ids
    /// stay unique under equal timestamps, then stamps UUIDv4 version bits.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_nanos() as u64;
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

        let mut id = [0u8; RECORD_ID_SIZE];
        id[..8].copy_from_slice(&now.to_le_bytes());
        id[8..16].copy_from_slice(&counter.to_le_bytes());

        // UUID version 4 bits
        id[6] = (id[6] & 0x0f) | 0x40;
        id[8] = (id[8] & 0x3f) | 0x80;

        Self(id)
    }

    /// View the raw bytes.
    pub fn as_bytes(&self) -> &[u8; RECORD_ID_SIZE] {
        &self.0
    }

    /// Build an identifier from raw bytes.
    pub fn from_bytes(bytes: [u8; RECORD_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build an identifier from a byte slice of the right length.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != RECORD_ID_SIZE {
            return None;
        }
        let mut id = [0u8; RECORD_ID_SIZE];
        id.copy_from_slice(bytes);
        Some(Self(id))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", hex::encode(self.0))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_slice_roundtrip() {
        let id = RecordId::generate();
        let parsed = RecordId::from_slice(id.as_bytes()).unwrap();
        assert_eq!(id, parsed);

        assert!(RecordId::from_slice(&[0u8; 4]).is_none());
    }

    #[test]
    fn test_hex_display() {
        let id = RecordId::from_bytes([0xab; 16]);
        assert_eq!(id.to_string(), "ab".repeat(16));
    }
}
