//! Stored row envelope.

use crate::error::Error;
use rkyv::{Archive, Deserialize, Serialize};

/// A stored row: encoded field data plus write metadata.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Row {
    /// Encoded field data (see `store::codec`).
    pub data: Vec<u8>,

    /// Write timestamp in microseconds since the Unix epoch.
    pub written_at: u64,
}

impl Row {
    /// Create a row stamped with the current time.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            written_at: current_timestamp(),
        }
    }

    /// Serialize the row to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a row from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}

/// Current time in microseconds since the Unix epoch.
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
        .as_micros() as u64
}

/// Current date in days since the Unix epoch.
pub fn current_date() -> i32 {
    const MICROS_PER_DAY: u64 = 24 * 60 * 60 * 1_000_000;
    (current_timestamp() / MICROS_PER_DAY) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_roundtrip() {
        let row = Row::new(vec![1, 2, 3, 4, 5]);
        let bytes = row.to_bytes().unwrap();
        let decoded = Row::from_bytes(&bytes).unwrap();

        assert_eq!(row.data, decoded.data);
        assert_eq!(row.written_at, decoded.written_at);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Row::from_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_current_date_is_after_2020() {
        // 2020-01-01 is day 18262
        assert!(current_date() > 18262);
    }
}
