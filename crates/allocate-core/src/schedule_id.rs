//! Schedule identifiers.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Base64 alphabet reordered so that string comparison matches byte order.
const LEX_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz~";

static MACHINE_ID: LazyLock<[u8; 3]> = LazyLock::new(|| {
    let digest = md5::compute(host_name().as_bytes());
    [digest[0], digest[1], digest[2]]
});

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| {
    let seed = Uuid::new_v4();
    let bytes = seed.as_bytes();
    AtomicU32::new(u32::from(u16::from_be_bytes([bytes[0], bytes[1]])))
});

/// Identifier of a generated schedule.
///
/// Laid out like a Mongo ObjectId: 4 bytes of unix seconds, 3 bytes of
/// machine id, 2 bytes of process id and a 3 byte counter. Ids created later
/// sort after earlier ones when compared as strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    /// Create a new unique ScheduleId for the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create a ScheduleId stamped with the given time.
    pub fn at(now: DateTime<Utc>) -> Self {
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::from_parts(
            timestamp_seconds(now),
            *MACHINE_ID,
            std::process::id() as u16,
            counter,
        )
    }

    fn from_parts(timestamp: u32, machine: [u8; 3], process: u16, counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..7].copy_from_slice(&machine);
        bytes[7..9].copy_from_slice(&process.to_be_bytes());
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(lex_encode(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScheduleId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ScheduleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::str::FromStr for ScheduleId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// Unix seconds clamped to the four bytes of the id, so order is kept at the edges.
fn timestamp_seconds(now: DateTime<Utc>) -> u32 {
    let secs = now.timestamp();
    u32::try_from(secs).unwrap_or(if secs < 0 { 0 } else { u32::MAX })
}

fn host_name() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|s| s.trim().to_string())
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// Base64 encode without padding using the lexicographic alphabet.
fn lex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let n = (b0 << 16) | (b1 << 8) | b2;

        let sextets = [(n >> 18) & 63, (n >> 12) & 63, (n >> 6) & 63, n & 63];
        let emit = chunk.len() + 1;
        for s in sextets.iter().take(emit) {
            out.push(LEX_ALPHABET[*s as usize] as char);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alphabet_is_sorted() {
        let mut sorted = LEX_ALPHABET.to_vec();
        sorted.sort();
        assert_eq!(&sorted[..], &LEX_ALPHABET[..]);
    }

    #[test]
    fn test_lex_encode() {
        // standard base64 of [0,0,0] is "AAAA"
        assert_eq!(lex_encode(&[0, 0, 0]), "0000");
        // standard base64 of [255,255,255] is "////"
        assert_eq!(lex_encode(&[255, 255, 255]), "~~~~");
        // "Man" is "TWFu" in standard base64
        assert_eq!(lex_encode(b"Man"), "JM5j");
        // padding is dropped
        assert_eq!(lex_encode(&[0]), "00");
    }

    #[test]
    fn test_id_length() {
        let id = ScheduleId::new();
        assert_eq!(id.as_str().len(), 16);
    }

    #[test]
    fn test_ids_sort_by_time() {
        let early = Utc.with_ymd_and_hms(2018, 1, 15, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2018, 1, 16, 0, 0, 0).unwrap();
        let a = ScheduleId::at(early);
        let b = ScheduleId::at(late);
        assert!(a < b);
    }

    #[test]
    fn test_timestamp_clamped() {
        let before_epoch = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        let after_2106 = Utc.with_ymd_and_hms(2200, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(timestamp_seconds(before_epoch), 0);
        assert_eq!(timestamp_seconds(after_2106), u32::MAX);

        let early = ScheduleId::at(Utc.with_ymd_and_hms(1971, 1, 1, 0, 0, 0).unwrap());
        let late = ScheduleId::at(Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap());
        assert!(ScheduleId::at(before_epoch) < early);
        assert!(ScheduleId::at(after_2106) > late);
    }

    #[test]
    fn test_ids_sort_by_counter() {
        let a = ScheduleId::from_parts(100, [1, 2, 3], 7, 41);
        let b = ScheduleId::from_parts(100, [1, 2, 3], 7, 42);
        assert!(a < b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_consecutive_ids_differ() {
        let now = Utc::now();
        assert_ne!(ScheduleId::at(now), ScheduleId::at(now));
    }
}
