//! TSID Generator
//!
//! Time-sorted identifiers encoded as 13-character Crockford Base32 strings.
//! Ids sort lexicographically in creation order, which keeps listings that
//! order by id stable without a separate sequence column.

use std::sync::atomic::{AtomicU16, Ordering};

use chrono::Utc;
use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const TSID_LEN: usize = 13;

static COUNTER: AtomicU16 = AtomicU16::new(0);

/// Generator for store ids
pub struct TsidGenerator;

impl TsidGenerator {
    /// Layout (64 bits): 42 bits epoch millis | 10 bits random | 12 bits counter
    pub fn generate() -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let random: u64 = rand::thread_rng().gen_range(0..1024);
        let counter = (COUNTER.fetch_add(1, Ordering::Relaxed) & 0x0FFF) as u64;

        let value = ((millis & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | counter;
        encode(value)
    }
}

fn encode(mut value: u64) -> String {
    let mut out = [b'0'; TSID_LEN];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }
    out.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_tsid() {
        let id = TsidGenerator::generate();
        assert_eq!(id.len(), TSID_LEN);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(TsidGenerator::generate()), "Duplicate TSID generated");
        }
    }

    #[test]
    fn test_sortability() {
        let first = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TsidGenerator::generate();
        assert!(first < second);
    }

    #[test]
    fn test_encode_zero_and_max() {
        assert_eq!(encode(0), "0000000000000");
        assert_eq!(encode(u64::MAX), "FZZZZZZZZZZZZ");
    }
}
