//! Public order identifiers
//!
//! Format: `AAA-bbbb-CCC`
//!   - 3 symbols from [`UPPER_ALPHABET`]
//!   - 4 symbols from [`LOWER_ALPHABET`]
//!   - 3 symbols from [`UPPER_ALPHABET`]
//!
//! Both alphabets leave out `0` and `1`. The uppercase one also drops `I` and
//! `O`, the lowercase one `l` and `o`, so an id can be read back over the phone. 32 symbols per position and 10 positions give
//! roughly 2^50 ids. Collisions are not prevented here: the `unique_id`
//! column carries a unique constraint and the order service retries.

use rand::Rng;

/// Uppercase segment alphabet (32 symbols)
pub const UPPER_ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Lowercase segment alphabet (32 symbols)
pub const LOWER_ALPHABET: &[u8; 32] = b"23456789abcdefghijkmnpqrstuvwxyz";

/// Segment lengths, in order
const SEGMENTS: [(usize, &[u8; 32]); 3] = [
    (3, UPPER_ALPHABET),
    (4, LOWER_ALPHABET),
    (3, UPPER_ALPHABET),
];

/// Total length including the two hyphens
pub const UNIQUE_ID_LEN: usize = 12;

/// Source of public order identifiers
///
/// Implementations must be stateless from the caller's point of view and
/// safe to call from concurrent requests.
pub trait IdGenerator: Send + Sync {
    fn generate_id(&self) -> String;
}

/// Random human-readable id generator backed by the thread-local CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadableIdGenerator;

impl ReadableIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for ReadableIdGenerator {
    fn generate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut id = String::with_capacity(UNIQUE_ID_LEN);
        for (i, (len, alphabet)) in SEGMENTS.iter().enumerate() {
            if i > 0 {
                id.push('-');
            }
            for _ in 0..*len {
                let idx = rng.gen_range(0..alphabet.len());
                id.push(alphabet[idx] as char);
            }
        }
        id
    }
}

/// Check that `s` has the `AAA-bbbb-CCC` shape over the two alphabets
pub fn is_valid_unique_id(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != SEGMENTS.len() {
        return false;
    }
    parts
        .iter()
        .zip(SEGMENTS.iter())
        .all(|(part, (len, alphabet))| {
            part.len() == *len && part.bytes().all(|b| alphabet.contains(&b))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabets_have_32_distinct_symbols() {
        for alphabet in [UPPER_ALPHABET, LOWER_ALPHABET] {
            let set: HashSet<u8> = alphabet.iter().copied().collect();
            assert_eq!(set.len(), 32);
        }
    }

    #[test]
    fn test_alphabets_exclude_confusable_characters() {
        for c in [b'0', b'1', b'I', b'O'] {
            assert!(!UPPER_ALPHABET.contains(&c), "upper contains {}", c as char);
        }
        for c in [b'0', b'1', b'l', b'o'] {
            assert!(!LOWER_ALPHABET.contains(&c), "lower contains {}", c as char);
        }
    }

    #[test]
    fn test_generated_id_format() {
        let generator = ReadableIdGenerator::new();
        for _ in 0..500 {
            let id = generator.generate_id();
            assert_eq!(id.len(), UNIQUE_ID_LEN, "bad length: {id}");
            assert!(is_valid_unique_id(&id), "bad format: {id}");

            let parts: Vec<&str> = id.split('-').collect();
            assert!(parts[0].chars().all(|c| !c.is_ascii_lowercase()));
            assert!(parts[1].chars().all(|c| !c.is_ascii_uppercase()));
            assert!(parts[2].chars().all(|c| !c.is_ascii_lowercase()));
            assert!(!id.chars().any(|c| "01IOlo".contains(c)), "confusable: {id}");
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let generator = ReadableIdGenerator::new();
        let ids: HashSet<String> = (0..300).map(|_| generator.generate_id()).collect();
        assert_eq!(ids.len(), 300);
    }

    #[test]
    fn test_generator_is_usable_across_threads() {
        let generator = std::sync::Arc::new(ReadableIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let g = generator.clone();
                std::thread::spawn(move || (0..50).map(|_| g.generate_id()).collect::<Vec<_>>())
            })
            .collect();
        let mut all = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(is_valid_unique_id(&id));
                all.insert(id);
            }
        }
        assert_eq!(all.len(), 200);
    }

    #[test]
    fn test_is_valid_unique_id_rejects_malformed() {
        assert!(is_valid_unique_id("ABC-defg-XYZ"));
        assert!(!is_valid_unique_id(""));
        assert!(!is_valid_unique_id("ABC-defg"));
        assert!(!is_valid_unique_id("ABCdefgXYZ"));
        assert!(!is_valid_unique_id("AB0-defg-XYZ"));
        assert!(!is_valid_unique_id("ABC-DEFG-XYZ"));
        assert!(!is_valid_unique_id("abc-defg-xyz"));
        assert!(!is_valid_unique_id("ABC-defl-XYZ"));
        assert!(!is_valid_unique_id("ABC-defg-XYZ-"));
    }
}
