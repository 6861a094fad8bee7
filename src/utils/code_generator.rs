//! Short code generation.
//!
//! Codes are drawn uniformly from a 62-symbol alphabet. The generator knows
//! nothing about storage: uniqueness is enforced when the link is inserted.

use rand::Rng;

/// Symbols a short code may contain.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated short codes (62^6 ≈ 56.8 billion combinations).
pub const SHORT_CODE_LENGTH: usize = 6;

/// Generates a random code of `length` characters.
///
/// Each character is drawn independently and uniformly from [`ALPHABET`] using
/// the thread-local CSPRNG.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(SHORT_CODE_LENGTH);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_alphabet_has_62_distinct_symbols() {
        let symbols: HashSet<u8> = ALPHABET.iter().copied().collect();
        assert_eq!(ALPHABET.len(), 62);
        assert_eq!(symbols.len(), 62);
    }

    #[test]
    fn test_generate_code_has_requested_length() {
        assert_eq!(generate_code(SHORT_CODE_LENGTH).len(), 6);
        assert_eq!(generate_code(12).len(), 12);
        assert!(generate_code(0).is_empty());
    }

    #[test]
    fn test_generate_code_uses_alphabet_only() {
        for _ in 0..1000 {
            let code = generate_code(SHORT_CODE_LENGTH);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)), "bad code {code}");
        }
    }

    #[test]
    fn test_generate_code_produces_distinct_codes() {
        let codes: HashSet<String> = (0..1000)
            .map(|_| generate_code(SHORT_CODE_LENGTH))
            .collect();

        // A collision among 1000 draws from 62^6 has probability ~1e-5.
        assert!(codes.len() >= 999);
    }

    #[test]
    fn test_generate_code_covers_alphabet() {
        let mut seen: HashMap<char, usize> = HashMap::new();
        for _ in 0..2000 {
            for c in generate_code(SHORT_CODE_LENGTH).chars() {
                *seen.entry(c).or_default() += 1;
            }
        }

        // 12_000 draws, ~194 expected per symbol; every symbol must show up.
        assert_eq!(seen.len(), 62);
        assert!(seen.values().all(|&n| n > 50));
    }
}
