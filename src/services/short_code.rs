use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

/// Character set for generating short codes.
pub const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Draws random candidate short codes from an injected random source.
///
/// The generator does not check uniqueness; callers must verify a candidate
/// against every store that can hold the code before using it.
pub struct ShortCodeGenerator {
    rng: Mutex<StdRng>,
    alphabet: &'static [u8],
}

impl ShortCodeGenerator {
    /// Create a generator around an existing random source.
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            alphabet: ALPHANUMERIC,
        }
    }

    /// Create a generator seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Create a deterministic generator.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Restrict the alphabet codes are drawn from.
    ///
    /// An empty alphabet falls back to the alphanumeric set.
    pub fn with_alphabet(mut self, alphabet: &'static [u8]) -> Self {
        if !alphabet.is_empty() {
            self.alphabet = alphabet;
        }
        self
    }

    /// Draw one candidate code of `length` characters.
    pub fn generate(&self, length: usize) -> String {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        (0..length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())] as char)
            .collect()
    }
}

impl Default for ShortCodeGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_chars_const() {
        // 0-9, A-Z, a-z
        assert_eq!(ALPHANUMERIC.len(), 62);
        let unique: HashSet<_> = ALPHANUMERIC.iter().collect();
        assert_eq!(unique.len(), ALPHANUMERIC.len());
    }

    #[test]
    fn test_generated_code_shape() {
        let generator = ShortCodeGenerator::from_seed(1);
        for _ in 0..100 {
            let code = generator.generate(7);
            assert_eq!(code.len(), 7);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = ShortCodeGenerator::from_seed(42);
        let b = ShortCodeGenerator::from_seed(42);
        let first: Vec<String> = (0..5).map(|_| a.generate(7)).collect();
        let second: Vec<String> = (0..5).map(|_| b.generate(7)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_successive_draws_differ() {
        let generator = ShortCodeGenerator::from_seed(7);
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate(7)).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_restricted_alphabet() {
        let generator = ShortCodeGenerator::from_seed(3).with_alphabet(b"a");
        assert_eq!(generator.generate(4), "aaaa");
    }

    #[test]
    fn test_empty_alphabet_ignored() {
        let generator = ShortCodeGenerator::from_seed(3).with_alphabet(b"");
        assert_eq!(generator.generate(7).len(), 7);
    }
}
