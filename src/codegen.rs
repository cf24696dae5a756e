//! Session code generation
//!
//! The generator is an explicit, injectable component so the registry can be
//! driven by a deterministic implementation in tests.

use rand::Rng;

use crate::types::CODE_ALPHABET;

/// Source of fresh session codes
///
/// Implementations must be safe for concurrent calls without external
/// synchronization and must not block.
pub trait CodeGenerator: Send + Sync {
    /// Produce a random code of the given length from the code alphabet
    fn generate(&self, length: usize) -> String;
}

/// Default generator backed by the thread-local CSPRNG
///
/// `rand::thread_rng` is cryptographically strong and per-call thread-local,
/// so a single shared instance serves concurrent requests. Codes double as
/// unlisted room identifiers, so unguessability matters as much as
/// collision resistance.
#[derive(Debug, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET[idx] as char
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CODE_LENGTH;

    #[test]
    fn test_generated_length() {
        let gen = RandomCodeGenerator;
        assert_eq!(gen.generate(CODE_LENGTH).len(), CODE_LENGTH);
        assert_eq!(gen.generate(16).len(), 16);
    }

    #[test]
    fn test_generated_chars_in_alphabet() {
        let gen = RandomCodeGenerator;
        let code = gen.generate(64);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_codes_vary() {
        let gen = RandomCodeGenerator;
        // 16-char codes colliding across ten draws would indicate a broken rng
        let codes: std::collections::HashSet<_> =
            (0..10).map(|_| gen.generate(16)).collect();
        assert_eq!(codes.len(), 10);
    }
}
