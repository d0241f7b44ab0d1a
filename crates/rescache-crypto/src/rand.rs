//! System randomness source.

use crate::provider::RandomSource;
use rescache_types::CryptoError;

/// Random source backed by the operating system's entropy facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for SystemRandom {
    fn random_bytes(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::getrandom(out).map_err(|_| CryptoError::RandSourceFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_random_fills_buffer() {
        let mut out = [0u8; 32];
        SystemRandom::new().random_bytes(&mut out).unwrap();
        // 32 zero bytes from the OS entropy source is effectively impossible
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_system_random_distinct_draws() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        let mut rng = SystemRandom::new();
        rng.random_bytes(&mut a).unwrap();
        rng.random_bytes(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
