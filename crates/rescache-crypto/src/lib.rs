#![forbid(unsafe_code)]
#![doc = "Hash, HMAC, and randomness collaborators for the rescache session cache."]

pub mod digest;
pub mod hmac;
pub mod provider;
pub mod rand;

pub use provider::{Digest, HashAlgorithm, RandomSource};
