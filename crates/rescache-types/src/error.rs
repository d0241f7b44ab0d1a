/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("null or empty input")]
    NullInput,
    #[error("invalid argument")]
    InvalidArg,

    // Buffer errors
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },

    // Randomness errors
    #[error("random source failed to produce output")]
    RandSourceFailed,
}
