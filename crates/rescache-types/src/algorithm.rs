/// Hash algorithm identifiers.
///
/// These are the digests a TLS server's random generator is expected to be
/// built on; the session cache borrows whichever one the server prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgId {
    Sha1,
    Sha256,
    Sha384,
}

impl HashAlgId {
    /// The digest output size in bytes.
    pub fn output_size(self) -> usize {
        match self {
            HashAlgId::Sha1 => 20,
            HashAlgId::Sha256 => 32,
            HashAlgId::Sha384 => 48,
        }
    }

    /// The internal block size in bytes.
    pub fn block_size(self) -> usize {
        match self {
            HashAlgId::Sha1 | HashAlgId::Sha256 => 64,
            HashAlgId::Sha384 => 128,
        }
    }
}
