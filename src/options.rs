/// What to do when a tRNS chunk fails its CRC check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChecksumPolicy {
    /// Discard the chunk with `BenignChunkError::ChecksumMismatch`.
    Verify,
    /// Log the mismatch and use the chunk anyway.
    Ignore,
}

/// Knobs for handling tRNS chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrnsOptions {
    pub checksum: ChecksumPolicy,
}

impl Default for TrnsOptions {
    /// Checksums are verified, except in fuzzing builds where random input would never get
    /// past them.
    fn default() -> Self {
        let checksum = if cfg!(fuzzing) {
            ChecksumPolicy::Ignore
        } else {
            ChecksumPolicy::Verify
        };

        TrnsOptions { checksum }
    }
}
