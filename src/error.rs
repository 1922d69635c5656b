use std::io;

use thiserror::Error;

/// Errors after which the whole decode session must be abandoned.
#[derive(Debug, Error)]
pub enum FatalChunkError {
    /// A tRNS chunk appeared before IHDR.
    #[error("missing IHDR")]
    MissingHeader,

    /// The stream ended in the middle of a chunk.
    #[error("unexpected end of stream: {needed} more chunk bytes expected")]
    ShortRead { needed: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors that drop the current chunk but let decoding continue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum BenignChunkError {
    #[error("out of place after IDAT")]
    OutOfPlaceAfterImageData,

    #[error("duplicate")]
    Duplicate,

    #[error("out of place before PLTE")]
    OutOfPlaceBeforePalette,

    #[error("invalid length {length}")]
    InvalidLength { length: u32 },

    #[error("invalid with alpha channel")]
    InvalidForAlphaMode,

    #[error("CRC error")]
    ChecksumMismatch,
}

/// Outcome of a rejected tRNS chunk.
///
/// The two tiers are kept apart so callers have to decide explicitly whether
/// to continue with the next chunk or abort.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("tRNS: {0}")]
    Fatal(#[from] FatalChunkError),

    #[error("tRNS: {0}")]
    Benign(#[from] BenignChunkError),
}

impl ChunkError {
    /// Whether the decode session must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChunkError::Fatal(_))
    }

    /// The benign reason, if this error is benign.
    pub fn benign(&self) -> Option<BenignChunkError> {
        match *self {
            ChunkError::Benign(err) => Some(err),
            ChunkError::Fatal(_) => None,
        }
    }
}
