//! Access to the bytes of the chunk currently being handled.
use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use crc32fast::Hasher as Crc32;

use crate::error::FatalChunkError;
use crate::low_level::ChunkType;

/// Result of comparing the stored chunk CRC with the computed one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Checksum {
    Valid,
    Mismatch {
        /// CRC stored after the chunk payload.
        stored: u32,
        /// CRC computed over chunk type and payload.
        computed: u32,
    },
}

impl Checksum {
    pub fn is_valid(self) -> bool {
        self == Checksum::Valid
    }
}

/// Byte source of a single chunk, supplied by the chunk framing layer.
///
/// `finish_and_verify_checksum` must be called exactly once per chunk, after every payload byte
/// was either read or skipped.
pub trait ChunkCursor {
    /// Fill `buffer` with the next payload bytes.
    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), FatalChunkError>;

    /// Consume `length` payload bytes without looking at them.
    fn skip(&mut self, length: u32) -> Result<(), FatalChunkError>;

    /// Number of payload bytes consumed so far.
    fn consumed(&self) -> u32;

    /// Read the stored CRC and compare it against everything consumed.
    fn finish_and_verify_checksum(&mut self) -> Result<Checksum, FatalChunkError>;
}

impl<C: ChunkCursor + ?Sized> ChunkCursor for &mut C {
    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), FatalChunkError> {
        (**self).read_exact(buffer)
    }

    fn skip(&mut self, length: u32) -> Result<(), FatalChunkError> {
        (**self).skip(length)
    }

    fn consumed(&self) -> u32 {
        (**self).consumed()
    }

    fn finish_and_verify_checksum(&mut self) -> Result<Checksum, FatalChunkError> {
        (**self).finish_and_verify_checksum()
    }
}

fn read_error(err: io::Error, needed: usize) -> FatalChunkError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        FatalChunkError::ShortRead {
            needed: needed as u32,
        }
    } else {
        FatalChunkError::Io(err)
    }
}

/// `ChunkCursor` over a byte stream positioned at the start of a chunk payload.
#[derive(Clone)]
pub struct StreamCursor<R: io::Read> {
    stream: R,
    crc: Crc32,
    consumed: u32,
}

impl<R: io::Read> StreamCursor<R> {
    /// Start a chunk of type `chunk_type`. The type bytes are covered by the CRC.
    pub fn new(stream: R, chunk_type: ChunkType) -> Self {
        let mut crc = Crc32::new();
        crc.update(&chunk_type);

        StreamCursor {
            stream,
            crc,
            consumed: 0,
        }
    }

    /// Stop reading the chunk and get the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }
}

impl<R: io::Read> ChunkCursor for StreamCursor<R> {
    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), FatalChunkError> {
        self.stream
            .read_exact(buffer)
            .map_err(|err| read_error(err, buffer.len()))?;

        self.crc.update(buffer);
        self.consumed += buffer.len() as u32;
        Ok(())
    }

    fn skip(&mut self, length: u32) -> Result<(), FatalChunkError> {
        let mut buffer = [0; 256];
        let mut left = length as usize;

        while left > 0 {
            let n = left.min(buffer.len());
            self.read_exact(&mut buffer[..n])
                .map_err(|err| match err {
                    FatalChunkError::ShortRead { .. } => FatalChunkError::ShortRead {
                        needed: left as u32,
                    },
                    err => err,
                })?;
            left -= n;
        }

        Ok(())
    }

    fn consumed(&self) -> u32 {
        self.consumed
    }

    fn finish_and_verify_checksum(&mut self) -> Result<Checksum, FatalChunkError> {
        let stored = self
            .stream
            .read_u32::<BigEndian>()
            .map_err(|err| read_error(err, 4))?;
        let computed = self.crc.clone().finalize();

        if stored == computed {
            Ok(Checksum::Valid)
        } else {
            Ok(Checksum::Mismatch { stored, computed })
        }
    }
}
