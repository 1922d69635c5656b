//! Low-level handling of tRNS chunks. You generally don't need to use this module.
use std::io;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher as Crc32;

use crate::error::FatalChunkError;

pub mod cursor;
pub mod payload;

pub use self::cursor::{Checksum, ChunkCursor, StreamCursor};

/// Four-byte chunk type code.
pub type ChunkType = [u8; 4];

/// Transparency chunk type.
pub const TRNS: ChunkType = *b"tRNS";

/// Maximum number of palette entries, and therefore of tRNS palette alphas.
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// Read chunk length and type. The stream is left at the start of the payload.
pub fn read_chunk_header<R: io::Read>(
    stream: &mut R,
) -> Result<(u32, ChunkType), FatalChunkError> {
    let mut header = [0; 8];
    stream.read_exact(&mut header).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => FatalChunkError::ShortRead { needed: 8 },
        _ => FatalChunkError::Io(err),
    })?;

    let length = (&header[0..4]).read_u32::<BigEndian>()?;
    let chunk_type = [header[4], header[5], header[6], header[7]];
    Ok((length, chunk_type))
}

/// Write a complete chunk: length, type, payload and CRC.
pub fn write_chunk<W: io::Write>(
    stream: &mut W,
    chunk_type: ChunkType,
    payload: &[u8],
) -> io::Result<()> {
    if payload.len() > i32::MAX as usize {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "chunk payload too long"));
    }

    let mut crc = Crc32::new();
    crc.update(&chunk_type);
    crc.update(payload);

    stream.write_u32::<BigEndian>(payload.len() as u32)?;
    stream.write_all(&chunk_type)?;
    stream.write_all(payload)?;
    stream.write_u32::<BigEndian>(crc.finalize())
}
