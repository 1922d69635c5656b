//! Decoding of the tRNS payload for each color mode.
//!
//! Lengths are validated before anything is read, so a rejected payload leaves the cursor where
//! it was. Only stream failures can happen after the first byte is consumed.
use byteorder::{BigEndian, ByteOrder};

use crate::error::{BenignChunkError, ChunkError};
use crate::info::TransparencyValue;
use crate::low_level::{ChunkCursor, MAX_PALETTE_ENTRIES};
use crate::state::ColorMode;

fn invalid_length(length: u32) -> ChunkError {
    BenignChunkError::InvalidLength { length }.into()
}

/// Decode a tRNS payload of `length` bytes for an image in `mode`.
///
/// `declared_palette_size` bounds the number of palette alphas and is ignored unless
/// `have_palette` is set.
pub fn decode<C: ChunkCursor>(
    mode: ColorMode,
    length: u32,
    have_palette: bool,
    declared_palette_size: u16,
    cursor: &mut C,
) -> Result<TransparencyValue, ChunkError> {
    match mode {
        ColorMode::Gray => {
            if length != 2 {
                return Err(invalid_length(length));
            }

            let mut buffer = [0; 2];
            cursor.read_exact(&mut buffer)?;
            Ok(TransparencyValue::Gray(BigEndian::read_u16(&buffer)))
        }
        ColorMode::Rgb => {
            if length != 6 {
                return Err(invalid_length(length));
            }

            let mut buffer = [0; 6];
            cursor.read_exact(&mut buffer)?;
            Ok(TransparencyValue::Rgb(
                BigEndian::read_u16(&buffer[0..2]),
                BigEndian::read_u16(&buffer[2..4]),
                BigEndian::read_u16(&buffer[4..6]),
            ))
        }
        ColorMode::Palette => {
            if !have_palette {
                return Err(BenignChunkError::OutOfPlaceBeforePalette.into());
            }

            let limit = usize::from(declared_palette_size).min(MAX_PALETTE_ENTRIES);
            let n = length as usize;
            if n == 0 || n > limit {
                return Err(invalid_length(length));
            }

            let mut scratch = [0; MAX_PALETTE_ENTRIES];
            cursor.read_exact(&mut scratch[..n])?;
            Ok(TransparencyValue::PaletteAlphas(scratch[..n].to_vec()))
        }
        ColorMode::GrayAlpha | ColorMode::RgbAlpha => {
            Err(BenignChunkError::InvalidForAlphaMode.into())
        }
    }
}
