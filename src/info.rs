//! Output record of a decode session.
use std::io;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::BenignChunkError;

/// Transparency information carried by a tRNS chunk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransparencyValue {
    /// Gray level which is rendered fully transparent.
    Gray(u16),

    /// RGB triple which is rendered fully transparent.
    Rgb(u16, u16, u16),

    /// Alpha value for each palette entry, starting from index 0. Entries past the end are opaque.
    PaletteAlphas(Vec<u8>),
}

impl TransparencyValue {
    /// Number of transparency entries: palette alphas, or 1 for a single transparent color.
    pub fn num_trans(&self) -> usize {
        match self {
            TransparencyValue::Gray(_) | TransparencyValue::Rgb(..) => 1,
            TransparencyValue::PaletteAlphas(alphas) => alphas.len(),
        }
    }

    /// Alpha of the palette entry `index`.
    ///
    /// Returns 255 for indices without an entry and for non-palette values.
    pub fn alpha_for_index(&self, index: usize) -> u8 {
        match self {
            TransparencyValue::PaletteAlphas(alphas) => {
                alphas.get(index).copied().unwrap_or(0xFF)
            }
            _ => 0xFF,
        }
    }

    /// Whether all samples are representable at `bit_depth` bits.
    ///
    /// Palette alphas are always 8-bit and always fit.
    pub fn fits_bit_depth(&self, bit_depth: u8) -> bool {
        if bit_depth >= 16 {
            return true;
        }
        let max = (1u32 << bit_depth) - 1;
        let fits = |sample: u16| u32::from(sample) <= max;

        match *self {
            TransparencyValue::Gray(gray) => fits(gray),
            TransparencyValue::Rgb(r, g, b) => fits(r) && fits(g) && fits(b),
            TransparencyValue::PaletteAlphas(_) => true,
        }
    }

    /// Write the value as a tRNS chunk payload.
    pub fn write_payload<W: io::Write>(&self, stream: &mut W) -> io::Result<()> {
        match self {
            TransparencyValue::Gray(gray) => stream.write_u16::<BigEndian>(*gray),
            TransparencyValue::Rgb(r, g, b) => {
                stream.write_u16::<BigEndian>(*r)?;
                stream.write_u16::<BigEndian>(*g)?;
                stream.write_u16::<BigEndian>(*b)
            }
            TransparencyValue::PaletteAlphas(alphas) => stream.write_all(alphas),
        }
    }
}

/// Ancillary information collected during a decode session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoRecord {
    transparency: Option<TransparencyValue>,
    transparency_valid: bool,
}

impl InfoRecord {
    pub fn new() -> Self {
        InfoRecord::default()
    }

    /// Committed transparency, if any.
    pub fn transparency(&self) -> Option<&TransparencyValue> {
        if self.transparency_valid {
            self.transparency.as_ref()
        } else {
            None
        }
    }

    pub fn is_transparency_valid(&self) -> bool {
        self.transparency_valid
    }

    /// Store `value`. Fails without touching the record if a value was already stored.
    pub fn set_transparency(&mut self, value: TransparencyValue) -> Result<(), BenignChunkError> {
        if self.transparency_valid {
            return Err(BenignChunkError::Duplicate);
        }

        self.transparency = Some(value);
        self.transparency_valid = true;
        Ok(())
    }

    /// Consume the record and take the committed transparency.
    pub fn into_transparency(self) -> Option<TransparencyValue> {
        if self.transparency_valid {
            self.transparency
        } else {
            None
        }
    }
}
