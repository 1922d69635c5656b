//! Decode-session state consulted by the tRNS handler.
use crate::low_level::MAX_PALETTE_ENTRIES;

/// Pixel encoding declared by IHDR.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Single gray sample.
    Gray,
    /// Gray sample followed by alpha sample.
    GrayAlpha,
    /// Red, green and blue samples.
    Rgb,
    /// Red, green, blue and alpha samples.
    RgbAlpha,
    /// Index into the palette.
    Palette,
}

impl ColorMode {
    /// Map a PNG color type code to a color mode.
    pub fn from_color_type(color_type: u8) -> Option<ColorMode> {
        match color_type {
            0 => Some(ColorMode::Gray),
            2 => Some(ColorMode::Rgb),
            3 => Some(ColorMode::Palette),
            4 => Some(ColorMode::GrayAlpha),
            6 => Some(ColorMode::RgbAlpha),
            _ => None,
        }
    }

    /// PNG color type code of this mode.
    pub fn color_type(self) -> u8 {
        match self {
            ColorMode::Gray => 0,
            ColorMode::Rgb => 2,
            ColorMode::Palette => 3,
            ColorMode::GrayAlpha => 4,
            ColorMode::RgbAlpha => 6,
        }
    }
}

/// Flags and counters of a single decode session.
///
/// Everything except `trns_seen` is maintained by the chunk framing layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageState {
    /// IHDR has been processed.
    pub have_header: bool,

    /// Image data chunks have started. Ancillary chunks are out of place after this.
    pub have_image_data: bool,

    /// PLTE has been processed.
    pub have_palette: bool,

    /// Number of palette entries declared by PLTE. Only meaningful when `have_palette` is set.
    pub declared_palette_size: u16,

    /// Color mode declared by IHDR.
    pub color_mode: ColorMode,

    /// Bits per sample declared by IHDR.
    pub bit_depth: u8,

    /// A tRNS chunk has been committed. Diagnostic only, `InfoRecord` is authoritative.
    pub trns_seen: bool,
}

impl ImageState {
    /// State right after IHDR was read.
    pub fn with_header(color_mode: ColorMode, bit_depth: u8) -> Self {
        ImageState {
            have_header: true,
            color_mode,
            bit_depth,
            ..ImageState::default()
        }
    }

    /// Record a PLTE chunk with `entries` colors. Sizes past 256 are clamped.
    pub fn set_palette(&mut self, entries: usize) {
        self.have_palette = true;
        self.declared_palette_size = entries.min(MAX_PALETTE_ENTRIES) as u16;
    }

    /// Upper bound on the number of tRNS palette alphas, zero when no palette is known.
    pub fn palette_limit(&self) -> usize {
        if self.have_palette {
            usize::from(self.declared_palette_size).min(MAX_PALETTE_ENTRIES)
        } else {
            0
        }
    }
}

impl Default for ImageState {
    fn default() -> Self {
        ImageState {
            have_header: false,
            have_image_data: false,
            have_palette: false,
            declared_palette_size: 0,
            color_mode: ColorMode::Gray,
            bit_depth: 8,
            trns_seen: false,
        }
    }
}
