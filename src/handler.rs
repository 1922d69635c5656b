use tracing::{debug, warn};

use crate::error::{BenignChunkError, ChunkError, FatalChunkError};
use crate::info::InfoRecord;
use crate::low_level::{payload, ChunkCursor};
use crate::options::{ChecksumPolicy, TrnsOptions};
use crate::state::ImageState;

/// Handle a tRNS chunk of `length` payload bytes with default options.
///
/// `cursor` must be positioned at the start of the chunk payload. On success the decoded value is
/// committed to `info`. On error neither `state` nor `info` is modified and, unless the stream
/// itself failed, the whole chunk including its CRC has been consumed.
///
/// Only fatal errors (see `ChunkError::is_fatal`) require the caller to abort decoding.
pub fn handle<C: ChunkCursor>(
    state: &mut ImageState,
    info: &mut InfoRecord,
    length: u32,
    cursor: &mut C,
) -> Result<(), ChunkError> {
    handle_with_options(state, info, length, cursor, &TrnsOptions::default())
}

/// Same as `handle`, with explicit options.
pub fn handle_with_options<C: ChunkCursor>(
    state: &mut ImageState,
    info: &mut InfoRecord,
    length: u32,
    cursor: &mut C,
    options: &TrnsOptions,
) -> Result<(), ChunkError> {
    debug!(length, mode = ?state.color_mode, "handling tRNS chunk");

    if !state.have_header {
        return reject(cursor, length, FatalChunkError::MissingHeader.into());
    }
    if state.have_image_data {
        return reject(cursor, length, BenignChunkError::OutOfPlaceAfterImageData.into());
    }
    if info.is_transparency_valid() {
        return reject(cursor, length, BenignChunkError::Duplicate.into());
    }

    let value = match payload::decode(
        state.color_mode,
        length,
        state.have_palette,
        state.declared_palette_size,
        cursor,
    ) {
        Ok(value) => value,
        Err(err @ ChunkError::Fatal(_)) => return Err(err),
        Err(err) => return reject(cursor, length, err),
    };

    let checksum = cursor.finish_and_verify_checksum()?;
    if !checksum.is_valid() {
        match options.checksum {
            ChecksumPolicy::Verify => {
                debug!(?checksum, "tRNS chunk discarded: CRC error");
                return Err(BenignChunkError::ChecksumMismatch.into());
            }
            ChecksumPolicy::Ignore => {
                warn!(?checksum, "tRNS chunk CRC error ignored");
            }
        }
    }

    if !value.fits_bit_depth(state.bit_depth) {
        warn!(
            bit_depth = state.bit_depth,
            ?value,
            "tRNS chunk has out-of-range samples for bit depth"
        );
    }

    let num_trans = value.num_trans();
    info.set_transparency(value)?;
    state.trns_seen = true;

    debug!(num_trans, "tRNS chunk committed");
    Ok(())
}

// Consume what is left of the chunk so the stream stays aligned, then report `err`.
fn reject<C: ChunkCursor>(cursor: &mut C, length: u32, err: ChunkError) -> Result<(), ChunkError> {
    cursor.skip(length.saturating_sub(cursor.consumed()))?;
    let checksum = cursor.finish_and_verify_checksum()?;

    debug!(error = %err, ?checksum, "tRNS chunk rejected");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::TransparencyValue;
    use crate::low_level::{read_chunk_header, write_chunk, StreamCursor, TRNS};
    use crate::state::ColorMode;

    fn chunk(payload: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        write_chunk(&mut data, TRNS, payload).unwrap();
        data
    }

    // Run the handler over serialized chunk `data` followed by a sentinel byte, checking that
    // the stream is left right after the chunk.
    fn run(
        state: &mut ImageState,
        info: &mut InfoRecord,
        data: &[u8],
        options: &TrnsOptions,
    ) -> Result<(), ChunkError> {
        let mut stream = data.to_vec();
        stream.push(0xEE);

        let mut rest = &stream[..];
        let (length, chunk_type) = read_chunk_header(&mut rest).unwrap();
        assert_eq!(chunk_type, TRNS);

        let mut cursor = StreamCursor::new(rest, chunk_type);
        let result = handle_with_options(state, info, length, &mut cursor, options);
        if !matches!(result, Err(ChunkError::Fatal(FatalChunkError::ShortRead { .. }))) {
            assert_eq!(cursor.into_inner(), &[0xEE][..], "stream misaligned");
        }
        result
    }

    fn run_default(
        state: &mut ImageState,
        info: &mut InfoRecord,
        payload: &[u8],
    ) -> Result<(), ChunkError> {
        let options = TrnsOptions {
            checksum: ChecksumPolicy::Verify,
        };
        run(state, info, &chunk(payload), &options)
    }

    // Expect `payload` to be rejected with `expected` and nothing to change.
    fn assert_rejected(
        state: &ImageState,
        info: &InfoRecord,
        payload: &[u8],
        expected: BenignChunkError,
    ) {
        let mut state_after = state.clone();
        let mut info_after = info.clone();
        match run_default(&mut state_after, &mut info_after, payload) {
            Err(ChunkError::Benign(err)) => assert_eq!(err, expected),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
        assert_eq!(&state_after, state);
        assert_eq!(&info_after, info);
    }

    fn palette_state(entries: usize) -> ImageState {
        let mut state = ImageState::with_header(ColorMode::Palette, 8);
        state.set_palette(entries);
        state
    }

    #[test]
    fn gray() {
        let mut state = ImageState::with_header(ColorMode::Gray, 16);
        let mut info = InfoRecord::new();
        run_default(&mut state, &mut info, &[0x00, 0x2A]).unwrap();

        assert_eq!(info.transparency(), Some(&TransparencyValue::Gray(42)));
        assert!(info.is_transparency_valid());
        assert!(state.trns_seen);
    }

    #[test]
    fn rgb() {
        let mut state = ImageState::with_header(ColorMode::Rgb, 8);
        let mut info = InfoRecord::new();
        run_default(&mut state, &mut info, &[0, 1, 0, 2, 0, 3]).unwrap();
        assert_eq!(info.transparency(), Some(&TransparencyValue::Rgb(1, 2, 3)));
    }

    #[test]
    fn palette() {
        let mut state = palette_state(4);
        let mut info = InfoRecord::new();
        run_default(&mut state, &mut info, &[10, 20, 30]).unwrap();

        let value = info.transparency().unwrap();
        assert_eq!(value, &TransparencyValue::PaletteAlphas(vec![10, 20, 30]));
        assert_eq!(value.alpha_for_index(3), 255);
        assert!(info.is_transparency_valid());
    }

    #[test]
    fn committed_alphas_are_owned() {
        let mut state = palette_state(4);
        let mut info = InfoRecord::new();
        let data = chunk(&[1, 2]);
        run(&mut state, &mut info, &data, &TrnsOptions::default()).unwrap();

        let mut taken = info.into_transparency().unwrap();
        if let TransparencyValue::PaletteAlphas(alphas) = &mut taken {
            alphas[0] = 99;
        }

        let mut fresh = InfoRecord::new();
        let mut state = palette_state(4);
        run(&mut state, &mut fresh, &data, &TrnsOptions::default()).unwrap();
        assert_eq!(fresh.transparency(), Some(&TransparencyValue::PaletteAlphas(vec![1, 2])));
    }

    #[test]
    fn second_chunk_in_session_is_duplicate() {
        let mut state = ImageState::with_header(ColorMode::Gray, 8);
        let mut info = InfoRecord::new();
        run_default(&mut state, &mut info, &[0, 1]).unwrap();

        let err = run_default(&mut state, &mut info, &[0, 2]).unwrap_err();
        assert_eq!(err.benign(), Some(BenignChunkError::Duplicate));
        assert_eq!(info.into_transparency(), Some(TransparencyValue::Gray(1)));
    }

    #[test]
    fn duplicate() {
        let mut state = ImageState::with_header(ColorMode::Gray, 8);
        let mut info = InfoRecord::new();
        run_default(&mut state, &mut info, &[0, 1]).unwrap();

        assert_rejected(&state, &info, &[0, 2], BenignChunkError::Duplicate);
        assert_eq!(info.transparency(), Some(&TransparencyValue::Gray(1)));
    }

    #[test]
    fn missing_header_is_fatal() {
        let state = ImageState::default();
        let info = InfoRecord::new();

        let mut state_after = state.clone();
        let mut info_after = info.clone();
        let err = run_default(&mut state_after, &mut info_after, &[0, 1]).unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(err, ChunkError::Fatal(FatalChunkError::MissingHeader)));
        assert_eq!(state_after, state);
        assert_eq!(info_after, info);
    }

    #[test]
    fn after_image_data() {
        let mut state = ImageState::with_header(ColorMode::Gray, 8);
        state.have_image_data = true;
        assert_rejected(
            &state,
            &InfoRecord::new(),
            &[0, 1],
            BenignChunkError::OutOfPlaceAfterImageData,
        );
    }

    #[test]
    fn invalid_lengths() {
        let state = ImageState::with_header(ColorMode::Gray, 8);
        assert_rejected(
            &state,
            &InfoRecord::new(),
            &[0, 1, 2],
            BenignChunkError::InvalidLength { length: 3 },
        );

        let state = ImageState::with_header(ColorMode::Rgb, 8);
        assert_rejected(
            &state,
            &InfoRecord::new(),
            &[0; 4],
            BenignChunkError::InvalidLength { length: 4 },
        );

        let state = palette_state(4);
        assert_rejected(
            &state,
            &InfoRecord::new(),
            &[],
            BenignChunkError::InvalidLength { length: 0 },
        );
        assert_rejected(
            &state,
            &InfoRecord::new(),
            &[0; 5],
            BenignChunkError::InvalidLength { length: 5 },
        );

        let state = palette_state(0);
        assert_rejected(
            &state,
            &InfoRecord::new(),
            &[0],
            BenignChunkError::InvalidLength { length: 1 },
        );
    }

    #[test]
    fn palette_before_plte() {
        let state = ImageState::with_header(ColorMode::Palette, 8);
        assert_rejected(
            &state,
            &InfoRecord::new(),
            &[0, 0],
            BenignChunkError::OutOfPlaceBeforePalette,
        );
    }

    #[test]
    fn alpha_modes() {
        for mode in [ColorMode::GrayAlpha, ColorMode::RgbAlpha] {
            let state = ImageState::with_header(mode, 8);
            assert_rejected(
                &state,
                &InfoRecord::new(),
                &[0, 0],
                BenignChunkError::InvalidForAlphaMode,
            );
        }
    }

    #[test]
    fn checksum_mismatch() {
        let state = ImageState::with_header(ColorMode::Gray, 8);
        let info = InfoRecord::new();
        let mut data = chunk(&[0x00, 0x2A]);
        let last = data.len() - 1;
        data[last] ^= 0xFF;

        let mut state_after = state.clone();
        let mut info_after = info.clone();
        let options = TrnsOptions { checksum: ChecksumPolicy::Verify };
        let err = run(&mut state_after, &mut info_after, &data, &options).unwrap_err();

        assert_eq!(err.benign(), Some(BenignChunkError::ChecksumMismatch));
        assert!(!info_after.is_transparency_valid());
        assert_eq!(state_after, state);
        assert_eq!(info_after, info);

        let options = TrnsOptions { checksum: ChecksumPolicy::Ignore };
        run(&mut state_after, &mut info_after, &data, &options).unwrap();
        assert_eq!(info_after.transparency(), Some(&TransparencyValue::Gray(42)));
    }

    #[test]
    fn rejection_wins_over_bad_checksum() {
        let state = ImageState::with_header(ColorMode::Gray, 8);
        let mut data = chunk(&[0, 0, 0]);
        let last = data.len() - 1;
        data[last] ^= 0xFF;

        let mut state_after = state.clone();
        let mut info = InfoRecord::new();
        let err = run(&mut state_after, &mut info, &data, &TrnsOptions::default()).unwrap_err();
        assert_eq!(err.benign(), Some(BenignChunkError::InvalidLength { length: 3 }));
    }

    #[test]
    fn out_of_range_sample_is_kept() {
        let mut state = ImageState::with_header(ColorMode::Gray, 8);
        let mut info = InfoRecord::new();
        run_default(&mut state, &mut info, &[0x01, 0x2C]).unwrap();
        assert_eq!(info.transparency(), Some(&TransparencyValue::Gray(300)));
    }

    #[test]
    fn truncated_chunk_is_fatal() {
        let state = ImageState::with_header(ColorMode::Rgb, 8);
        let info = InfoRecord::new();
        let data = chunk(&[0, 1, 0, 2, 0, 3]);

        let mut state_after = state.clone();
        let mut info_after = info.clone();
        let options = TrnsOptions::default();
        let err = run(&mut state_after, &mut info_after, &data[..11], &options).unwrap_err();
        assert!(matches!(err, ChunkError::Fatal(FatalChunkError::ShortRead { .. })));
        assert_eq!(state_after, state);
        assert_eq!(info_after, info);

        // Draining a rejected chunk can also run out of stream.
        let state = ImageState::with_header(ColorMode::GrayAlpha, 8);
        let mut state_after = state.clone();
        let options = TrnsOptions::default();
        let err = run(&mut state_after, &mut info_after, &data[..11], &options).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(state_after, state);
    }
}
