#![no_main]
use libfuzzer_sys::fuzz_target;
use png_trns::low_level::{payload, StreamCursor, TRNS};
use png_trns::ColorMode;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let (params, bytes) = data.split_at(3);

    let Some(mode) = ColorMode::from_color_type(params[0] % 7) else {
        return;
    };
    let have_palette = params[1] & 1 != 0;
    let palette_size = u16::from(params[2]) + u16::from(params[1] >> 7);

    // Check that it decodes without a panic and never reads past the payload.
    let mut cursor = StreamCursor::new(bytes, TRNS);
    let length = bytes.len() as u32;
    if let Ok(value) = payload::decode(mode, length, have_palette, palette_size, &mut cursor) {
        let mut written = Vec::new();
        value.write_payload(&mut written).unwrap();
        assert_eq!(&written[..], bytes);
    }
});
