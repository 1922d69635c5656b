#![no_main]
use libfuzzer_sys::fuzz_target;
use png_trns::low_level::{read_chunk_header, StreamCursor};
use png_trns::{handle, ColorMode, ImageState, InfoRecord};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (params, mut stream) = data.split_at(2);

    let Some(mode) = ColorMode::from_color_type(params[0] & 7) else {
        return;
    };
    let mut state = ImageState::with_header(mode, 8);
    state.have_header = params[1] & 1 != 0;
    state.have_image_data = params[1] & 2 != 0;
    if params[1] & 4 != 0 {
        state.set_palette(usize::from(params[1] >> 3) * 9);
    }
    let mut info = InfoRecord::new();

    // Feed every chunk in the stream; stop where a real decoder would.
    while let Ok((length, chunk_type)) = read_chunk_header(&mut stream) {
        let before = (state.clone(), info.clone());
        let mut cursor = StreamCursor::new(stream, chunk_type);
        let result = handle(&mut state, &mut info, length, &mut cursor);
        stream = cursor.into_inner();

        match result {
            Ok(()) => assert!(info.is_transparency_valid()),
            Err(err) => {
                assert!(before == (state.clone(), info.clone()));
                if err.is_fatal() {
                    break;
                }
            }
        }
    }
});
