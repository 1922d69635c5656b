//! Decoder for the PNG transparency chunk (tRNS).
//!
//! The chunk framing layer owns the byte stream and the session flags. When it meets a tRNS
//! chunk it calls `handle` with the session's `ImageState`, the `InfoRecord` that collects
//! results, the declared payload length and a `ChunkCursor` over the payload.
//!
//! ```
//! use png_trns::low_level::{read_chunk_header, write_chunk, StreamCursor};
//! use png_trns::{handle, ColorMode, ImageState, InfoRecord, TransparencyValue};
//!
//! let mut png = Vec::new();
//! write_chunk(&mut png, *b"tRNS", &[0x00, 0x2A]).unwrap();
//!
//! let mut state = ImageState::with_header(ColorMode::Gray, 8);
//! let mut info = InfoRecord::new();
//!
//! let mut stream = &png[..];
//! let (length, chunk_type) = read_chunk_header(&mut stream).unwrap();
//! let mut cursor = StreamCursor::new(stream, chunk_type);
//!
//! match handle(&mut state, &mut info, length, &mut cursor) {
//!     Ok(()) => {}
//!     Err(err) if err.is_fatal() => panic!("abort decoding: {}", err),
//!     Err(_) => {} // the image simply has no transparency
//! }
//!
//! assert_eq!(info.transparency(), Some(&TransparencyValue::Gray(42)));
//! ```
pub mod low_level;

mod error;
mod handler;
mod info;
mod options;
mod state;

pub use error::{BenignChunkError, ChunkError, FatalChunkError};
pub use handler::{handle, handle_with_options};
pub use info::{InfoRecord, TransparencyValue};
pub use options::{ChecksumPolicy, TrnsOptions};
pub use state::{ColorMode, ImageState};
