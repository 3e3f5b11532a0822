//! A strict png decoder for pixel matrix pipelines.
//!
//! Decodes the still-image subset a fixed size rgb matrix can show:
//! 8 bit truecolor with or without alpha, no interlacing. Chunk crcs
//! are always confirmed and any structural damage aborts the decode,
//! a matrix is better off showing nothing than showing garbage.
//!
//! A small encoder is included for producing test streams, it writes
//! stored zlib blocks so it needs no compressor.
#![cfg_attr(not(feature = "std"), no_std)]
#[macro_use]
extern crate alloc;

pub use crate::decoder::{decode_png, PngDecoder, PngImage, PngInfo};
pub use crate::encoder::PngEncoder;
pub use crate::enums::{FilterMethod, PngColor};
pub use crate::error::PngError;

mod crc;
mod decoder;
mod encoder;
mod enums;
mod error;
mod filters;
mod headers;
