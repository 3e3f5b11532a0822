//! A strict gif decoder producing RGB frames
//!
//! Decodes the block stream of a gif file, runs the LZW dictionary
//! decoder over every sub-image and resolves color indices to RGB
//! through the applicable color table. Interlaced images and
//! sub-images that do not span the full logical screen are rejected,
//! the matrix display this family targets composites nothing.
//!
//! Entry points are [`decode_gif`] for one-shot use and
//! [`GifDecoder`] when options or headers matter.
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate alloc;

mod decoder;
mod enums;
mod errors;
mod lzw;

pub use decoder::{
    decode_gif, GifDecoder, GifImage, GraphicControl, ImageDescriptor, ScreenDescriptor, SubImage
};
pub use enums::DisposalMethod;
pub use errors::GifError;
