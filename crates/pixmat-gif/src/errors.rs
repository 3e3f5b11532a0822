/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Formatter};

use pixmat_core::bytestream::ByteIoError;

/// Errors the gif decoder can raise.
///
/// The decoder is strict, the first error seen aborts the whole
/// decode and no partial document is ever returned.
pub enum GifError {
    /// File is not a gif
    NotAGif,
    /// `decode` was called on a decoder that already ran to completion
    AlreadyDecoded,
    /// A valid gif feature this decoder does not implement
    NotSupported(&'static str),
    /// A structural or semantic violation in the block stream
    Inconsistent(&'static str),
    /// A sub-image needs a color table but neither a local nor a
    /// global one is present
    MissingColorTable,
    /// A decoded color index pointed past the end of the active
    /// color table, fields are the index and the table length
    ColorIndexOutOfBounds(usize, usize),
    /// Too large dimensions for width or height
    TooLargeDimensions(&'static str, usize, usize),
    /// A calculation that wasn't meant to overflow overflowed
    OverflowError(&'static str),
    /// Underlying input output errors
    IoErrors(ByteIoError)
}

impl Debug for GifError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            GifError::NotAGif => {
                writeln!(f, "Not a gif, magic bytes didn't match")
            }
            GifError::AlreadyDecoded => {
                writeln!(f, "Decode was called on an already decoded context")
            }
            GifError::NotSupported(reason) => {
                writeln!(f, "Unsupported: {reason}")
            }
            GifError::Inconsistent(reason) => {
                writeln!(f, "Inconsistent gif stream: {reason}")
            }
            GifError::MissingColorTable => {
                writeln!(f, "Neither a local nor a global color table is present")
            }
            GifError::ColorIndexOutOfBounds(index, size) => {
                writeln!(
                    f,
                    "Color index {index} out of bounds for a color table of {size} entries"
                )
            }
            GifError::TooLargeDimensions(a, b, c) => {
                writeln!(
                    f,
                    "Too large dimensions for {a} expected less than {b} but found {c}"
                )
            }
            GifError::OverflowError(err) => {
                writeln!(
                    f,
                    "A calculation that wasn't meant to overflow overflowed :{err}"
                )
            }
            GifError::IoErrors(err) => {
                writeln!(f, "{err:?}")
            }
        }
    }
}

impl From<ByteIoError> for GifError {
    fn from(value: ByteIoError) -> Self {
        GifError::IoErrors(value)
    }
}
