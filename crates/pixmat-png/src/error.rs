use core::fmt::{Debug, Formatter};

use pixmat_core::bytestream::ByteIoError;
use zune_inflate::errors::InflateDecodeErrors;

/// Everything that can go wrong while decoding or encoding a png.
pub enum PngError {
    /// The stream does not start with the png signature.
    BadSignature,
    /// A chunk crc did not match the one stored in the stream.
    ///
    /// Fields are the stored crc and the calculated crc.
    BadCrc(u32, u32),
    /// `decode` was called a second time on the same decoder.
    AlreadyDecoded,
    /// Valid png, but a feature outside this decoder's scope.
    NotSupported(&'static str),
    /// The stream violates the png structure.
    Inconsistent(&'static str),
    /// A dimension was larger than the configured limit.
    ///
    /// Fields are the dimension name, the configured limit and the
    /// value found in the stream.
    TooLargeDimensions(&'static str, usize, usize),
    /// The idat payload inflated to the wrong number of bytes.
    ///
    /// Fields are expected bytes and found bytes.
    WrongInflatedSize(usize, usize),
    /// Arithmetic on dimensions overflowed.
    OverflowError(&'static str),
    /// The inflate library could not decode the idat payload.
    ZlibDecodeErrors(InflateDecodeErrors),
    /// The stream ended inside a structure.
    IoErrors(ByteIoError)
}

impl Debug for PngError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::BadCrc(expected, found) => writeln!(
                f,
                "CRC does not match, stream has {expected:08X} but calculated {found:08X}"
            ),
            Self::AlreadyDecoded => writeln!(f, "Image has already been decoded"),
            Self::NotSupported(reason) => writeln!(f, "Not supported: {reason}"),
            Self::Inconsistent(reason) => writeln!(f, "Inconsistent stream: {reason}"),
            Self::TooLargeDimensions(dimension, limit, found) => writeln!(
                f,
                "Too large {dimension}, configured limit is {limit} but stream says {found}"
            ),
            Self::WrongInflatedSize(expected, found) => writeln!(
                f,
                "Wrong inflated size, expected {expected} bytes but got {found}"
            ),
            Self::OverflowError(reason) => writeln!(f, "Overflow calculating {reason}"),
            Self::ZlibDecodeErrors(err) => writeln!(f, "Error decoding idat chunks {err:?}"),
            Self::IoErrors(err) => writeln!(f, "{err:?}")
        }
    }
}

impl From<ByteIoError> for PngError {
    fn from(value: ByteIoError) -> Self {
        Self::IoErrors(value)
    }
}

impl From<InflateDecodeErrors> for PngError {
    fn from(value: InflateDecodeErrors) -> Self {
        Self::ZlibDecodeErrors(value)
    }
}
