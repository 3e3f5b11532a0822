#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk types this decoder interprets, see
/// <https://www.w3.org/TR/2003/REC-PNG-20031110/> table 5.3.
///
/// Everything else lands on `unkn` and is skipped after its crc
/// has been confirmed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum PngChunkType {
    IHDR,
    IDAT,
    IEND,
    unkn
}

/// Scanline filter as stored in the first byte of every scanline.
///
/// The `*First` variants never appear in a stream, the unfiltering
/// loop substitutes them on the first scanline where the row above
/// is defined to be zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth,
    // First scanline, special
    PaethFirst,
    AvgFirst,
    // Unknown type of filter
    Unknown
}

impl FilterMethod {
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }

    /// The on-stream byte for this filter.
    ///
    /// Only meaningful for the five filters the format defines.
    pub(crate) const fn to_int(self) -> u8 {
        match self {
            FilterMethod::None => 0,
            FilterMethod::Sub => 1,
            FilterMethod::Up => 2,
            FilterMethod::Average => 3,
            FilterMethod::Paeth => 4,
            _ => unreachable!()
        }
    }
}

impl Default for FilterMethod {
    fn default() -> Self {
        FilterMethod::Unknown
    }
}

/// Color type from the ihdr, restricted to the two types that map
/// onto raw matrix pixel buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor {
    RGB,
    RGBA,
    Unknown
}

impl Default for PngColor {
    fn default() -> Self {
        Self::Unknown
    }
}

impl PngColor {
    pub(crate) fn num_components(self) -> u8 {
        match self {
            PngColor::RGB => 3,
            PngColor::RGBA => 4,
            PngColor::Unknown => unreachable!()
        }
    }

    pub(crate) fn from_int(int: u8) -> Option<PngColor> {
        match int {
            2 => Some(Self::RGB),
            6 => Some(Self::RGBA),
            _ => None
        }
    }
}
