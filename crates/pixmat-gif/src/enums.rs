/// Block types a gif stream is made of, dispatched on the
/// single byte that introduces each block.
///
/// Anything outside the three introducers defined by the format is
/// carried as [`Unknown`](Self::Unknown) and skipped by the decoder
/// so unaware readers stay forward compatible.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Block {
    /// `0x21`, followed by a one byte label
    Extension,
    /// `0x2C`, starts one sub-image
    ImageDescriptor,
    /// `0x3B`, ends the stream
    Trailer,
    Unknown(u8)
}

impl Block {
    pub fn from_u8(value: u8) -> Block {
        match value {
            0x21 => Block::Extension,
            0x2C => Block::ImageDescriptor,
            0x3B => Block::Trailer,
            _ => Block::Unknown(value)
        }
    }
}

/// Different GIF disposal methods
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DisposalMethod {
    None = 0,
    InPlace = 1,
    Background = 2,
    Restore = 3
}

impl DisposalMethod {
    /// Extract the disposal method from the packed graphic control
    /// flag byte, bits 2 to 4.
    pub fn from_flags(value: u8) -> DisposalMethod {
        match (value >> 2) & 0x07 {
            1 => DisposalMethod::InPlace,
            2 => DisposalMethod::Background,
            3 => DisposalMethod::Restore,
            _ => DisposalMethod::None
        }
    }
}
