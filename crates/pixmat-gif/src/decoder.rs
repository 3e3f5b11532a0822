/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use log::{trace, warn};
use pixmat_core::bytestream::ByteReader;
use pixmat_core::options::DecoderOptions;

use crate::enums::{Block, DisposalMethod};
use crate::errors::GifError;
use crate::lzw;

/// Label of the graphic control extension, the only extension this
/// decoder interprets.
const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;

// Packed flag byte extraction. Both descriptor flag bytes keep the
// table presence flag in bit 7 and the table size exponent in the
// low three bits.

/// Bit 7: a color table follows this descriptor.
const fn has_color_table(flags: u8) -> bool {
    (flags & 0x80) != 0
}

/// Bits 0..=2: size exponent, the table holds `2^(exp + 1)` entries.
const fn color_table_entries(flags: u8) -> usize {
    2 << (flags & 0x07)
}

/// Screen descriptor bits 4..=6: color resolution of the source
/// palette, minus one.
const fn screen_color_resolution(flags: u8) -> u8 {
    (flags >> 4) & 0x07
}

/// Screen descriptor bit 3: global table is sorted by importance.
const fn screen_table_sorted(flags: u8) -> bool {
    (flags & 0x08) != 0
}

/// Image descriptor bit 6: sub-image rows are interlaced.
const fn descriptor_interlaced(flags: u8) -> bool {
    (flags & 0x40) != 0
}

/// Image descriptor bit 5: local table is sorted by importance.
const fn descriptor_table_sorted(flags: u8) -> bool {
    (flags & 0x20) != 0
}

/// Graphic control bit 0: the transparent index is meaningful.
const fn control_has_transparency(flags: u8) -> bool {
    (flags & 0x01) != 0
}

/// Graphic control bit 1: wait for user input before advancing.
const fn control_user_input(flags: u8) -> bool {
    (flags & 0x02) != 0
}

/// Everything the 7 byte logical screen descriptor declares.
///
/// Set once right after the magic bytes and immutable afterwards.
#[derive(Debug, Copy, Clone, Default)]
pub struct ScreenDescriptor {
    pub width:                usize,
    pub height:               usize,
    pub has_global_table:     bool,
    /// Entry count of the global table, 0 when absent.
    pub global_table_entries: usize,
    pub color_resolution:     u8,
    pub sorted:               bool,
    pub background_index:     u8,
    pub aspect_ratio:         u8
}

/// A graphic control extension block attached to the sub-image
/// that followed it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GraphicControl {
    pub disposal:          DisposalMethod,
    pub user_input:        bool,
    pub has_transparency:  bool,
    /// Display delay in units of 10 ms.
    pub delay_time:        u16,
    pub transparent_index: u8
}

impl GraphicControl {
    /// The display delay in milliseconds.
    pub const fn delay_ms(&self) -> u32 {
        self.delay_time as u32 * 10
    }
}

/// The 9 byte descriptor introducing one sub-image.
#[derive(Debug, Copy, Clone)]
pub struct ImageDescriptor {
    /// Offset of the sub-image from the left of the screen.
    pub left:                usize,
    /// Offset of the sub-image from the top of the screen.
    pub top:                 usize,
    pub width:               usize,
    pub height:              usize,
    pub has_local_table:     bool,
    /// Entry count of the local table, 0 when absent.
    pub local_table_entries: usize,
    pub sorted:              bool
}

/// One decoded sub-image.
pub struct SubImage {
    pub descriptor:      ImageDescriptor,
    pub local_table:     Option<Vec<[u8; 3]>>,
    /// The control block that preceded this sub-image, if any.
    /// Sub-images without one carry no timing information.
    pub graphic_control: Option<GraphicControl>,
    /// One color table index per pixel, row major,
    /// exactly `width * height` long.
    pub indices:         Vec<u8>,
    /// The indices resolved through the active color table,
    /// 3 bytes per pixel.
    pub pixels:          Vec<u8>
}

/// A fully decoded gif document.
pub struct GifImage {
    pub screen:       ScreenDescriptor,
    pub global_table: Option<Vec<[u8; 3]>>,
    /// Sub-images in stream order.
    pub sub_images:   Vec<SubImage>
}

impl GifImage {
    /// Width and height declared by the screen descriptor.
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.screen.width, self.screen.height)
    }

    /// More than one sub-image makes the document an animation.
    pub fn is_animation(&self) -> bool {
        self.sub_images.len() > 1
    }
}

/// A gif decoder over borrowed input.
///
/// ```no_run
/// use pixmat_gif::GifDecoder;
///
/// let data = std::fs::read("image.gif").unwrap();
/// let mut decoder = GifDecoder::new(&data);
/// let image = decoder.decode().unwrap();
/// ```
pub struct GifDecoder<'a> {
    stream:          ByteReader<'a>,
    options:         DecoderOptions,
    screen:          ScreenDescriptor,
    global_table:    Option<Vec<[u8; 3]>>,
    pending_control: Option<GraphicControl>,
    read_headers:    bool,
    decoded:         bool
}

impl<'a> GifDecoder<'a> {
    pub fn new(data: &'a [u8]) -> GifDecoder<'a> {
        GifDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> GifDecoder<'a> {
        GifDecoder {
            stream: ByteReader::new(data),
            options,
            screen: ScreenDescriptor::default(),
            global_table: None,
            pending_control: None,
            read_headers: false,
            decoded: false
        }
    }

    /// Parse the magic bytes, the logical screen descriptor and the
    /// global color table if one is present.
    ///
    /// Idempotent, `decode` calls it on its own.
    pub fn decode_headers(&mut self) -> Result<(), GifError> {
        if self.read_headers {
            return Ok(());
        }
        if !test_gif(&mut self.stream) {
            return Err(GifError::NotAGif);
        }

        let width = usize::from(self.stream.get_u16_le_err()?);
        let height = usize::from(self.stream.get_u16_le_err()?);

        let flags = self.stream.get_u8_err()?;
        let background_index = self.stream.get_u8_err()?;
        let aspect_ratio = self.stream.get_u8_err()?;

        if width > self.options.get_max_width() {
            return Err(GifError::TooLargeDimensions(
                "width",
                self.options.get_max_width(),
                width
            ));
        }
        if height > self.options.get_max_height() {
            return Err(GifError::TooLargeDimensions(
                "height",
                self.options.get_max_height(),
                height
            ));
        }

        self.screen = ScreenDescriptor {
            width,
            height,
            has_global_table: has_color_table(flags),
            global_table_entries: if has_color_table(flags) {
                color_table_entries(flags)
            } else {
                0
            },
            color_resolution: screen_color_resolution(flags),
            sorted: screen_table_sorted(flags),
            background_index,
            aspect_ratio
        };

        if self.screen.has_global_table {
            let table = parse_color_table(&mut self.stream, self.screen.global_table_entries)?;
            self.global_table = Some(table);
        }

        trace!("Image width  :{}", self.screen.width);
        trace!("Image height :{}", self.screen.height);
        trace!("Global table entries: {}", self.screen.global_table_entries);

        self.read_headers = true;

        Ok(())
    }

    /// Decode the whole document.
    ///
    /// Walks the block stream until the trailer, decoding every
    /// sub-image. The first malformed structure aborts the decode;
    /// nothing partial is ever returned.
    pub fn decode(&mut self) -> Result<GifImage, GifError> {
        if self.decoded {
            return Err(GifError::AlreadyDecoded);
        }
        self.decode_headers()?;

        let mut sub_images = Vec::new();

        loop {
            let introducer = self.stream.get_u8_err()?;

            match Block::from_u8(introducer) {
                Block::Extension => self.parse_extension()?,
                Block::ImageDescriptor => {
                    let image = self.decode_sub_image()?;
                    sub_images.push(image);
                }
                Block::Trailer => break,
                Block::Unknown(value) => {
                    // seen in the wild as stray padding, the byte is
                    // consumed so the loop always advances
                    warn!("Ignoring unknown block introducer {value:#04X}");
                }
            }
        }

        trace!("Decoded {} sub image(s)", sub_images.len());

        self.decoded = true;

        Ok(GifImage {
            screen:       self.screen,
            global_table: self.global_table.take(),
            sub_images
        })
    }

    fn parse_extension(&mut self) -> Result<(), GifError> {
        let label = self.stream.get_u8_err()?;

        if label == GRAPHIC_CONTROL_LABEL {
            self.parse_graphic_control()
        } else {
            // comment, plain text, application, whatever else;
            // all share the sub-block framing
            self.skip_sub_blocks()
        }
    }

    /// Fixed layout block: length byte which must be 4, packed flags,
    /// delay, transparent index, zero terminator.
    fn parse_graphic_control(&mut self) -> Result<(), GifError> {
        let block_size = self.stream.get_u8_err()?;

        if block_size != 4 {
            return Err(GifError::Inconsistent("graphic control block length is not 4"));
        }

        let flags = self.stream.get_u8_err()?;
        let delay_time = self.stream.get_u16_le_err()?;
        let transparent_index = self.stream.get_u8_err()?;

        if self.stream.get_u8_err()? != 0 {
            return Err(GifError::Inconsistent("graphic control block not terminated"));
        }

        // an earlier control block that never found its image is
        // replaced here, matching readers in the wild
        self.pending_control = Some(GraphicControl {
            disposal: DisposalMethod::from_flags(flags),
            user_input: control_user_input(flags),
            has_transparency: control_has_transparency(flags),
            delay_time,
            transparent_index
        });

        Ok(())
    }

    /// Skip length prefixed sub-blocks up to the zero terminator.
    fn skip_sub_blocks(&mut self) -> Result<(), GifError> {
        loop {
            let size = usize::from(self.stream.get_u8_err()?);

            if size == 0 {
                return Ok(());
            }
            self.stream.get_as_ref(size)?;
        }
    }

    fn decode_sub_image(&mut self) -> Result<SubImage, GifError> {
        let left = usize::from(self.stream.get_u16_le_err()?);
        let top = usize::from(self.stream.get_u16_le_err()?);
        let width = usize::from(self.stream.get_u16_le_err()?);
        let height = usize::from(self.stream.get_u16_le_err()?);

        let flags = self.stream.get_u8_err()?;

        if descriptor_interlaced(flags) {
            return Err(GifError::NotSupported("interlaced sub-images"));
        }
        // the matrix pipeline composites nothing, every sub-image
        // must cover the full screen
        if width != self.screen.width || height != self.screen.height {
            return Err(GifError::NotSupported(
                "sub-image dimensions differ from the screen descriptor"
            ));
        }

        let descriptor = ImageDescriptor {
            left,
            top,
            width,
            height,
            has_local_table: has_color_table(flags),
            local_table_entries: if has_color_table(flags) {
                color_table_entries(flags)
            } else {
                0
            },
            sorted: descriptor_table_sorted(flags)
        };

        let local_table = if descriptor.has_local_table {
            Some(parse_color_table(&mut self.stream, descriptor.local_table_entries)?)
        } else {
            None
        };

        let min_code_size = self.stream.get_u8_err()?;

        // concatenate the data sub-blocks into one lzw buffer
        let mut compressed = Vec::new();

        loop {
            let size = usize::from(self.stream.get_u8_err()?);

            if size == 0 {
                break;
            }
            compressed.extend_from_slice(self.stream.get_as_ref(size)?);
        }

        let pixel_count = width
            .checked_mul(height)
            .ok_or(GifError::OverflowError("sub-image pixel count"))?;

        trace!(
            "Sub-image {}x{} at ({},{}), {} lzw bytes",
            width,
            height,
            left,
            top,
            compressed.len()
        );

        let indices = lzw::decode_index_stream(&compressed, min_code_size, pixel_count)?;

        let table = local_table
            .as_ref()
            .or(self.global_table.as_ref())
            .ok_or(GifError::MissingColorTable)?;

        let mut pixels = Vec::with_capacity(
            pixel_count
                .checked_mul(3)
                .ok_or(GifError::OverflowError("sub-image byte count"))?
        );

        for index in &indices {
            let entry = table
                .get(usize::from(*index))
                .ok_or_else(|| GifError::ColorIndexOutOfBounds(usize::from(*index), table.len()))?;

            pixels.extend_from_slice(entry);
        }

        Ok(SubImage {
            descriptor,
            local_table,
            graphic_control: self.pending_control.take(),
            indices,
            pixels
        })
    }
}

/// Decode a gif held in `data` with default options.
pub fn decode_gif(data: &[u8]) -> Result<GifImage, GifError> {
    let mut decoder = GifDecoder::new(data);
    decoder.decode()
}

fn parse_color_table(
    stream: &mut ByteReader, num_entries: usize
) -> Result<Vec<[u8; 3]>, GifError> {
    if !stream.has(num_entries * 3) {
        return Err(GifError::Inconsistent("not enough bytes for a color table"));
    }

    let mut entries = Vec::with_capacity(num_entries);

    for _ in 0..num_entries {
        // bounds guaranteed by the check above
        let r = stream.get_u8();
        let g = stream.get_u8();
        let b = stream.get_u8();

        entries.push([r, g, b]);
    }

    Ok(entries)
}

fn test_gif(buffer: &mut ByteReader) -> bool {
    if buffer.get_u8() != b'G'
        || buffer.get_u8() != b'I'
        || buffer.get_u8() != b'F'
        || buffer.get_u8() != b'8'
    {
        return false;
    }
    let sz = buffer.get_u8();
    if sz != b'9' && sz != b'7' {
        return false;
    }
    if buffer.get_u8() != b'a' {
        return false;
    }
    true
}
