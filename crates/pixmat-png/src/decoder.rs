/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use log::trace;
use pixmat_core::bytestream::ByteReader;
use pixmat_core::colorspace::ColorSpace;
use pixmat_core::options::DecoderOptions;
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::crc::crc32;
use crate::enums::{FilterMethod, PngChunkType, PngColor};
use crate::error::PngError;
use crate::filters::{
    handle_avg, handle_avg_first, handle_paeth, handle_paeth_first, handle_sub, handle_up
};

/// The 8 byte png signature read as one big endian integer.
pub(crate) const PNG_SIGNATURE: u64 = 0x8950_4E47_0D0A_1A0A;

#[derive(Copy, Clone)]
pub(crate) struct PngChunk {
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4]
}

/// Properties declared by the ihdr chunk.
#[derive(Default, Debug, Copy, Clone)]
pub struct PngInfo {
    pub width:     usize,
    pub height:    usize,
    pub depth:     u8,
    pub color:     PngColor,
    pub component: u8
}

/// A fully decoded png.
#[derive(Debug)]
pub struct PngImage {
    pub width:      usize,
    pub height:     usize,
    pub colorspace: ColorSpace,
    /// Unfiltered image bytes, `width * height` pixels of
    /// 3 or 4 bytes each depending on the colorspace.
    pub pixels:     Vec<u8>
}

impl PngImage {
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// A png decoder over borrowed input.
///
/// Only the still-image subset a pixel matrix needs: 8 bit rgb and
/// rgba, no interlacing, no palette expansion. Chunk crcs are always
/// confirmed.
///
/// The zlib payload of each idat chunk is inflated on its own, so
/// streams that split one zlib stream across several idat chunks are
/// rejected at the inflate stage.
///
/// ```no_run
/// use pixmat_png::PngDecoder;
///
/// let data = std::fs::read("image.png").unwrap();
/// let mut decoder = PngDecoder::new(&data);
/// let image = decoder.decode().unwrap();
/// ```
pub struct PngDecoder<'a> {
    pub(crate) stream:   ByteReader<'a>,
    pub(crate) options:  DecoderOptions,
    pub(crate) png_info: PngInfo,
    pub(crate) inflated: Option<Vec<u8>>,
    pub(crate) out:      Vec<u8>,
    pub(crate) seen_hdr: bool,
    pub(crate) decoded:  bool
}

impl<'a> PngDecoder<'a> {
    pub fn new(data: &'a [u8]) -> PngDecoder<'a> {
        PngDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a> {
        PngDecoder {
            stream: ByteReader::new(data),
            options,
            png_info: PngInfo::default(),
            inflated: None,
            out: Vec::new(),
            seen_hdr: false,
            decoded: false
        }
    }

    /// Width and height from the ihdr, present once it has
    /// been parsed.
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if !self.seen_hdr {
            return None;
        }

        Some((self.png_info.width, self.png_info.height))
    }

    /// Colorspace of the decoded pixels, present once the ihdr has
    /// been parsed.
    pub fn get_colorspace(&self) -> Option<ColorSpace> {
        if !self.seen_hdr {
            return None;
        }
        match self.png_info.color {
            PngColor::RGB => Some(ColorSpace::RGB),
            PngColor::RGBA => Some(ColorSpace::RGBA),
            PngColor::Unknown => unreachable!()
        }
    }

    fn read_chunk_header(&mut self) -> Result<PngChunk, PngError> {
        // Format is length - chunk type - [data] - crc, peek the crc
        // now so short chunks fail before anything is interpreted
        let chunk_length = self.stream.get_u32_be_err()? as usize;
        let chunk_type_int = self.stream.get_u32_be_err()?.to_be_bytes();

        let mut crc_bytes = [0; 4];

        let crc_ref = self.stream.peek_at(chunk_length, 4)?;

        crc_bytes.copy_from_slice(crc_ref);

        let crc = u32::from_be_bytes(crc_bytes);

        let chunk_type = match &chunk_type_int {
            b"IHDR" => PngChunkType::IHDR,
            b"IDAT" => PngChunkType::IDAT,
            b"IEND" => PngChunkType::IEND,
            _ => PngChunkType::unkn
        };

        // the crc covers the chunk type and the chunk data
        self.stream.rewind(4);

        let crc_stream = self.stream.peek_at(0, chunk_length + 4)?;
        let calculated = crc32(crc_stream);

        self.stream.skip(4);

        if crc != calculated {
            return Err(PngError::BadCrc(crc, calculated));
        }

        Ok(PngChunk {
            length: chunk_length,
            chunk: chunk_type_int,
            chunk_type
        })
    }

    /// Decode the whole stream.
    ///
    /// Walks the chunk stream up to the iend chunk, confirming every
    /// chunk crc on the way, then unfilters the inflated scanlines
    /// into a raw pixel buffer.
    pub fn decode(&mut self) -> Result<PngImage, PngError> {
        if self.decoded {
            return Err(PngError::AlreadyDecoded);
        }

        let signature = self.stream.get_u64_be_err()?;

        if signature != PNG_SIGNATURE {
            return Err(PngError::BadSignature);
        }

        if self.stream.peek_at(4, 4)? != b"IHDR" {
            return Err(PngError::Inconsistent("first chunk is not IHDR"));
        }

        loop {
            let header = self.read_chunk_header()?;

            match header.chunk_type {
                PngChunkType::IHDR => self.parse_ihdr(header)?,
                PngChunkType::IDAT => self.parse_idat(header)?,
                PngChunkType::IEND => {
                    if header.length != 0 {
                        return Err(PngError::Inconsistent("IEND chunk with a non zero length"));
                    }
                    break;
                }
                PngChunkType::unkn => {
                    // crc already confirmed, contents are not ours
                    let name = core::str::from_utf8(&header.chunk).unwrap_or("????");

                    trace!("Skipping unknown chunk {name}, {} data bytes", header.length);

                    self.stream.skip(header.length + 4);
                }
            }
        }

        let inflated = match self.inflated.take() {
            Some(data) => data,
            None => return Err(PngError::Inconsistent("no IDAT chunk before IEND"))
        };

        let info = self.png_info;
        let image_len = info.width * info.height * usize::from(info.component);

        self.out = vec![0; image_len];

        self.create_png_image_raw(&inflated)?;

        self.decoded = true;

        let colorspace = match info.color {
            PngColor::RGB => ColorSpace::RGB,
            PngColor::RGBA => ColorSpace::RGBA,
            PngColor::Unknown => unreachable!()
        };

        Ok(PngImage {
            width: info.width,
            height: info.height,
            colorspace,
            pixels: core::mem::take(&mut self.out)
        })
    }

    /// Un-filter the inflated scanlines into `self.out`.
    ///
    /// `self.out` is sized by the caller, the inflated length was
    /// checked when the idat chunk was parsed.
    fn create_png_image_raw(&mut self, deflate_data: &[u8]) -> Result<(), PngError> {
        let info = &self.png_info;
        let components = usize::from(info.component);

        let width_stride = info.width * components;
        // a scanline is the filter byte plus a full row
        let chunk_size = width_stride + 1;
        let image_len = width_stride * info.height;

        let out = &mut self.out[0..image_len];

        let chunks = deflate_data.chunks_exact(chunk_size);

        let mut prev_row_start = 0;
        let mut first_row = true;
        let mut out_position = 0;

        for in_stride in chunks.take(info.height) {
            // split output into the rows already unfiltered and the
            // row we are writing to
            let (prev, current) = out.split_at_mut(out_position);

            let mut prev_row: &[u8] = &[0_u8];

            if !first_row {
                prev_row = &prev[prev_row_start..prev_row_start + width_stride];
                prev_row_start += width_stride;
            }

            out_position += width_stride;

            let filter_byte = in_stride[0];
            let raw = &in_stride[1..];

            let mut filter = FilterMethod::from_int(filter_byte)
                .ok_or(PngError::Inconsistent("unknown filter type in a scanline"))?;

            if first_row {
                // the first row has no row above it, map to variants
                // that treat the previous row as zero

                if filter == FilterMethod::Paeth {
                    filter = FilterMethod::PaethFirst;
                }
                if filter == FilterMethod::Up {
                    // up on the first row is a memcpy
                    filter = FilterMethod::None;
                }
                if filter == FilterMethod::Average {
                    filter = FilterMethod::AvgFirst;
                }

                first_row = false;
            }

            match filter {
                FilterMethod::None => current[0..width_stride].copy_from_slice(raw),

                FilterMethod::Sub => handle_sub(raw, current, components),

                FilterMethod::Up => handle_up(prev_row, raw, current),

                FilterMethod::Average => handle_avg(prev_row, raw, current, components),

                FilterMethod::Paeth => handle_paeth(prev_row, raw, current, components),

                FilterMethod::PaethFirst => handle_paeth_first(raw, current, components),

                FilterMethod::AvgFirst => handle_avg_first(raw, current, components),

                FilterMethod::Unknown => unreachable!()
            }
        }

        Ok(())
    }

    /// Inflate one idat payload, demanding the exact unfiltered
    /// image size.
    pub(crate) fn inflate(&self, data: &[u8]) -> Result<Vec<u8>, PngError> {
        let expected = self.expected_inflated_len()?;

        // small slack on the limit so an overlong stream surfaces as
        // a size mismatch with both lengths in the error
        let options = DeflateOptions::default()
            .set_size_hint(expected)
            .set_confirm_checksum(true)
            .set_limit(expected + 64);

        let mut decoder = DeflateDecoder::new_with_options(data, options);

        let inflated = decoder.decode_zlib().map_err(PngError::ZlibDecodeErrors)?;

        if inflated.len() != expected {
            return Err(PngError::WrongInflatedSize(expected, inflated.len()));
        }

        Ok(inflated)
    }

    /// Unfiltered stream size: every scanline is one filter byte
    /// followed by a full pixel row.
    fn expected_inflated_len(&self) -> Result<usize, PngError> {
        let info = &self.png_info;

        info.width
            .checked_mul(usize::from(info.component))
            .and_then(|stride| stride.checked_add(1))
            .and_then(|scanline| scanline.checked_mul(info.height))
            .ok_or(PngError::OverflowError("unfiltered image size"))
    }
}

/// Decode a png held in `data` with default options.
pub fn decode_png(data: &[u8]) -> Result<PngImage, PngError> {
    let mut decoder = PngDecoder::new(data);
    decoder.decode()
}
