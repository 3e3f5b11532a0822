/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use pixmat_core::bytestream::ByteIoError;
use pixmat_core::options::EncoderOptions;

use crate::crc::crc32_update;
use crate::decoder::PNG_SIGNATURE;
use crate::enums::FilterMethod;
use crate::error::PngError;
use crate::filters::filter_scanline;

/// Encode raw 8 bit pixels into a png stream.
///
/// The zlib payload is written as stored blocks, trading size for
/// having no compressor dependency, and goes into a single idat
/// chunk. Mostly useful for golden files and round trip tests.
pub struct PngEncoder<'a> {
    options:    EncoderOptions,
    data:       &'a [u8],
    row_filter: FilterMethod
}

impl<'a> PngEncoder<'a> {
    pub fn new(data: &'a [u8], options: EncoderOptions) -> PngEncoder<'a> {
        PngEncoder {
            options,
            data,
            row_filter: FilterMethod::None
        }
    }

    /// Filter every scanline with `filter` before compression.
    ///
    /// Must be one of the five filters the format defines, the
    /// first-scanline variants are chosen by the decoder, not
    /// stored in the stream.
    pub fn set_filter(&mut self, filter: FilterMethod) {
        self.row_filter = filter;
    }

    pub fn encode(&self) -> Result<Vec<u8>, PngError> {
        if !matches!(
            self.row_filter,
            FilterMethod::None
                | FilterMethod::Sub
                | FilterMethod::Up
                | FilterMethod::Average
                | FilterMethod::Paeth
        ) {
            return Err(PngError::Inconsistent("not an encodable filter"));
        }

        let components = self.options.colorspace().num_components();

        let expected_data_size = self
            .options
            .width()
            .checked_mul(self.options.height())
            .and_then(|px| px.checked_mul(components))
            .ok_or(PngError::OverflowError("image size"))?;

        if self.data.len() != expected_data_size {
            return Err(PngError::IoErrors(ByteIoError::NotEnoughBytes(
                expected_data_size,
                self.data.len()
            )));
        }

        let mut out = Vec::with_capacity(expected_data_size + 128);

        out.extend_from_slice(&PNG_SIGNATURE.to_be_bytes());

        self.write_ihdr(&mut out);

        let filtered = self.filter_scanlines();

        write_chunk(b"IDAT", &zlib_store(&filtered), &mut out);
        write_chunk(b"IEND", &[], &mut out);

        Ok(out)
    }

    fn write_ihdr(&self, out: &mut Vec<u8>) {
        let mut ihdr = [0_u8; 13];

        ihdr[0..4].copy_from_slice(&(self.options.width() as u32).to_be_bytes());
        ihdr[4..8].copy_from_slice(&(self.options.height() as u32).to_be_bytes());
        // depth 8, then the color type int
        ihdr[8] = 8;
        ihdr[9] = if self.options.colorspace().has_alpha() {
            6
        } else {
            2
        };
        // compression, filter and interlace methods are all zero

        write_chunk(b"IHDR", &ihdr, out);
    }

    fn filter_scanlines(&self) -> Vec<u8> {
        let components = self.options.colorspace().num_components();
        let scanline_size = self.options.width() * components;

        let mut filtered = vec![0_u8; (scanline_size + 1) * self.options.height()];

        let mut previous_scanline: &[u8] = &[];

        for (row, filter_s) in filtered
            .chunks_exact_mut(scanline_size + 1)
            .take(self.options.height())
            .enumerate()
        {
            let current_scanline = &self.data[row * scanline_size..(row + 1) * scanline_size];

            filter_scanline(
                current_scanline,
                previous_scanline,
                filter_s,
                self.row_filter,
                components
            );

            previous_scanline = current_scanline;
        }
        filtered
    }
}

/// Frame `data` as one chunk: length, type, data, crc.
fn write_chunk(chunk: &[u8; 4], data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk);
    out.extend_from_slice(data);

    let crc = !crc32_update(crc32_update(u32::MAX, chunk), data);

    out.extend_from_slice(&crc.to_be_bytes());
}

/// Wrap `data` in a zlib stream of stored deflate blocks.
fn zlib_store(data: &[u8]) -> Vec<u8> {
    // 32k window, check bits make the header a multiple of 31
    let mut out = vec![0x78, 0x01];

    if data.is_empty() {
        // a single final stored block of length zero
        out.extend_from_slice(&[0x01, 0x00, 0x00, 0xFF, 0xFF]);
    } else {
        let last = (data.len() - 1) / 65_535;

        for (i, block) in data.chunks(65_535).enumerate() {
            let len = block.len() as u16;

            // stored blocks start byte aligned, so the three header
            // bits fit in one byte: final flag and type 00
            out.push(u8::from(i == last));
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&(!len).to_le_bytes());
            out.extend_from_slice(block);
        }
    }

    out.extend_from_slice(&adler32(data).to_be_bytes());
    out
}

fn adler32(data: &[u8]) -> u32 {
    const MODULUS: u32 = 65_521;

    let mut a: u32 = 1;
    let mut b: u32 = 0;

    for byte in data {
        a = (a + u32::from(*byte)) % MODULUS;
        b = (b + a) % MODULUS;
    }
    (b << 16) | a
}
