/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! LZW decoding for gif image data
//!
//! Gif compresses each sub-image with a variable width LZW scheme:
//! codes are pulled least significant bit first from the concatenated
//! data sub-blocks, the dictionary starts with one root string per
//! color index plus the clear and end-of-information codes, and grows
//! one entry per decoded code until a clear code resets it.
//!
//! The decoder here is strict. The first code must be a clear code,
//! a code may never skip ahead of the next free dictionary slot, and
//! the decoded index stream must match the sub-image pixel count
//! exactly.

use alloc::vec::Vec;

use crate::errors::GifError;

/// Widest code the bit reader can assemble from its 32 bit window.
///
/// A consistent stream needs 2^24 dictionary entries to get here,
/// several orders of magnitude past any real sub-image.
const MAX_CODE_WIDTH: usize = 24;

/// A bit cursor over the concatenated lzw data, least significant
/// bit first as the gif format stores codes.
struct BitReader<'a> {
    data:       &'a [u8],
    bit_cursor: usize
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader { data, bit_cursor: 0 }
    }

    /// Pull the next code of `width` bits.
    fn read_code(&mut self, width: usize) -> Result<usize, GifError> {
        if width > MAX_CODE_WIDTH {
            return Err(GifError::Inconsistent("lzw code width exceeds reader window"));
        }
        if self.bit_cursor + width > self.data.len() * 8 {
            return Err(GifError::Inconsistent("lzw data ended inside a code"));
        }

        let byte_pos = self.bit_cursor >> 3;
        let bit_pos = self.bit_cursor & 7;

        // load up to four bytes little endian, the shift below then
        // leaves at least 25 valid bits
        let mut window: u32 = 0;

        for (i, byte) in self.data[byte_pos..].iter().take(4).enumerate() {
            window |= u32::from(*byte) << (i * 8);
        }

        let code = (window >> bit_pos) & ((1 << width) - 1);

        self.bit_cursor += width;

        Ok(code as usize)
    }
}

/// The growing code dictionary.
///
/// Entries own their byte strings. The clear and end-of-information
/// slots hold empty placeholders, they are intercepted before any
/// lookup so the strings are never read.
struct CodeTable {
    entries:       Vec<Vec<u8>>,
    min_code_size: usize,
    /// current read width in bits
    width:         usize,
    clear:         usize,
    eoi:           usize
}

impl CodeTable {
    fn new(min_code_size: usize) -> CodeTable {
        let roots = 1 << min_code_size;

        let mut table = CodeTable {
            entries: Vec::with_capacity(roots + 2),
            min_code_size,
            width: min_code_size + 1,
            clear: roots,
            eoi: roots + 1
        };
        table.reset();
        table
    }

    /// Drop every entry made since the last reset and restore the
    /// starting code width.
    fn reset(&mut self) {
        self.entries.clear();

        for root in 0..(1 << self.min_code_size) {
            self.entries.push(vec![root as u8]);
        }
        // clear and end-of-information placeholders
        self.entries.push(Vec::new());
        self.entries.push(Vec::new());

        self.width = self.min_code_size + 1;
    }

    /// Next code value the dictionary would assign.
    fn next_code(&self) -> usize {
        self.entries.len()
    }

    /// Append one entry, widening the read width when the entry
    /// count reaches `2^width` so the next code to be assigned
    /// still fits.
    fn push_entry(&mut self, entry: Vec<u8>) {
        self.entries.push(entry);

        if self.entries.len() == (1 << self.width) {
            self.width += 1;
        }
    }
}

/// Decode `data` into exactly `expected_len` color table indices.
///
/// `data` is the concatenation of a sub-image's data sub-blocks,
/// `min_code_size` the byte preceding them.
pub(crate) fn decode_index_stream(
    data: &[u8], min_code_size: u8, expected_len: usize
) -> Result<Vec<u8>, GifError> {
    // roots are color table indices, one byte each, which also caps
    // the minimum code size at 8
    if !(2..=8).contains(&min_code_size) {
        return Err(GifError::Inconsistent("lzw minimum code size out of range"));
    }

    let mut table = CodeTable::new(usize::from(min_code_size));
    let mut reader = BitReader::new(data);
    let mut out = Vec::with_capacity(expected_len);

    let first = reader.read_code(table.width)?;

    if first != table.clear {
        return Err(GifError::Inconsistent("lzw stream does not start with a clear code"));
    }

    // code whose string was last appended, None right after a reset
    let mut previous: Option<usize> = None;

    loop {
        let code = reader.read_code(table.width)?;

        if code == table.clear {
            table.reset();
            previous = None;
            continue;
        }
        if code == table.eoi {
            break;
        }

        match previous {
            None => {
                // only roots exist right after a reset
                if code >= table.next_code() {
                    return Err(GifError::Inconsistent("lzw code without a preceding string"));
                }
                out.extend_from_slice(&table.entries[code]);
            }
            Some(previous) => {
                if code < table.next_code() {
                    let first_byte = table.entries[code][0];

                    out.extend_from_slice(&table.entries[code]);

                    let mut entry = table.entries[previous].clone();
                    entry.push(first_byte);
                    table.push_entry(entry);
                } else if code == table.next_code() {
                    // the one code an encoder can emit before defining
                    // it, its string is the previous string plus that
                    // string's own first byte
                    let mut entry = table.entries[previous].clone();
                    let first_byte = entry[0];
                    entry.push(first_byte);

                    out.extend_from_slice(&entry);
                    table.push_entry(entry);
                } else {
                    return Err(GifError::Inconsistent("lzw code skips ahead of the dictionary"));
                }
            }
        }
        previous = Some(code);

        if out.len() > expected_len {
            return Err(GifError::Inconsistent("lzw output exceeds the sub-image pixel count"));
        }
    }

    if out.len() != expected_len {
        return Err(GifError::Inconsistent("lzw output does not match the sub-image pixel count"));
    }

    Ok(out)
}
