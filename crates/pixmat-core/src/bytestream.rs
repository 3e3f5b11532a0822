/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A bytestream reader over borrowed input
//!
//! Decoders in this family consume caller-owned byte slices top to
//! bottom, so the reader is a plain cursor over `&[u8]` with endian
//! aware reads. Reads past the end never panic, they either return a
//! default value or a [`ByteIoError`] depending on the method family
//! used (`get_*` vs `get_*_err`).

use core::fmt::{Debug, Formatter};

/// Errors raised by [`ByteReader`] when the underlying
/// buffer cannot satisfy a read.
pub enum ByteIoError {
    /// Requested more bytes than the buffer has.
    ///
    /// Fields are requested bytes and available bytes.
    NotEnoughBytes(usize, usize),
    /// Any other error.
    Generic(&'static str)
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteIoError::NotEnoughBytes(requested, found) => {
                writeln!(f, "requested {requested} bytes but stream has {found}")
            }
            ByteIoError::Generic(reason) => {
                writeln!(f, "{reason}")
            }
        }
    }
}

/// A reader that keeps a cursor into a borrowed byte slice
/// and advances it on every read.
pub struct ByteReader<'a> {
    buffer:   &'a [u8],
    position: usize
}

enum Mode {
    // Big endian
    BE,
    // Little endian
    LE
}

impl<'a> ByteReader<'a> {
    /// Create a new reader starting at the beginning of `buffer`.
    pub const fn new(buffer: &'a [u8]) -> ByteReader<'a> {
        ByteReader { buffer, position: 0 }
    }

    /// Length of the whole underlying buffer.
    pub const fn len(&self) -> usize {
        self.buffer.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current cursor position measured from the start of the buffer.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes between the cursor and the end of the buffer.
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Return true if there are at least `num_bytes` left to read.
    pub const fn has(&self, num_bytes: usize) -> bool {
        self.position.saturating_add(num_bytes) <= self.buffer.len()
    }

    /// Return true if the cursor reached the end of the buffer.
    pub const fn eof(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Move the cursor `num_bytes` forward, saturating at the
    /// end of the buffer.
    pub fn skip(&mut self, num_bytes: usize) {
        self.position = self
            .position
            .saturating_add(num_bytes)
            .min(self.buffer.len());
    }

    /// Move the cursor `num_bytes` back, saturating at the start.
    pub fn rewind(&mut self, num_bytes: usize) {
        self.position = self.position.saturating_sub(num_bytes);
    }

    /// Set the cursor to an absolute position, clamped to the
    /// buffer length.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.buffer.len());
    }

    /// Read a single byte, returning zero past the end of the buffer.
    pub fn get_u8(&mut self) -> u8 {
        match self.buffer.get(self.position) {
            Some(byte) => {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }

    /// Read a single byte, erroring past the end of the buffer.
    pub fn get_u8_err(&mut self) -> Result<u8, ByteIoError> {
        match self.buffer.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(ByteIoError::NotEnoughBytes(1, 0))
        }
    }

    /// Read `N` bytes into a fixed size array.
    pub fn get_fixed_bytes_or_err<const N: usize>(&mut self) -> Result<[u8; N], ByteIoError> {
        let mut bytes = [0; N];

        match self.buffer.get(self.position..self.position + N) {
            Some(reference) => {
                bytes.copy_from_slice(reference);
                self.position += N;
                Ok(bytes)
            }
            None => Err(ByteIoError::NotEnoughBytes(N, self.remaining()))
        }
    }

    /// Borrow `num_bytes` from the current position and advance
    /// the cursor past them.
    ///
    /// The returned slice lives as long as the input buffer, not the
    /// reader, so callers can hold onto it across later reads.
    pub fn get_as_ref(&mut self, num_bytes: usize) -> Result<&'a [u8], ByteIoError> {
        match self
            .buffer
            .get(self.position..self.position.wrapping_add(num_bytes))
        {
            Some(reference) => {
                self.position += num_bytes;
                Ok(reference)
            }
            None => Err(ByteIoError::NotEnoughBytes(num_bytes, self.remaining()))
        }
    }

    /// Borrow `num_bytes` starting `position` bytes ahead of the
    /// cursor without moving the cursor.
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], ByteIoError> {
        let start = self.position.wrapping_add(position);
        let end = start.wrapping_add(num_bytes);

        match self.buffer.get(start..end) {
            Some(reference) => Ok(reference),
            None => Err(ByteIoError::NotEnoughBytes(num_bytes, self.remaining()))
        }
    }
}

macro_rules! get_single_type {
    ($name:tt,$name2:tt,$name3:tt,$name4:tt,$name5:tt,$name6:tt,$int_type:tt) => {
        impl<'a> ByteReader<'a> {
            #[inline(always)]
            fn $name(&mut self, mode: Mode) -> $int_type {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                match self.buffer.get(self.position..self.position + SIZE_OF_VAL) {
                    Some(position) => {
                        space.copy_from_slice(position);
                        self.position += SIZE_OF_VAL;

                        match mode {
                            Mode::LE => $int_type::from_le_bytes(space),
                            Mode::BE => $int_type::from_be_bytes(space)
                        }
                    }
                    None => 0
                }
            }

            #[inline(always)]
            fn $name2(&mut self, mode: Mode) -> Result<$int_type, ByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                match self.buffer.get(self.position..self.position + SIZE_OF_VAL) {
                    Some(position) => {
                        space.copy_from_slice(position);
                        self.position += SIZE_OF_VAL;

                        match mode {
                            Mode::LE => Ok($int_type::from_le_bytes(space)),
                            Mode::BE => Ok($int_type::from_be_bytes(space))
                        }
                    }
                    None => Err(ByteIoError::NotEnoughBytes(SIZE_OF_VAL, self.remaining()))
                }
            }

            pub fn $name3(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name2(Mode::BE)
            }

            pub fn $name4(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name2(Mode::LE)
            }

            pub fn $name5(&mut self) -> $int_type {
                self.$name(Mode::BE)
            }

            pub fn $name6(&mut self) -> $int_type {
                self.$name(Mode::LE)
            }
        }
    };
}

get_single_type!(
    get_u16_inner_or_default,
    get_u16_inner_or_die,
    get_u16_be_err,
    get_u16_le_err,
    get_u16_be,
    get_u16_le,
    u16
);
get_single_type!(
    get_u32_inner_or_default,
    get_u32_inner_or_die,
    get_u32_be_err,
    get_u32_le_err,
    get_u32_be,
    get_u32_le,
    u32
);
get_single_type!(
    get_u64_inner_or_default,
    get_u64_inner_or_die,
    get_u64_be_err,
    get_u64_le_err,
    get_u64_be,
    get_u64_le,
    u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endian_reads() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.get_u16_be_err().unwrap(), 0x0102);
        assert_eq!(reader.get_u16_le_err().unwrap(), 0x0403);
        assert!(reader.eof());
    }

    #[test]
    fn silent_reads_return_zero_past_end() {
        let data = [0xFF];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.get_u8(), 0xFF);
        assert_eq!(reader.get_u8(), 0);
        assert_eq!(reader.get_u32_be(), 0);
    }

    #[test]
    fn err_reads_do_not_advance_past_end() {
        let data = [0x01, 0x02];
        let mut reader = ByteReader::new(&data);

        assert!(reader.get_u32_be_err().is_err());
        // position untouched by the failed read
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.get_u16_be_err().unwrap(), 0x0102);
    }

    #[test]
    fn peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let reader = ByteReader::new(&data);

        assert_eq!(reader.peek_at(1, 3).unwrap(), &[0x02, 0x03, 0x04]);
        assert_eq!(reader.position(), 0);
        assert!(reader.peek_at(4, 2).is_err());
    }

    #[test]
    fn skip_and_rewind_clamp() {
        let data = [0u8; 4];
        let mut reader = ByteReader::new(&data);

        reader.skip(100);
        assert_eq!(reader.position(), 4);
        reader.rewind(100);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn get_as_ref_borrows_from_input() {
        let data = [1u8, 2, 3, 4];
        let slice;
        {
            let mut reader = ByteReader::new(&data);
            reader.skip(1);
            slice = reader.get_as_ref(2).unwrap();
        }
        // outlives the reader
        assert_eq!(slice, &[2, 3]);
    }
}
