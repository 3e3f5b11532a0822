/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Crc32 as the png spec defines it, reflected with the
//! polynomial 0xEDB88320, one table lookup per byte.

static CRC32_TABLE: [u32; 256] = make_crc32_table();

const fn make_crc32_table() -> [u32; 256] {
    let mut table = [0_u32; 256];
    let mut i = 0;

    while i < 256 {
        let mut value = i as u32;
        let mut k = 0;

        while k < 8 {
            value = if value & 1 != 0 {
                0xEDB8_8320 ^ (value >> 1)
            } else {
                value >> 1
            };
            k += 1;
        }
        table[i] = value;
        i += 1;
    }
    table
}

/// Fold `data` into a running crc.
///
/// Start with `u32::MAX` and invert the final value, or use
/// [`crc32`] when the input is a single slice.
pub(crate) fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    let mut crc = crc;

    for byte in data {
        let index = ((crc ^ u32::from(*byte)) & 0xFF) as usize;

        crc = CRC32_TABLE[index] ^ (crc >> 8);
    }
    crc
}

/// Crc of a whole slice.
pub(crate) fn crc32(data: &[u8]) -> u32 {
    !crc32_update(u32::MAX, data)
}
