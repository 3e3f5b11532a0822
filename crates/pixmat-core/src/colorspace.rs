/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Layouts of decoded pixel buffers
#![allow(clippy::upper_case_acronyms)]

/// The colorspace of a decoded buffer.
///
/// The matrix pipeline only ever produces interleaved 8 bit
/// truecolor, with or without an alpha channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace {
    RGB,
    RGBA
}

impl ColorSpace {
    /// Number of bytes one pixel occupies in this colorspace.
    pub const fn num_components(self) -> usize {
        match self {
            ColorSpace::RGB => 3,
            ColorSpace::RGBA => 4
        }
    }

    /// Return true if the colorspace carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, ColorSpace::RGBA)
    }
}
