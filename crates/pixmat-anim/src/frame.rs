/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A single animation frame
//!
//! One or more frames make an animation, each frame owns the pixels
//! it shows and knows how long it stays on the matrix.

use alloc::vec::Vec;

/// A single animation frame.
///
/// Carries the resolved pixels of one gif sub-image together with
/// the timing and placement metadata the display driver keys off.
#[derive(Clone, Eq, PartialEq)]
pub struct Frame {
    /// How long the frame stays on screen, in milliseconds.
    pub delay_ms: u32,
    /// Offset of the frame from the left of the screen.
    pub x:        usize,
    /// Offset of the frame from the top of the screen.
    pub y:        usize,
    /// Interleaved RGB pixels, 3 bytes per pixel.
    pub pixels:   Vec<u8>
}

impl Frame {
    /// Create a new frame shown at `(x, y)` for `delay_ms`
    /// milliseconds.
    pub fn new(delay_ms: u32, x: usize, y: usize, pixels: Vec<u8>) -> Frame {
        Frame {
            delay_ms,
            x,
            y,
            pixels
        }
    }
}
