/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use log::{trace, warn};
use pixmat_core::colorspace::ColorSpace;
use pixmat_gif::GifImage;

use crate::frame::Frame;

/// An ordered list of frames with a playback cursor.
///
/// Built once per display update from a decoded gif document. The
/// driver blits [`current`](Animation::current), waits out the frame
/// delay on its own clock and calls [`advance`](Animation::advance),
/// which wraps back to the first frame after the last. Nothing in
/// here keeps time.
pub struct Animation {
    width:       usize,
    height:      usize,
    frames:      Vec<Frame>,
    frame_index: usize
}

impl Animation {
    /// Assemble an animation from a decoded gif document.
    ///
    /// Sub-images are taken in stream order and their pixel buffers
    /// are moved into the frames, never copied. A sub-image without a
    /// graphic control block carries no timing information and is
    /// skipped with a warning.
    pub fn from_gif(image: GifImage) -> Animation {
        let (width, height) = image.dimensions();
        let declared = image.sub_images.len();

        let mut frames = Vec::with_capacity(declared);

        for sub_image in image.sub_images {
            let control = match sub_image.graphic_control {
                Some(control) => control,
                None => {
                    warn!("Sub-image without a graphic control block, skipping it");
                    continue;
                }
            };

            frames.push(Frame {
                delay_ms: control.delay_ms(),
                x:        sub_image.descriptor.left,
                y:        sub_image.descriptor.top,
                pixels:   sub_image.pixels
            });
        }
        trace!("Assembled {} frames from {} sub-images", frames.len(), declared);

        Animation {
            width,
            height,
            frames,
            frame_index: 0
        }
    }

    /// Width and height of the logical screen the frames sit on.
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The colorspace of every frame buffer.
    pub const fn colorspace(&self) -> ColorSpace {
        ColorSpace::RGB
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames that carried timing information.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Position of the playback cursor.
    pub const fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// The frame under the cursor, `None` when there are no frames.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.get(self.frame_index)
    }

    /// Move the cursor one frame forward, wrapping after the last.
    pub fn advance(&mut self) {
        self.frame_index += 1;

        if self.frame_index >= self.frames.len() {
            self.frame_index = 0;
        }
    }
}
