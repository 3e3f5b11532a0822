use log::{info, trace};

use crate::decoder::{PngChunk, PngDecoder};
use crate::enums::PngColor;
use crate::error::PngError;

impl<'a> PngDecoder<'a> {
    pub(crate) fn parse_ihdr(&mut self, chunk: PngChunk) -> Result<(), PngError> {
        if self.seen_hdr {
            return Err(PngError::Inconsistent("multiple IHDR chunks"));
        }
        if chunk.length != 13 {
            return Err(PngError::Inconsistent("IHDR length is not 13"));
        }

        let pos_start = self.stream.position();

        self.png_info.width = self.stream.get_u32_be() as usize;
        self.png_info.height = self.stream.get_u32_be() as usize;

        if self.png_info.width == 0 || self.png_info.height == 0 {
            return Err(PngError::Inconsistent("width or height is zero"));
        }
        if self.png_info.width > self.options.get_max_width() {
            return Err(PngError::TooLargeDimensions(
                "width",
                self.options.get_max_width(),
                self.png_info.width
            ));
        }
        if self.png_info.height > self.options.get_max_height() {
            return Err(PngError::TooLargeDimensions(
                "height",
                self.options.get_max_height(),
                self.png_info.height
            ));
        }

        self.png_info.depth = self.stream.get_u8();

        if self.png_info.depth != 8 {
            return Err(PngError::NotSupported("bit depths other than 8"));
        }

        let color = self.stream.get_u8();

        match PngColor::from_int(color) {
            Some(img_color) => self.png_info.color = img_color,
            None => return Err(PngError::NotSupported("color types other than rgb and rgba"))
        }
        self.png_info.component = self.png_info.color.num_components();

        if self.stream.get_u8() != 0 {
            return Err(PngError::Inconsistent("unknown compression method"));
        }
        if self.stream.get_u8() != 0 {
            return Err(PngError::Inconsistent("unknown filter method"));
        }

        match self.stream.get_u8() {
            0 => (),
            1 => return Err(PngError::NotSupported("adam7 interlaced images")),
            _ => return Err(PngError::Inconsistent("unknown interlace method"))
        }

        let pos_end = self.stream.position();

        assert_eq!(pos_end - pos_start, 13); // we read all bytes

        // skip crc
        self.stream.skip(4);

        info!("Width: {}", self.png_info.width);
        info!("Height: {}", self.png_info.height);
        info!("Color type: {:?}", self.png_info.color);
        info!("Depth: {:?}", self.png_info.depth);

        self.seen_hdr = true;

        Ok(())
    }

    /// Take one idat chunk and inflate it on its own.
    ///
    /// The whole zlib stream must live inside a single chunk; when
    /// several idat chunks appear the last one that inflates cleanly
    /// wins. See the note on [`PngDecoder::decode`].
    pub(crate) fn parse_idat(&mut self, chunk: PngChunk) -> Result<(), PngError> {
        let idat_stream = self.stream.get_as_ref(chunk.length)?;

        trace!("IDAT chunk, {} compressed bytes", chunk.length);

        let inflated = self.inflate(idat_stream)?;

        self.inflated = Some(inflated);

        // skip crc
        self.stream.skip(4);

        Ok(())
    }
}
