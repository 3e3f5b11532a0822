//! End to end decoder tests over synthesized gif streams.
//!
//! Fixtures are built in code, there is no binary corpus. The
//! reference `gif` crate decodes the same streams so the lzw output
//! can be compared byte for byte.

use pixmat_gif::{decode_gif, GifDecoder, GifError};

const PALETTE: [[u8; 3]; 4] = [[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];

/// Pack color indices as root codes, mirroring the width growth a
/// decoder performs so both sides read the same bit boundaries.
fn lzw_compress(indices: &[u8], min_code_size: u8) -> Vec<u8> {
    let min = usize::from(min_code_size);
    let clear = 1usize << min;
    let eoi = clear + 1;

    let mut bits: Vec<bool> = Vec::new();
    let mut width = min + 1;
    let mut count = clear + 2;

    let mut put = |code: usize, width: usize, bits: &mut Vec<bool>| {
        for bit in 0..width {
            bits.push((code >> bit) & 1 == 1);
        }
    };

    put(clear, width, &mut bits);

    for (i, index) in indices.iter().enumerate() {
        put(usize::from(*index), width, &mut bits);

        // every data code after the first one adds a table entry on
        // the decoder side, widening codes when the table fills up
        if i > 0 {
            count += 1;
            if count == 1 << width {
                width += 1;
            }
        }
    }

    put(eoi, width, &mut bits);

    let mut out = Vec::new();

    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (pos, bit) in chunk.iter().enumerate() {
            byte |= u8::from(*bit) << pos;
        }
        out.push(byte);
    }
    out
}

fn screen(width: u16, height: u16, table: Option<&[[u8; 3]]>) -> Vec<u8> {
    let mut out = b"GIF89a".to_vec();

    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());

    match table {
        Some(entries) => {
            let exp = entries.len().ilog2() as u8 - 1;
            out.push(0x80 | exp);
            out.push(0); // background index
            out.push(0); // aspect ratio
            for entry in entries {
                out.extend_from_slice(entry);
            }
        }
        None => out.extend_from_slice(&[0, 0, 0])
    }
    out
}

fn graphic_control(delay: u16) -> Vec<u8> {
    let mut out = vec![0x21, 0xF9, 0x04, 0x00];
    out.extend_from_slice(&delay.to_le_bytes());
    out.extend_from_slice(&[0x00, 0x00]);
    out
}

fn image(
    width: u16, height: u16, extra_flags: u8, local: Option<&[[u8; 3]]>, indices: &[u8]
) -> Vec<u8> {
    let mut out = vec![0x2C];

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());

    match local {
        Some(entries) => {
            let exp = entries.len().ilog2() as u8 - 1;
            out.push(0x80 | exp | extra_flags);
            for entry in entries {
                out.extend_from_slice(entry);
            }
        }
        None => out.push(extra_flags)
    }

    out.push(2); // minimum code size
    for chunk in lzw_compress(indices, 2).chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

fn single_frame_gif(indices: &[u8], width: u16, height: u16) -> Vec<u8> {
    let mut out = screen(width, height, Some(&PALETTE));
    out.extend_from_slice(&graphic_control(10));
    out.extend_from_slice(&image(width, height, 0, None, indices));
    out.push(0x3B);
    out
}

fn expected_rgb(indices: &[u8], palette: &[[u8; 3]]) -> Vec<u8> {
    indices
        .iter()
        .flat_map(|i| palette[usize::from(*i)])
        .collect()
}

#[test]
fn decodes_single_frame() {
    let indices: Vec<u8> = (0..64).map(|i| (i % 4) as u8).collect();
    let data = single_frame_gif(&indices, 8, 8);

    let image = decode_gif(&data).unwrap();

    assert_eq!(image.dimensions(), (8, 8));
    assert!(!image.is_animation());
    assert_eq!(image.sub_images.len(), 1);

    let frame = &image.sub_images[0];
    assert_eq!(frame.indices, indices);
    assert_eq!(frame.pixels, expected_rgb(&indices, &PALETTE));

    let control = frame.graphic_control.unwrap();
    assert_eq!(control.delay_time, 10);
    assert_eq!(control.delay_ms(), 100);
}

#[test]
fn reference_decodes_our_fixture() {
    // pins the fixture packer itself against an independent decoder
    let indices: Vec<u8> = (0..64).map(|i| (i % 4) as u8).collect();
    let data = single_frame_gif(&indices, 8, 8);

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut reference = options.read_info(&data[..]).unwrap();

    let frame = reference.read_next_frame().unwrap().unwrap();
    assert_eq!(frame.width, 8);
    assert_eq!(frame.height, 8);
    assert_eq!(frame.delay, 10);

    let ours = decode_gif(&data).unwrap();
    let pixels = &ours.sub_images[0].pixels;

    assert_eq!(frame.buffer.len(), 64 * 4);
    for (theirs, ours) in frame.buffer.chunks_exact(4).zip(pixels.chunks_exact(3)) {
        assert_eq!(&theirs[..3], ours);
    }
}

#[test]
fn matches_reference_decoder_on_compressed_stream() {
    // a stream with real dictionary hits, produced by the reference
    // encoder, decoded by both sides
    let indices: Vec<u8> = (0..256).map(|i| ((i / 7) % 4) as u8).collect();
    let flat: Vec<u8> = PALETTE.iter().flatten().copied().collect();

    let mut data = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut data, 16, 16, &flat).unwrap();
        let frame = gif::Frame::from_indexed_pixels(16, 16, indices.clone(), None);
        encoder.write_frame(&frame).unwrap();
    }

    let image = decode_gif(&data).unwrap();

    assert_eq!(image.dimensions(), (16, 16));
    assert_eq!(image.sub_images[0].indices, indices);
    assert_eq!(image.sub_images[0].pixels, expected_rgb(&indices, &PALETTE));
}

#[test]
fn two_frames_build_an_animation() {
    let first: Vec<u8> = vec![1; 64];
    let second: Vec<u8> = vec![2; 64];

    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&graphic_control(10));
    data.extend_from_slice(&image(8, 8, 0, None, &first));
    data.extend_from_slice(&graphic_control(25));
    data.extend_from_slice(&image(8, 8, 0, None, &second));
    data.push(0x3B);

    let image = decode_gif(&data).unwrap();

    assert!(image.is_animation());
    assert_eq!(image.sub_images.len(), 2);
    assert_eq!(image.sub_images[0].graphic_control.unwrap().delay_ms(), 100);
    assert_eq!(image.sub_images[1].graphic_control.unwrap().delay_ms(), 250);
    assert_eq!(image.sub_images[0].pixels, expected_rgb(&first, &PALETTE));
    assert_eq!(image.sub_images[1].pixels, expected_rgb(&second, &PALETTE));
}

#[test]
fn control_block_is_optional() {
    let indices = vec![0u8; 64];

    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.push(0x3B);

    let image = decode_gif(&data).unwrap();
    assert!(image.sub_images[0].graphic_control.is_none());
}

#[test]
fn control_block_attaches_to_next_image_only() {
    let indices = vec![0u8; 64];

    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&graphic_control(10));
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    // second image has no control block of its own
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.push(0x3B);

    let image = decode_gif(&data).unwrap();
    assert!(image.sub_images[0].graphic_control.is_some());
    assert!(image.sub_images[1].graphic_control.is_none());
}

#[test]
fn local_table_takes_precedence() {
    let local: [[u8; 3]; 4] = [[10, 10, 10], [20, 20, 20], [30, 30, 30], [40, 40, 40]];
    let indices = vec![1u8; 64];

    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&image(8, 8, 0, Some(&local), &indices));
    data.push(0x3B);

    let image = decode_gif(&data).unwrap();

    let frame = &image.sub_images[0];
    assert!(frame.local_table.is_some());
    assert_eq!(frame.pixels, expected_rgb(&indices, &local));
}

#[test]
fn skips_unknown_extensions() {
    let indices = vec![0u8; 64];

    let mut data = screen(8, 8, Some(&PALETTE));
    // application extension, netscape loop block
    data.extend_from_slice(&[0x21, 0xFF, 0x0B]);
    data.extend_from_slice(b"NETSCAPE2.0");
    data.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00]);
    // comment extension
    data.extend_from_slice(&[0x21, 0xFE, 0x05]);
    data.extend_from_slice(b"hello");
    data.push(0x00);
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.push(0x3B);

    let image = decode_gif(&data).unwrap();
    assert_eq!(image.sub_images.len(), 1);
}

#[test]
fn stray_bytes_between_blocks_are_ignored() {
    let indices = vec![0u8; 64];

    let mut data = screen(8, 8, Some(&PALETTE));
    data.push(0x00);
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.extend_from_slice(&[0x00, 0x00]);
    data.push(0x3B);

    let image = decode_gif(&data).unwrap();
    assert_eq!(image.sub_images.len(), 1);
}

#[test]
fn rejects_bad_magic() {
    assert!(matches!(decode_gif(b"GIF88a"), Err(GifError::NotAGif)));
    assert!(matches!(
        decode_gif(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        Err(GifError::NotAGif)
    ));
    assert!(matches!(decode_gif(&[]), Err(GifError::NotAGif)));
}

#[test]
fn rejects_interlaced_sub_images() {
    let indices = vec![0u8; 64];

    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&image(8, 8, 0x40, None, &indices));
    data.push(0x3B);

    assert!(matches!(decode_gif(&data), Err(GifError::NotSupported(_))));
}

#[test]
fn rejects_partial_frames() {
    let indices = vec![0u8; 16];

    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&image(4, 4, 0, None, &indices));
    data.push(0x3B);

    assert!(matches!(decode_gif(&data), Err(GifError::NotSupported(_))));
}

#[test]
fn rejects_malformed_control_blocks() {
    let indices = vec![0u8; 64];

    // wrong length byte
    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&[0x21, 0xF9, 0x05, 0x00, 0x0A, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.push(0x3B);
    assert!(matches!(decode_gif(&data), Err(GifError::Inconsistent(_))));

    // missing terminator
    let mut data = screen(8, 8, Some(&PALETTE));
    data.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x01]);
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.push(0x3B);
    assert!(matches!(decode_gif(&data), Err(GifError::Inconsistent(_))));
}

#[test]
fn rejects_color_index_past_table() {
    // 2 entry global table but the stream uses root code 3
    let small: [[u8; 3]; 2] = [[0, 0, 0], [255, 255, 255]];
    let indices = vec![3u8; 64];

    let mut data = screen(8, 8, Some(&small));
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.push(0x3B);

    assert!(matches!(
        decode_gif(&data),
        Err(GifError::ColorIndexOutOfBounds(3, 2))
    ));
}

#[test]
fn rejects_missing_color_table() {
    let indices = vec![0u8; 64];

    let mut data = screen(8, 8, None);
    data.extend_from_slice(&image(8, 8, 0, None, &indices));
    data.push(0x3B);

    assert!(matches!(decode_gif(&data), Err(GifError::MissingColorTable)));
}

#[test]
fn rejects_oversized_dimensions() {
    use pixmat_core::options::DecoderOptions;

    let indices = vec![0u8; 64];
    let data = single_frame_gif(&indices, 8, 8);

    let options = DecoderOptions::default().set_max_width(4);
    let mut decoder = GifDecoder::new_with_options(&data, options);

    assert!(matches!(
        decoder.decode(),
        Err(GifError::TooLargeDimensions("width", 4, 8))
    ));
}

#[test]
fn second_decode_is_rejected() {
    let indices = vec![0u8; 64];
    let data = single_frame_gif(&indices, 8, 8);

    let mut decoder = GifDecoder::new(&data);
    decoder.decode().unwrap();

    assert!(matches!(decoder.decode(), Err(GifError::AlreadyDecoded)));
}

#[test]
fn truncation_never_panics() {
    let indices: Vec<u8> = (0..64).map(|i| (i % 4) as u8).collect();
    let data = single_frame_gif(&indices, 8, 8);

    for cut in 0..data.len() {
        assert!(
            decode_gif(&data[..cut]).is_err(),
            "decode succeeded on a {cut} byte prefix"
        );
    }
}
