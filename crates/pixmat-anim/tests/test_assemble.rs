//! Assembling animations straight from decoded gif streams.
//!
//! Fixtures are synthesized in code, block by block, the same way
//! the gif decoder tests build theirs.

use pixmat_anim::Animation;
use pixmat_gif::decode_gif;

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

/// Magic bytes and a screen descriptor declaring the 4 entry global
/// color table.
fn screen(width: u16, height: u16) -> Vec<u8> {
    let mut out = b"GIF89a".to_vec();

    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(0x81); // global table, 4 entries
    out.push(0); // background index
    out.push(0); // aspect ratio

    for entry in &PALETTE {
        out.extend_from_slice(entry);
    }
    out
}

fn graphic_control(delay: u16) -> Vec<u8> {
    let mut out = vec![0x21, 0xF9, 0x04, 0x00];
    out.extend_from_slice(&delay.to_le_bytes());
    out.extend_from_slice(&[0x00, 0x00]);
    out
}

fn image(width: u16, height: u16, indices: &[u8]) -> Vec<u8> {
    let mut out = vec![0x2C];

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(0); // no local table

    out.push(2); // minimum code size
    for chunk in lzw_compress(indices, 2).chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

/// An 8x8 two frame stream, solid red then solid green, both frames
/// shown for 100 ms.
fn two_frame_gif() -> Vec<u8> {
    let mut data = screen(8, 8);

    data.extend_from_slice(&graphic_control(10));
    data.extend_from_slice(&image(8, 8, &[1; 64]));
    data.extend_from_slice(&graphic_control(10));
    data.extend_from_slice(&image(8, 8, &[2; 64]));
    data.push(0x3B);
    data
}

#[test]
fn two_frames_assemble_in_document_order() {
    let document = decode_gif(&two_frame_gif()).unwrap();
    assert!(document.is_animation());

    let animation = Animation::from_gif(document);

    assert_eq!(animation.len(), 2);
    assert_eq!(animation.dimensions(), (8, 8));

    let delays: Vec<u32> = animation.frames().iter().map(|f| f.delay_ms).collect();
    assert_eq!(delays, vec![100, 100]);

    assert_eq!(animation.frames()[0].pixels, [255, 0, 0].repeat(64));
    assert_eq!(animation.frames()[1].pixels, [0, 255, 0].repeat(64));

    assert_eq!(animation.frames()[0].x, 0);
    assert_eq!(animation.frames()[0].y, 0);
}

#[test]
fn cursor_walks_the_decoded_frames() {
    let document = decode_gif(&two_frame_gif()).unwrap();
    let mut animation = Animation::from_gif(document);

    assert_eq!(animation.frame_index(), 0);
    assert_eq!(animation.current().unwrap().pixels, [255, 0, 0].repeat(64));

    animation.advance();
    assert_eq!(animation.current().unwrap().pixels, [0, 255, 0].repeat(64));

    // past the last frame the cursor wraps to the first
    animation.advance();
    assert_eq!(animation.frame_index(), 0);
    assert_eq!(animation.current().unwrap().pixels, [255, 0, 0].repeat(64));
}

#[test]
fn frames_without_control_blocks_are_dropped() {
    let mut data = screen(4, 4);

    data.extend_from_slice(&graphic_control(25));
    data.extend_from_slice(&image(4, 4, &[3; 16]));
    // second image has no control block attached
    data.extend_from_slice(&image(4, 4, &[1; 16]));
    data.push(0x3B);

    let document = decode_gif(&data).unwrap();
    let animation = Animation::from_gif(document);

    assert_eq!(animation.len(), 1);
    assert_eq!(animation.frames()[0].delay_ms, 250);
    assert_eq!(animation.frames()[0].pixels, [0, 0, 255].repeat(16));
}

#[test]
fn still_gifs_make_single_frame_animations() {
    let mut data = screen(4, 4);

    data.extend_from_slice(&graphic_control(10));
    data.extend_from_slice(&image(4, 4, &[2; 16]));
    data.push(0x3B);

    let document = decode_gif(&data).unwrap();
    assert!(!document.is_animation());

    let animation = Animation::from_gif(document);

    assert_eq!(animation.len(), 1);
    assert_eq!(animation.frames()[0].delay_ms, 100);
}
