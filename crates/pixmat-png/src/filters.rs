//! Filter functions for de-filtering png scanlines.
//!
//! There exist two types of filter functions here,
//! special filter functions for the first scanline which has special
//! conditions and normal filter functions.
//!
//! The special first scanline functions have a suffix _first on them
//! and are only called for the first scanline, which treats the row
//! above as zero.
//!
//! [`filter_scanline`] is the forward direction, used by the encoder.

use crate::enums::FilterMethod;

#[allow(clippy::manual_memcpy)]
pub fn handle_sub(raw: &[u8], current: &mut [u8], components: usize) {
    if current.len() < components || raw.len() < components {
        return;
    }
    // handle leftmost pixel explicitly
    for i in 0..components {
        current[i] = raw[i];
    }
    // raw length is one row, so always keep it in check
    let end = current.len().min(raw.len());

    for i in components..end {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a);
    }
}

pub fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8]) {
    for ((filt, recon), up) in raw.iter().zip(current).zip(prev_row) {
        *recon = (*filt).wrapping_add(*up)
    }
}

#[allow(clippy::manual_memcpy)]
pub fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    if raw.len() < components || current.len() < components {
        return;
    }
    // handle leftmost pixel explicitly
    for i in 0..components {
        current[i] = raw[i].wrapping_add(prev_row[i] >> 1);
    }
    // raw length is one row, so always keep it in check
    let end = current.len().min(raw.len()).min(prev_row.len());

    for i in components..end {
        // the average is computed at more than 8 bits, dividing
        // before adding would lose the carry
        let a = u16::from(current[i - components]);
        let b = u16::from(prev_row[i]);

        let c = (((a + b) >> 1) & 0xFF) as u8;

        current[i] = raw[i].wrapping_add(c);
    }
}

/// Average filter on the first scanline.
///
/// The above row is treated as zero.
#[allow(clippy::manual_memcpy)]
pub fn handle_avg_first(raw: &[u8], current: &mut [u8], components: usize) {
    if raw.len() < components || current.len() < components {
        return;
    }
    // handle leftmost pixel explicitly
    for i in 0..components {
        current[i] = raw[i];
    }
    let end = current.len().min(raw.len());

    for i in components..end {
        let avg = current[i - components] >> 1;
        current[i] = raw[i].wrapping_add(avg)
    }
}

#[allow(clippy::manual_memcpy)]
pub fn handle_paeth(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    if raw.len() < components || current.len() < components {
        return;
    }
    // handle leftmost pixel explicitly
    for i in 0..components {
        current[i] = raw[i].wrapping_add(paeth(0, prev_row[i], 0));
    }
    // raw length is one row, so always keep it in check
    let end = current.len().min(raw.len()).min(prev_row.len());

    for i in components..end {
        let paeth_res = paeth(
            current[i - components],
            prev_row[i],
            prev_row[i - components]
        );
        current[i] = raw[i].wrapping_add(paeth_res)
    }
}

/// Paeth filter on the first scanline.
///
/// Special in that the above row is treated as zero.
#[allow(clippy::manual_memcpy)]
pub fn handle_paeth_first(raw: &[u8], current: &mut [u8], components: usize) {
    if raw.len() < components || current.len() < components {
        return;
    }
    // handle leftmost pixel explicitly
    for i in 0..components {
        current[i] = raw[i];
    }
    let end = current.len().min(raw.len());

    for i in components..end {
        let paeth_res = paeth(current[i - components], 0, 0);
        current[i] = raw[i].wrapping_add(paeth_res)
    }
}

/// The paeth predictor.
///
/// Returns whichever of left, above and upper-left is closest to
/// the linear estimate, ties resolved in that order.
#[inline(always)]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let a = i16::from(a);
    let b = i16::from(b);
    let c = i16::from(c);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        return a as u8;
    }
    if pb <= pc {
        return b as u8;
    }
    c as u8
}

/// Filter one scanline in the forward direction.
///
/// `output` holds the filter byte followed by the filtered bytes, so
/// it is one byte longer than `current`. An empty `previous` marks
/// the first scanline.
pub fn filter_scanline(
    current: &[u8], previous: &[u8], output: &mut [u8], filter: FilterMethod, components: usize
) {
    output[0] = filter.to_int();

    let out = &mut output[1..];

    match filter {
        FilterMethod::None => out.copy_from_slice(current),
        FilterMethod::Sub => {
            for i in 0..current.len() {
                let a = if i >= components {
                    current[i - components]
                } else {
                    0
                };
                out[i] = current[i].wrapping_sub(a);
            }
        }
        FilterMethod::Up => {
            if previous.is_empty() {
                out.copy_from_slice(current);
            } else {
                for i in 0..current.len() {
                    out[i] = current[i].wrapping_sub(previous[i]);
                }
            }
        }
        FilterMethod::Average => {
            for i in 0..current.len() {
                let a = if i >= components {
                    u16::from(current[i - components])
                } else {
                    0
                };
                let b = if previous.is_empty() {
                    0
                } else {
                    u16::from(previous[i])
                };
                out[i] = current[i].wrapping_sub((((a + b) >> 1) & 0xFF) as u8);
            }
        }
        FilterMethod::Paeth => {
            for i in 0..current.len() {
                let a = if i >= components {
                    current[i - components]
                } else {
                    0
                };
                let b = if previous.is_empty() { 0 } else { previous[i] };
                let c = if previous.is_empty() || i < components {
                    0
                } else {
                    previous[i - components]
                };
                out[i] = current[i].wrapping_sub(paeth(a, b, c));
            }
        }
        _ => unreachable!()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paeth_tie_breaking() {
        // all equal, estimate hits every candidate
        assert_eq!(paeth(7, 7, 7), 7);
        assert_eq!(paeth(0, 0, 0), 0);
        // left and above tie, left branch taken
        assert_eq!(paeth(9, 9, 2), 9);
        // above and upper-left tie, above wins
        assert_eq!(paeth(2, 5, 3), 5);
        // upper-left strictly closest
        assert_eq!(paeth(2, 9, 5), 5);
    }

    #[test]
    fn sub_round_trips() {
        let row = [10_u8, 250, 30, 13, 255, 7];
        let mut filtered = [0_u8; 7];
        let mut recon = [0_u8; 6];

        filter_scanline(&row, &[], &mut filtered, FilterMethod::Sub, 3);
        assert_eq!(filtered[0], 1);

        handle_sub(&filtered[1..], &mut recon, 3);
        assert_eq!(recon, row);
    }

    #[test]
    fn average_first_row_matches_forward_filter() {
        let row = [200_u8, 100, 50, 255, 0, 128];
        let mut filtered = [0_u8; 7];
        let mut recon = [0_u8; 6];

        filter_scanline(&row, &[], &mut filtered, FilterMethod::Average, 3);
        handle_avg_first(&filtered[1..], &mut recon, 3);

        assert_eq!(recon, row);
    }

    #[test]
    fn paeth_with_previous_row_round_trips() {
        let prev = [9_u8, 17, 4, 250, 3, 77];
        let row = [200_u8, 100, 50, 255, 0, 128];
        let mut filtered = [0_u8; 7];
        let mut recon = [0_u8; 6];

        filter_scanline(&row, &prev, &mut filtered, FilterMethod::Paeth, 3);
        handle_paeth(&prev, &filtered[1..], &mut recon, 3);

        assert_eq!(recon, row);
    }
}
