//! Fixed eight-color posterization.
//!
//! A cheaper cousin of k-means: each channel is split once at a threshold
//! and both halves collapse onto their own mean, giving at most 2³ colors.

use crate::color::Color;
use crate::raster::Raster;

/// Channel values at or below this are "low".
pub const EIGHT_COLOR_THRESHOLD: u8 = 126;

#[inline(always)]
fn channel(c: &Color, i: usize) -> u8 {
    match i {
        0 => c.red,
        1 => c.green,
        _ => c.blue,
    }
}

#[inline(always)]
fn channel_mut(c: &mut Color, i: usize) -> &mut u8 {
    match i {
        0 => &mut c.red,
        1 => &mut c.green,
        _ => &mut c.blue,
    }
}

/// Mean rounded half up; 0 for an empty group.
fn rounded_mean(sum: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)) as u8
}

/// Reduce `image` to at most eight colors.
///
/// For red, green and blue in turn, pixels whose channel is at most
/// [`EIGHT_COLOR_THRESHOLD`] get the rounded mean of that low group and the
/// rest get the mean of the high group.
pub fn reduce_to_eight(image: &Raster) -> Raster {
    let mut out = image.clone();
    let pixels = out.pixels_mut();

    for i in 0..3 {
        let (mut low_sum, mut low_n, mut high_sum, mut high_n) = (0u64, 0u64, 0u64, 0u64);
        for c in pixels.iter() {
            let v = channel(c, i) as u64;
            if channel(c, i) <= EIGHT_COLOR_THRESHOLD {
                low_sum += v;
                low_n += 1;
            } else {
                high_sum += v;
                high_n += 1;
            }
        }

        let low = rounded_mean(low_sum, low_n);
        let high = rounded_mean(high_sum, high_n);
        for c in pixels.iter_mut() {
            let slot = channel_mut(c, i);
            *slot = if *slot <= EIGHT_COLOR_THRESHOLD { low } else { high };
        }
    }

    out
}
