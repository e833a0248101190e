use palette::Srgb;

use crate::error::{QuantizeError, Result};

/// An 8-bit RGB sample. Every channel is already inside [0, 255].
pub type Color = Srgb<u8>;

/// Squared Euclidean distance between two colors.
///
/// No square root is taken; the value is only ever compared against other
/// distances, and squaring is monotonic.
#[inline(always)]
pub fn distance(a: Color, b: Color) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Index of the palette entry closest to `color`.
///
/// Ties go to the lowest index: a later entry only wins with a strictly
/// smaller distance.
pub fn find_closest(color: Color, palette: &[Color]) -> Result<usize> {
    let (first, rest) = palette.split_first().ok_or(QuantizeError::EmptyPalette)?;

    let mut best_idx = 0;
    let mut best_dist = distance(color, *first);
    for (offset, candidate) in rest.iter().enumerate() {
        let d = distance(color, *candidate);
        if d < best_dist {
            best_dist = d;
            best_idx = offset + 1;
        }
    }
    Ok(best_idx)
}

/// Force an arithmetic result back into channel range.
#[inline(always)]
pub fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Parse `RRGGBB` or `#RRGGBB` (either case).
pub fn parse_hex_color(s: &str) -> Result<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(QuantizeError::InvalidHexColor(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| QuantizeError::InvalidHexColor(s.to_string()))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Uppercase `RRGGBB`, the format palettes are reported in.
pub fn to_hex(c: Color) -> String {
    format!("{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}
