use std::io::Cursor;

use image::ImageFormat;
use tracing::debug;

use crate::color::{Color, parse_hex_color, to_hex};
use crate::convolve::{Kernel, convolve};
use crate::error::Result;
use crate::quantize::{QuantizeConfig, Quantizer, map_to_palette};
use crate::raster::Raster;

/// Decode any format the `image` crate recognises. Alpha is discarded.
pub fn decode(input: &[u8]) -> Result<Raster> {
    let img = image::load_from_memory(input)?;
    debug!(width = img.width(), height = img.height(), "decoded image");
    Raster::try_from(&img)
}

pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    raster
        .to_rgb_image()
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Parse a list of `RRGGBB` strings into a palette.
pub fn parse_palette<S: AsRef<str>>(hex: &[S]) -> Result<Vec<Color>> {
    hex.iter().map(|s| parse_hex_color(s.as_ref())).collect()
}

/// Decode, reduce colors, and re-encode as PNG.
///
/// With `palette_hex` the image is mapped straight onto those colors;
/// otherwise k-means picks up to `n_colors`. Returns the PNG bytes and the
/// palette actually used as uppercase hex.
pub fn quantize_bytes<S: AsRef<str>>(
    input: &[u8],
    n_colors: usize,
    palette_hex: Option<&[S]>,
    config: &QuantizeConfig,
) -> Result<(Vec<u8>, Vec<String>)> {
    let raster = decode(input)?;

    let (reduced, palette) = match palette_hex {
        Some(list) => {
            let palette = parse_palette(list)?;
            (map_to_palette(&raster, &palette)?, palette)
        }
        None => {
            let q = Quantizer::new(config.clone()).reduce_colors(&raster, n_colors)?;
            (q.image, q.palette)
        }
    };

    let png = encode_png(&reduced)?;
    Ok((png, palette.into_iter().map(to_hex).collect()))
}

/// Decode, convolve with `kernel`, and re-encode as PNG.
pub fn convolve_bytes(input: &[u8], kernel: &Kernel) -> Result<Vec<u8>> {
    let raster = decode(input)?;
    encode_png(&convolve(&raster, kernel))
}
