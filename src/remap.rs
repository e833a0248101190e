use crate::color::{Color, find_closest};
use crate::error::{QuantizeError, Result};
use crate::raster::Raster;

/// Replace every pixel with its nearest palette entry.
///
/// Output pixels are always exact members of `palette`. Neither the input
/// image nor the palette is modified.
pub fn remap(image: &Raster, palette: &[Color]) -> Result<Raster> {
    if palette.is_empty() {
        return Err(QuantizeError::EmptyPalette);
    }
    let pixels = image
        .pixels()
        .iter()
        .map(|&c| find_closest(c, palette).map(|i| palette[i]))
        .collect::<Result<Vec<_>>>()?;
    Raster::from_pixels(image.width(), image.height(), pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    fn rgb(r: u8, g: u8, b: u8) -> Color {
        Srgb::new(r, g, b)
    }

    #[test]
    fn every_output_pixel_is_a_palette_entry() {
        let pixels = (0..64u32)
            .map(|i| rgb((i * 4) as u8, (255 - i * 3) as u8, (i * i % 256) as u8))
            .collect();
        let image = Raster::from_pixels(8, 8, pixels).unwrap();
        let palette = [rgb(0, 0, 0), rgb(255, 255, 255), rgb(255, 0, 0), rgb(0, 255, 0)];

        let out = remap(&image, &palette).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
        assert!(out.pixels().iter().all(|c| palette.contains(c)));
    }

    #[test]
    fn pixels_go_to_their_nearest_entry() {
        let image = Raster::from_pixels(3, 1, vec![rgb(250, 5, 5), rgb(10, 10, 10), rgb(100, 100, 100)])
            .unwrap();
        let palette = [rgb(0, 0, 0), rgb(255, 0, 0)];
        let out = remap(&image, &palette).unwrap();
        assert_eq!(out.pixels(), &[rgb(255, 0, 0), rgb(0, 0, 0), rgb(0, 0, 0)]);
    }

    #[test]
    fn source_is_left_alone() {
        let image = Raster::filled(2, 2, rgb(40, 40, 40)).unwrap();
        let before = image.clone();
        let _ = remap(&image, &[rgb(0, 0, 0)]).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn empty_palette_is_an_error() {
        let image = Raster::filled(1, 1, rgb(0, 0, 0)).unwrap();
        assert!(matches!(remap(&image, &[]), Err(QuantizeError::EmptyPalette)));
    }
}
