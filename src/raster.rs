use image::{DynamicImage, Rgb, RgbImage};
use palette::Srgb;

use crate::color::Color;
use crate::error::{QuantizeError, Result};

/// A fixed-size grid of RGB samples stored row-major.
///
/// Every coordinate inside `width × height` maps to exactly one pixel; the
/// dimensions never change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

/// Number of pixels in a `width × height` grid, if it fits in `usize`.
fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(QuantizeError::ZeroDimension);
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(QuantizeError::TooLarge { width, height })
}

impl Raster {
    /// An image where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; len],
        })
    }

    /// Wrap a row-major pixel buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        if pixels.len() != pixel_count(width, height)? {
            return Err(QuantizeError::DimensionMismatch {
                len: pixels.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        let i = self.index(x, y).ok_or(QuantizeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.pixels[i] = color;
        Ok(())
    }

    /// Row-major view of every pixel.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Copy into an `image` buffer for encoding.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixels[y as usize * self.width as usize + x as usize];
            Rgb([c.red, c.green, c.blue])
        })
    }
}

impl TryFrom<&RgbImage> for Raster {
    type Error = QuantizeError;

    fn try_from(img: &RgbImage) -> Result<Self> {
        let pixels = img
            .pixels()
            .map(|p| Srgb::new(p[0], p[1], p[2]))
            .collect();
        Raster::from_pixels(img.width(), img.height(), pixels)
    }
}

/// Alpha is dropped; the engine only works on RGB.
impl TryFrom<&DynamicImage> for Raster {
    type Error = QuantizeError;

    fn try_from(img: &DynamicImage) -> Result<Self> {
        Raster::try_from(&img.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> Color {
        Srgb::new(r, g, b)
    }

    #[test]
    fn rejects_zero_dimensions() {
        let black = rgb(0, 0, 0);
        assert!(matches!(Raster::filled(0, 4, black), Err(QuantizeError::ZeroDimension)));
        assert!(matches!(
            Raster::from_pixels(3, 0, vec![]),
            Err(QuantizeError::ZeroDimension)
        ));
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = Raster::from_pixels(2, 2, vec![rgb(1, 1, 1); 3]).unwrap_err();
        assert!(matches!(
            err,
            QuantizeError::DimensionMismatch { len: 3, width: 2, height: 2 }
        ));
    }

    #[test]
    fn huge_dimensions_do_not_overflow() {
        let err = Raster::from_pixels(u32::MAX, u32::MAX, vec![rgb(0, 0, 0)]).unwrap_err();
        if cfg!(target_pointer_width = "64") {
            assert!(matches!(err, QuantizeError::DimensionMismatch { len: 1, .. }));
        } else {
            assert!(matches!(err, QuantizeError::TooLarge { .. }));
        }
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn pixel_count_reports_overflow() {
        assert!(matches!(
            pixel_count(70_000, 70_000),
            Err(QuantizeError::TooLarge { width: 70_000, height: 70_000 })
        ));
    }

    #[test]
    fn get_and_set_are_row_major() {
        let mut r = Raster::filled(3, 2, rgb(0, 0, 0)).unwrap();
        r.set(2, 1, rgb(9, 8, 7)).unwrap();
        assert_eq!(r.pixels()[5], rgb(9, 8, 7));
        assert_eq!(r.get(2, 1), Some(rgb(9, 8, 7)));
        assert_eq!(r.get(3, 0), None);
        assert!(matches!(
            r.set(0, 2, rgb(1, 1, 1)),
            Err(QuantizeError::OutOfBounds { x: 0, y: 2, .. })
        ));
    }

    #[test]
    fn converts_through_rgb_image() {
        let pixels = vec![
            rgb(255, 0, 0),
            rgb(0, 255, 0),
            rgb(0, 0, 255),
            rgb(10, 20, 30),
        ];
        let r = Raster::from_pixels(2, 2, pixels).unwrap();
        let img = r.to_rgb_image();
        assert_eq!(img.get_pixel(1, 0), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([10, 20, 30]));
        assert_eq!(Raster::try_from(&img).unwrap(), r);
    }
}
