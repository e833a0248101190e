use palette::Srgb;

use crate::color::{Color, clamp_channel};
use crate::error::{QuantizeError, Result};
use crate::raster::Raster;

// Sums this close to an integer are treated as that integer before
// truncation, otherwise nine 1/9 weights on a flat 255 land on 254.
const SNAP_EPSILON: f64 = 1e-9;

/// A 3×3 weight matrix, indexed `weights[dy + 1][dx + 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel {
    pub weights: [[f64; 3]; 3],
}

impl Kernel {
    pub const fn new(weights: [[f64; 3]; 3]) -> Self {
        Self { weights }
    }

    /// Leaves every pixel as it is.
    pub const fn identity() -> Self {
        Self::new([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]])
    }

    /// Uniform 1/9 average.
    pub const fn box_blur() -> Self {
        const N: f64 = 1.0 / 9.0;
        Self::new([[N, N, N], [N, N, N], [N, N, N]])
    }

    /// Laplacian-style edge detector: flat regions go to black.
    pub const fn edges() -> Self {
        Self::new([[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]])
    }

    pub const fn sharpen() -> Self {
        Self::new([[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]])
    }

    /// Look up one of the built-in kernels by name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "identity" => Ok(Self::identity()),
            "blur" | "box_blur" => Ok(Self::box_blur()),
            "edges" => Ok(Self::edges()),
            "sharpen" => Ok(Self::sharpen()),
            _ => Err(QuantizeError::UnknownKernel(name.to_string())),
        }
    }
}

#[inline(always)]
fn settle(sum: f64) -> u8 {
    let nearest = sum.round();
    let sum = if (sum - nearest).abs() < SNAP_EPSILON { nearest } else { sum };
    // `as` truncates toward zero and saturates, then we clamp to channel range.
    clamp_channel(sum as i64)
}

/// Apply `kernel` to every interior pixel of `src`.
///
/// The result starts as a copy of `src`, so the one-pixel border keeps its
/// original colors. Each channel sum is truncated, not rounded, and clamped
/// into [0, 255]. Images narrower or shorter than three pixels have no
/// interior and come back unchanged.
pub fn convolve(src: &Raster, kernel: &Kernel) -> Raster {
    let mut out = src.clone();
    let (w, h) = (src.width(), src.height());
    if w < 3 || h < 3 {
        return out;
    }

    let pixels = src.pixels();
    let width = w as usize;
    let dst = out.pixels_mut();

    for y in 1..(h as usize - 1) {
        for x in 1..(width - 1) {
            let mut acc = [0.0f64; 3];
            for (ky, row) in kernel.weights.iter().enumerate() {
                let sy = y + ky - 1;
                for (kx, &weight) in row.iter().enumerate() {
                    let c: Color = pixels[sy * width + x + kx - 1];
                    acc[0] += c.red as f64 * weight;
                    acc[1] += c.green as f64 * weight;
                    acc[2] += c.blue as f64 * weight;
                }
            }
            dst[y * width + x] = Srgb::new(settle(acc[0]), settle(acc[1]), settle(acc[2]));
        }
    }

    out
}
