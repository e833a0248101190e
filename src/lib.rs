//! Pixel-level image transforms built around RGB color quantization.
//!
//! The centre of the crate is [`Quantizer`]: k-means over RGB picks a small
//! palette, then every pixel is remapped to its nearest palette color.
//! [`convolve()`] applies 3×3 weighted-sum filters and
//! [`reduce_to_eight`] is a one-shot eight-color posterizer.
//!
//! ```
//! use image_quantize_wasm::{QuantizeConfig, Quantizer, Raster};
//! use palette::Srgb;
//!
//! let red = Srgb::new(255u8, 0, 0);
//! let blue = Srgb::new(0u8, 0, 255);
//! let image = Raster::from_pixels(2, 2, vec![red, red, blue, blue]).unwrap();
//!
//! let q = Quantizer::new(QuantizeConfig::new().seed(3)).reduce_colors(&image, 2).unwrap();
//! assert!(q.image.pixels().iter().all(|c| q.palette.contains(c)));
//! ```
//!
//! Decoding and encoding (`codec`), the browser entry points (`wasm`) and the
//! `quantize-cli` binary are thin wrappers over the same calls.

pub mod codec;
pub mod color;
pub mod convolve;
pub mod error;
pub mod kmeans;
pub mod posterize;
pub mod quantize;
pub mod raster;
pub mod remap;
pub mod seed;
pub mod wasm;

pub use color::{Color, distance, find_closest};
pub use convolve::{Kernel, convolve};
pub use error::{QuantizeError, Result};
pub use kmeans::{Clustering, KMeans, refine};
pub use posterize::reduce_to_eight;
pub use quantize::{QuantizeConfig, Quantized, Quantizer, map_to_palette, reduce_colors};
pub use raster::Raster;
pub use remap::remap;
pub use seed::{SeedStrategy, random_palette};
