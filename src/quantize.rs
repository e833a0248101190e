use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::color::Color;
use crate::error::{QuantizeError, Result};
use crate::kmeans::{Clustering, DEFAULT_MAX_DRAW_ATTEMPTS, DEFAULT_MAX_ITERATIONS, KMeans};
use crate::raster::Raster;
use crate::remap::remap;
use crate::seed::SeedStrategy;

/// Configuration for color reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantizeConfig {
    /// Upper bound on k-means passes before giving up on convergence.
    pub max_iterations: usize,
    /// Fixed RNG seed for reproducible palettes. `None` draws from the
    /// thread-local generator.
    pub seed: Option<u64>,
    /// How the initial palette is chosen.
    pub seed_strategy: SeedStrategy,
    /// Draws allowed per palette slot before random seeding gives up.
    pub max_draw_attempts: usize,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
            seed_strategy: SeedStrategy::Random,
            max_draw_attempts: DEFAULT_MAX_DRAW_ATTEMPTS,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seed_strategy(mut self, strategy: SeedStrategy) -> Self {
        self.seed_strategy = strategy;
        self
    }

    pub fn max_draw_attempts(mut self, n: usize) -> Self {
        self.max_draw_attempts = n;
        self
    }

    fn kmeans(&self) -> KMeans {
        KMeans {
            max_iterations: self.max_iterations,
            seed_strategy: self.seed_strategy,
            max_draw_attempts: self.max_draw_attempts,
        }
    }
}

/// A reduced image together with the palette it was mapped onto.
#[derive(Clone, Debug)]
pub struct Quantized {
    pub image: Raster,
    /// May hold fewer colors than requested.
    pub palette: Vec<Color>,
    pub iterations: usize,
    pub converged: bool,
}

/// Reduces images to a small palette: k-means to find the colors, then a
/// nearest-color remap.
#[derive(Clone, Debug, Default)]
pub struct Quantizer {
    config: QuantizeConfig,
}

impl Quantizer {
    pub fn new(config: QuantizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuantizeConfig {
        &self.config
    }

    /// Find up to `count` representative colors for `image`.
    pub fn palette(&self, image: &Raster, count: usize) -> Result<Clustering> {
        if count == 0 {
            return Err(QuantizeError::InvalidColorCount(count));
        }
        let kmeans = self.config.kmeans();
        match self.config.seed {
            Some(seed) => kmeans.cluster(image, count, &mut StdRng::seed_from_u64(seed)),
            None => kmeans.cluster(image, count, &mut rand::rng()),
        }
    }

    /// Reduce `image` to at most `count` colors.
    pub fn reduce_colors(&self, image: &Raster, count: usize) -> Result<Quantized> {
        let Clustering {
            palette,
            iterations,
            converged,
        } = self.palette(image, count)?;
        let reduced = remap(image, &palette)?;

        info!(
            requested = count,
            colors = palette.len(),
            iterations,
            converged,
            "reduced image colors"
        );

        Ok(Quantized {
            image: reduced,
            palette,
            iterations,
            converged,
        })
    }
}

/// Reduce `image` to at most `count` colors with the default configuration.
pub fn reduce_colors(image: &Raster, count: usize) -> Result<Quantized> {
    Quantizer::default().reduce_colors(image, count)
}

/// Map `image` onto a fixed palette, skipping clustering.
pub fn map_to_palette(image: &Raster, palette: &[Color]) -> Result<Raster> {
    remap(image, palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    fn rgb(r: u8, g: u8, b: u8) -> Color {
        Srgb::new(r, g, b)
    }

    #[test]
    fn builder_sets_fields() {
        let config = QuantizeConfig::new()
            .max_iterations(7)
            .seed(42)
            .seed_strategy(SeedStrategy::FirstPixels)
            .max_draw_attempts(3);
        assert_eq!(config.max_iterations, 7);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.seed_strategy, SeedStrategy::FirstPixels);
        assert_eq!(config.max_draw_attempts, 3);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let pixels = (0..100u32)
            .map(|i| rgb((i * 13 % 256) as u8, (i * 29 % 256) as u8, (i * 71 % 256) as u8))
            .collect();
        let image = Raster::from_pixels(10, 10, pixels).unwrap();
        let quantizer = Quantizer::new(QuantizeConfig::new().seed(11));

        let a = quantizer.reduce_colors(&image, 5).unwrap();
        let b = quantizer.reduce_colors(&image, 5).unwrap();
        assert_eq!(a.palette, b.palette);
        assert_eq!(a.image, b.image);
        assert!(a.palette.len() <= 5);
        assert!(a.image.pixels().iter().all(|c| a.palette.contains(c)));
    }

    #[test]
    fn zero_colors_is_rejected() {
        let image = Raster::filled(2, 2, rgb(1, 2, 3)).unwrap();
        assert!(matches!(
            reduce_colors(&image, 0),
            Err(QuantizeError::InvalidColorCount(0))
        ));
    }

    #[test]
    fn fixed_palette_mapping() {
        let image = Raster::from_pixels(2, 1, vec![rgb(250, 250, 250), rgb(5, 5, 5)]).unwrap();
        let out = map_to_palette(&image, &[rgb(0, 0, 0), rgb(255, 255, 255)]).unwrap();
        assert_eq!(out.pixels(), &[rgb(255, 255, 255), rgb(0, 0, 0)]);
    }
}
