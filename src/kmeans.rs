use palette::Srgb;
use rand::Rng;
use tracing::{debug, debug_span, warn};

use crate::color::{Color, find_closest};
use crate::error::{QuantizeError, Result};
use crate::raster::Raster;
use crate::seed::{SeedStrategy, first_pixel_palette, random_palette};

pub const DEFAULT_MAX_ITERATIONS: usize = 50;
pub const DEFAULT_MAX_DRAW_ATTEMPTS: usize = 1_000;

/// Outcome of one k-means run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clustering {
    /// Final palette, at most `count` entries. Clusters that ended up with no
    /// pixels were dropped along the way.
    pub palette: Vec<Color>,
    /// Assign + recompute passes performed.
    pub iterations: usize,
    /// `false` when the iteration cap stopped the run; `palette` is then the
    /// last one computed.
    pub converged: bool,
}

/// Full-batch Lloyd's k-means over RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KMeans {
    pub max_iterations: usize,
    pub seed_strategy: SeedStrategy,
    pub max_draw_attempts: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed_strategy: SeedStrategy::Random,
            max_draw_attempts: DEFAULT_MAX_DRAW_ATTEMPTS,
        }
    }
}

impl KMeans {
    /// Seed a palette of `count` colors and iterate until it stops changing.
    pub fn cluster<R: Rng>(&self, image: &Raster, count: usize, rng: &mut R) -> Result<Clustering> {
        if count == 0 {
            return Err(QuantizeError::InvalidColorCount(count));
        }
        let seed = match self.seed_strategy {
            SeedStrategy::Random => random_palette(count, self.max_draw_attempts, rng)?,
            SeedStrategy::FirstPixels => first_pixel_palette(image, count)?,
        };
        self.cluster_from(image, seed)
    }

    /// Iterate from a caller-chosen starting palette.
    pub fn cluster_from(&self, image: &Raster, seed: Vec<Color>) -> Result<Clustering> {
        if seed.is_empty() {
            return Err(QuantizeError::EmptyPalette);
        }
        let _span = debug_span!("kmeans", k = seed.len()).entered();

        let max_iterations = self.max_iterations.max(1);
        let mut palette = seed;
        for iteration in 1..=max_iterations {
            let next = refine(image, &palette)?;
            debug!(iteration, colors = next.len(), "recomputed centroids");

            if next == palette {
                return Ok(Clustering {
                    palette,
                    iterations: iteration,
                    converged: true,
                });
            }
            palette = next;
        }

        warn!(
            max_iterations,
            colors = palette.len(),
            "k-means did not converge, keeping last palette"
        );
        Ok(Clustering {
            palette,
            iterations: max_iterations,
            converged: false,
        })
    }
}

/// Running per-channel totals for one cluster.
#[derive(Clone, Copy, Default)]
struct ClusterTotals {
    sum: [u64; 3],
    members: u64,
}

impl ClusterTotals {
    #[inline(always)]
    fn add(&mut self, c: Color) {
        self.sum[0] += c.red as u64;
        self.sum[1] += c.green as u64;
        self.sum[2] += c.blue as u64;
        self.members += 1;
    }

    /// Truncated per-channel mean, `None` for an empty cluster.
    fn centroid(&self) -> Option<Color> {
        if self.members == 0 {
            return None;
        }
        let n = self.members;
        // A mean of u8 values always fits back into a u8.
        Some(Srgb::new(
            (self.sum[0] / n) as u8,
            (self.sum[1] / n) as u8,
            (self.sum[2] / n) as u8,
        ))
    }
}

/// Assign every pixel to its nearest palette slot.
///
/// The whole image is scanned before any centroid is read back.
fn assign(image: &Raster, palette: &[Color]) -> Result<Vec<ClusterTotals>> {
    if palette.is_empty() {
        return Err(QuantizeError::EmptyPalette);
    }
    let mut clusters = vec![ClusterTotals::default(); palette.len()];
    for &pixel in image.pixels() {
        clusters[find_closest(pixel, palette)?].add(pixel);
    }
    Ok(clusters)
}

/// One assign + recompute pass.
///
/// Returns the centroids of the non-empty clusters in slot order, so the
/// result can be shorter than `palette`. A converged palette is a fixed
/// point: `refine(image, &p) == p`.
pub fn refine(image: &Raster, palette: &[Color]) -> Result<Vec<Color>> {
    Ok(assign(image, palette)?
        .iter()
        .filter_map(ClusterTotals::centroid)
        .collect())
}
