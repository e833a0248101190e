use std::collections::HashSet;

use palette::Srgb;
use rand::Rng;

use crate::color::Color;
use crate::error::{QuantizeError, Result};
use crate::raster::Raster;

/// Exclusive upper bound for a randomly drawn channel.
///
/// Channels land in [0, 254], so 255 is never produced by seeding. Centroids
/// computed from real pixels can still reach 255.
pub const CHANNEL_DRAW_BOUND: u8 = 255;

/// How many distinct colors random seeding can ever produce.
pub const DRAWABLE_COLORS: usize =
    CHANNEL_DRAW_BOUND as usize * CHANNEL_DRAW_BOUND as usize * CHANNEL_DRAW_BOUND as usize;

const PREALLOC_LIMIT: usize = 1 << 16;

/// Where the first palette of a k-means run comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedStrategy {
    /// `count` distinct random colors.
    #[default]
    Random,
    /// The first `count` distinct colors met scanning the image row by row.
    /// Yields fewer entries when the image has fewer colors.
    FirstPixels,
}

/// Draw `count` distinct random colors.
///
/// Collisions are re-drawn. A slot that cannot find a fresh color within
/// `max_attempts` draws fails the whole call instead of spinning forever.
pub fn random_palette<R: Rng>(
    count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<Color>> {
    if count == 0 {
        return Err(QuantizeError::InvalidColorCount(count));
    }
    if count > DRAWABLE_COLORS {
        return Err(QuantizeError::PaletteExhausted {
            requested: count,
            found: 0,
        });
    }

    let mut seen: HashSet<(u8, u8, u8)> = HashSet::with_capacity(count.min(PREALLOC_LIMIT));
    let mut colors = Vec::with_capacity(count.min(PREALLOC_LIMIT));

    while colors.len() < count {
        let fresh = (0..max_attempts.max(1)).find_map(|_| {
            let key = (
                rng.random_range(0..CHANNEL_DRAW_BOUND),
                rng.random_range(0..CHANNEL_DRAW_BOUND),
                rng.random_range(0..CHANNEL_DRAW_BOUND),
            );
            seen.insert(key).then_some(key)
        });
        match fresh {
            Some((r, g, b)) => colors.push(Srgb::new(r, g, b)),
            None => {
                return Err(QuantizeError::PaletteExhausted {
                    requested: count,
                    found: colors.len(),
                });
            }
        }
    }

    Ok(colors)
}

/// The first `count` distinct colors of `image` in row-major order.
pub fn first_pixel_palette(image: &Raster, count: usize) -> Result<Vec<Color>> {
    if count == 0 {
        return Err(QuantizeError::InvalidColorCount(count));
    }
    let mut seen = HashSet::with_capacity(count.min(PREALLOC_LIMIT));
    let colors = image
        .pixels()
        .iter()
        .filter(|c| seen.insert((c.red, c.green, c.blue)))
        .take(count)
        .copied()
        .collect();
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generates_requested_number_of_distinct_colors() {
        let mut rng = StdRng::seed_from_u64(7);
        let colors = random_palette(5, 1_000, &mut rng).unwrap();
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn never_draws_channel_255() {
        let mut rng = StdRng::seed_from_u64(99);
        let colors = random_palette(4_000, 1_000, &mut rng).unwrap();
        assert!(colors.iter().all(|c| c.red < 255 && c.green < 255 && c.blue < 255));
    }

    #[test]
    fn same_seed_same_palette() {
        let a = random_palette(12, 1_000, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = random_palette(12, 1_000, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_zero_count() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            random_palette(0, 10, &mut rng),
            Err(QuantizeError::InvalidColorCount(0))
        ));
    }

    #[test]
    fn rejects_counts_beyond_the_drawable_space() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            random_palette(DRAWABLE_COLORS + 1, 10, &mut rng),
            Err(QuantizeError::PaletteExhausted { found: 0, .. })
        ));
    }

    /// Always yields zero, so every draw lands on the same color.
    struct StuckRng;

    impl rand::RngCore for StuckRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn gives_up_when_draws_keep_colliding() {
        let err = random_palette(3, 10, &mut StuckRng).unwrap_err();
        assert!(matches!(
            err,
            QuantizeError::PaletteExhausted { requested: 3, found: 1 }
        ));
    }

    #[test]
    fn first_pixels_skip_repeats() {
        let red = Srgb::new(255, 0, 0);
        let blue = Srgb::new(0, 0, 255);
        let green = Srgb::new(0, 255, 0);
        let img = Raster::from_pixels(2, 2, vec![red, red, blue, green]).unwrap();

        assert_eq!(first_pixel_palette(&img, 2).unwrap(), vec![red, blue]);
        assert_eq!(first_pixel_palette(&img, 8).unwrap(), vec![red, blue, green]);
    }
}
