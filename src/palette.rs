//! The two coloring models, both memoizing.  Every escaping outcome
//! is discretized to a bucket key; the first outcome to land in a
//! bucket decides the bucket's color, and every later outcome that
//! lands there gets the same answer back.  The cache belongs to the
//! palette instance, lives for one render, and is never evicted.
//!
//! Points that never escape don't get a bucket at all: they are the
//! black heart of the set, and they are painted as such.

use std::collections::HashMap;
use std::f64::consts::LN_2;

use num::clamp;
use rand::prelude::*;
use rand::rngs::StdRng;

use escape::Escape;

/// An 8-bit-per-channel color, in red, green, blue, alpha order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

/// The color of every point that never escapes: fully opaque black.
pub const BLACK: Rgba = Rgba(0, 0, 0, 255);

/// The one capability the renderer needs from a coloring model:
/// derive a color from an iteration outcome.  Implementations are
/// expected to be memoizing, which is why the receiver is mutable.
pub trait Palette {
    /// Returns the color for the outcome.  For a given bucket key the
    /// answer must be stable across the life of the palette, so that
    /// every pixel landing in the bucket is painted identically.
    fn color(&mut self, escape: &Escape) -> Rgba;
}

/// The discrete model.  Escaping outcomes are bucketed on the whole
/// part of their final magnitude, and each bucket is assigned a
/// uniformly random red, green, and blue on first encounter.  The
/// alpha channel carries the iteration count, darkened by a constant
/// contrast factor, so deeper escapes fade while the hue still jumps
/// from band to band.
pub struct RandomPalette {
    contrast: u8,
    cache: HashMap<i64, Rgba>,
    rng: StdRng,
}

impl RandomPalette {
    /// A palette seeded from system entropy, for when nobody cares
    /// which colors come out.
    pub fn new(contrast: u8) -> RandomPalette {
        RandomPalette::from_rng(contrast, StdRng::from_entropy())
    }

    /// A palette with a caller-chosen seed, so a render can be
    /// reproduced color for color.
    pub fn with_seed(contrast: u8, seed: u64) -> RandomPalette {
        RandomPalette::from_rng(contrast, StdRng::seed_from_u64(seed))
    }

    fn from_rng(contrast: u8, rng: StdRng) -> RandomPalette {
        RandomPalette {
            contrast,
            cache: HashMap::new(),
            rng,
        }
    }
}

impl Palette for RandomPalette {
    fn color(&mut self, escape: &Escape) -> Rgba {
        if !escape.escaped {
            return BLACK;
        }
        let key = escape.magnitude.floor() as i64;
        let contrast = i64::from(self.contrast);
        let iterations = escape.iterations as i64;
        let rng = &mut self.rng;
        *self.cache.entry(key).or_insert_with(|| {
            // The original formula wraps an 8-bit alpha once the
            // product passes 255; we clamp to zero instead.
            let alpha = clamp(255 - contrast * iterations, 0, 255) as u8;
            Rgba(
                rng.gen_range(0, 255),
                rng.gen_range(0, 255),
                rng.gen_range(0, 255),
                alpha,
            )
        })
    }
}

/// The continuous model.  Escaping outcomes are bucketed on the
/// renormalized escape count, and each bucket is colored once with
/// the altered Bernstein polynomials, alpha fixed at full opacity.
/// Renormalization removes the banding that integer iteration counts
/// produce, which is the whole point of this model.
pub struct BernsteinPalette {
    limit: usize,
    cache: HashMap<i64, Rgba>,
}

impl BernsteinPalette {
    /// `limit` is the same iteration budget handed to the evaluator;
    /// the polynomials take the escape count as a fraction of it.
    pub fn new(limit: usize) -> BernsteinPalette {
        BernsteinPalette {
            limit,
            cache: HashMap::new(),
        }
    }
}

impl Palette for BernsteinPalette {
    fn color(&mut self, escape: &Escape) -> Rgba {
        if !escape.escaped {
            return BLACK;
        }
        let key = renormalize(escape);
        let iterations = escape.iterations;
        let limit = self.limit;
        *self
            .cache
            .entry(key)
            .or_insert_with(|| bernstein(iterations, limit))
    }
}

/// The renormalized escape count.  Escaped outcomes always have a
/// magnitude above 2, so the inner logarithm is safely above zero and
/// the outer one is defined.  The log term is truncated to an integer
/// before the subtraction, which keeps the cache keyed on integers
/// and its size bounded by the iteration budget.
fn renormalize(escape: &Escape) -> i64 {
    (escape.iterations as i64) + 1 - ((escape.magnitude.ln().ln() / LN_2) as i64)
}

/// Get continuous band RGB color using altered Bernstein polynomials.
/// All three channels vanish at both ends of the escape range, so the
/// set's border and its deepest surroundings both shade toward black.
fn bernstein(iterations: usize, limit: usize) -> Rgba {
    let t = clamp((iterations as f64) / (limit as f64), 0.0, 1.0);
    let r = 9.0 * (1.0 - t) * t * t * t * 255.0;
    let g = 15.0 * (1.0 - t) * (1.0 - t) * t * t * 255.0;
    let b = 8.5 * (1.0 - t) * (1.0 - t) * (1.0 - t) * t * 255.0;
    Rgba(channel(r), channel(g), channel(b), 255)
}

// Clamp first, truncate second.  The polynomials top out below 255,
// so the clamp is a guard rail, not a behavior change.
fn channel(value: f64) -> u8 {
    clamp(value, 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(iterations: usize, magnitude: f64) -> Escape {
        Escape {
            escaped: true,
            iterations,
            magnitude,
        }
    }

    fn bounded(iterations: usize) -> Escape {
        Escape {
            escaped: false,
            iterations,
            magnitude: 1.3,
        }
    }

    #[test]
    fn unescaped_points_are_black_in_both_models() {
        let mut discrete = RandomPalette::with_seed(15, 1);
        let mut smooth = BernsteinPalette::new(500);
        assert_eq!(discrete.color(&bounded(200)), BLACK);
        assert_eq!(smooth.color(&bounded(200)), BLACK);
    }

    #[test]
    fn discrete_alpha_tracks_the_iteration_count() {
        let mut palette = RandomPalette::with_seed(15, 1);
        assert_eq!(palette.color(&escaped(2, 3.5)).3, 255 - 15 * 2);
    }

    #[test]
    fn discrete_alpha_clamps_instead_of_wrapping() {
        // 15 * 100 is far past 255; the original would have wrapped.
        let mut palette = RandomPalette::with_seed(15, 1);
        assert_eq!(palette.color(&escaped(100, 3.5)).3, 0);
    }

    #[test]
    fn discrete_buckets_are_stable() {
        // Same whole magnitude, wildly different iteration counts:
        // the second lookup must return the first answer untouched,
        // alpha included.
        let mut palette = RandomPalette::with_seed(15, 7);
        let first = palette.color(&escaped(3, 3.2));
        let second = palette.color(&escaped(50, 3.9));
        assert_eq!(first, second);
    }

    #[test]
    fn seeded_palettes_reproduce() {
        let mut one = RandomPalette::with_seed(15, 42);
        let mut two = RandomPalette::with_seed(15, 42);
        assert_eq!(one.color(&escaped(5, 2.7)), two.color(&escaped(5, 2.7)));
    }

    #[test]
    fn renormalization_counts_whole_doublings() {
        // ln(ln(4)) / ln(2) is a little under a half, so nothing is
        // subtracted; ln(ln(16)) / ln(2) is a little under one and a
        // half, so one is.
        assert_eq!(renormalize(&escaped(5, 4.0)), 6);
        assert_eq!(renormalize(&escaped(5, 16.0)), 5);
    }

    #[test]
    fn smooth_buckets_are_stable() {
        // Both outcomes renormalize to the same bucket even though
        // their raw iteration counts differ, so the cached color from
        // the first must come back for the second.
        let mut palette = BernsteinPalette::new(500);
        let first = palette.color(&escaped(5, 4.0));
        let second = palette.color(&escaped(6, 16.0));
        assert_eq!(
            renormalize(&escaped(5, 4.0)),
            renormalize(&escaped(6, 16.0))
        );
        assert_eq!(first, second);
    }

    #[test]
    fn bernstein_channels_vanish_at_the_boundaries() {
        assert_eq!(bernstein(0, 500), Rgba(0, 0, 0, 255));
        assert_eq!(bernstein(500, 500), Rgba(0, 0, 0, 255));
    }

    #[test]
    fn bernstein_midpoint_is_pinned() {
        // t = 1/2: r = 9/16 * 255, g = 15/16 * 255, b = 8.5/16 * 255,
        // truncated.
        assert_eq!(bernstein(250, 500), Rgba(143, 239, 135, 255));
    }
}
