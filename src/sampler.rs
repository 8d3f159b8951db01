//! Super-sampling.  One sample per pixel makes for a crunchy border,
//! because the set's boundary wiggles at every scale and a pixel is a
//! box, not a point.  Drawing several randomly jittered sub-samples
//! inside the pixel's box and averaging the resulting colors trades a
//! constant factor of work for a much calmer image.

use num::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;
use rand::rngs::StdRng;

use errors::RenderError;
use escape::evaluate;
use palette::{Palette, Rgba};

/// Draws jittered sub-samples for one output pixel at a time.  The
/// jitter is uniform over one pixel's width and height in plane
/// units, so every draw stays inside the pixel being averaged, and
/// every invocation makes fresh draws.
pub struct Supersampler {
    count: usize,
    jitter_re: Uniform<f64>,
    jitter_im: Uniform<f64>,
    rng: StdRng,
}

impl Supersampler {
    /// Requires the number of sub-samples per pixel and one pixel's
    /// width and height in plane units.  Zero samples is refused here,
    /// before any averaging can trip over it.
    pub fn new(count: usize, pixel: (f64, f64)) -> Result<Supersampler, RenderError> {
        Supersampler::from_rng(count, pixel, StdRng::from_entropy())
    }

    /// The same, with a caller-chosen seed so the jitter pattern can
    /// be reproduced.
    pub fn with_seed(count: usize, pixel: (f64, f64), seed: u64) -> Result<Supersampler, RenderError> {
        Supersampler::from_rng(count, pixel, StdRng::seed_from_u64(seed))
    }

    fn from_rng(count: usize, pixel: (f64, f64), rng: StdRng) -> Result<Supersampler, RenderError> {
        if count == 0 {
            return Err(RenderError::InvalidSampleCount);
        }
        Ok(Supersampler {
            count,
            jitter_re: Uniform::new(0.0, pixel.0),
            jitter_im: Uniform::new(0.0, pixel.1),
            rng,
        })
    }

    /// Generate color samples for the output pixel whose left-lower
    /// corner maps to `point`: perturb the point within one pixel's
    /// box, iterate it, color it, collect.
    pub fn sample<P>(&mut self, point: Complex<f64>, limit: usize, palette: &mut P) -> Vec<Rgba>
    where
        P: Palette,
    {
        let mut samples = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let c = Complex::new(
                point.re + self.jitter_re.sample(&mut self.rng),
                point.im + self.jitter_im.sample(&mut self.rng),
            );
            samples.push(palette.color(&evaluate(&c, limit)));
        }
        samples
    }
}

/// Get the average color from the slice of colors.  Channels are
/// summed in 32 bits so nothing rounds before the division, and the
/// division truncates: the average of 255 and 0 is 127.  An empty
/// slice is an error, not a division by zero.
pub fn average(samples: &[Rgba]) -> Result<Rgba, RenderError> {
    if samples.is_empty() {
        return Err(RenderError::InvalidSampleCount);
    }
    let mut r_tot = 0_u32;
    let mut g_tot = 0_u32;
    let mut b_tot = 0_u32;
    let mut a_tot = 0_u32;
    for sample in samples {
        r_tot += u32::from(sample.0);
        g_tot += u32::from(sample.1);
        b_tot += u32::from(sample.2);
        a_tot += u32::from(sample.3);
    }
    let length = samples.len() as u32;
    Ok(Rgba(
        (r_tot / length) as u8,
        (g_tot / length) as u8,
        (b_tot / length) as u8,
        (a_tot / length) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{BernsteinPalette, RandomPalette, BLACK};

    #[test]
    fn average_of_red_and_blue_is_pinned() {
        let samples = [Rgba(255, 0, 0, 255), Rgba(0, 0, 255, 255)];
        assert_eq!(average(&samples).unwrap(), Rgba(127, 0, 127, 255));
    }

    #[test]
    fn average_of_one_is_the_identity() {
        let samples = [Rgba(9, 18, 27, 36)];
        assert_eq!(average(&samples).unwrap(), Rgba(9, 18, 27, 36));
    }

    #[test]
    fn average_of_nothing_is_an_error() {
        assert_eq!(average(&[]), Err(RenderError::InvalidSampleCount));
    }

    #[test]
    fn zero_samples_are_refused() {
        assert!(Supersampler::new(0, (0.1, 0.1)).is_err());
    }

    #[test]
    fn the_sample_count_is_honored() {
        let mut palette = RandomPalette::with_seed(15, 3);
        let mut sampler = Supersampler::with_seed(5, (0.001, 0.001), 9).unwrap();
        let samples = sampler.sample(Complex::new(0.0, 0.0), 200, &mut palette);
        assert_eq!(samples.len(), 5);
    }

    #[test]
    fn one_sample_of_a_deep_interior_pixel_matches_the_direct_path() {
        // Every point within a thousandth of the origin is deep
        // inside the set, so the jittered sample and the unjittered
        // evaluation must both come back black.
        let mut palette = BernsteinPalette::new(200);
        let point = Complex::new(0.0, 0.0);
        let direct = palette.color(&evaluate(&point, 200));
        let mut sampler = Supersampler::with_seed(1, (0.001, 0.001), 11).unwrap();
        let sampled = average(&sampler.sample(point, 200, &mut palette)).unwrap();
        assert_eq!(direct, BLACK);
        assert_eq!(sampled, direct);
    }
}
