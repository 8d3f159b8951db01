// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render loops.  A render sweeps the pixel grid, maps each pixel
//! to its point on the complex plane, classifies the point with the
//! escape-time evaluator, asks the palette for a color, and writes
//! the color into a row-major RGBA buffer.  With super-sampling
//! switched on, each pixel instead averages several jittered
//! sub-samples.
//!
//! Every pixel is independent of every other, which makes the
//! threaded variant almost embarrassingly simple: workers pull whole
//! rows off a shared queue and write into disjoint slices of the one
//! buffer.  The only genuinely shared mutable state is the palette's
//! memo cache, which sits behind a mutex so that the first thread to
//! color a bucket wins and everyone after reads a stable value.

use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::{Arc, Mutex};

use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use num::Complex;

use errors::RenderError;
use escape::evaluate;
use palette::{Palette, Rgba};
use planes::{IntegralPlane, Pixel, PlaneMapper};
use sampler::{average, Supersampler};

type RowQueue<'a> = Arc<Mutex<Enumerate<ChunksMut<'a, u8>>>>;

/// Takes a plane, an iteration budget, and optionally a sub-sample
/// count, and renders the Mandelbrot set into an RGBA buffer, one
/// color per pixel, row-major, top to bottom and left to right.
/// Once built, the renderer is immutable; the same renderer can run
/// any number of renders with any palette.
pub struct Renderer {
    plane: PlaneMapper,
    limit: usize,
    samples: Option<usize>,
    seed: Option<u64>,
}

impl Renderer {
    /// Requires the width and height of the image, the left-lower and
    /// right-upper corners of the complex plane where the render will
    /// take place, and the number of iterations to perform on a
    /// per-point basis.  Degenerate values are refused here, before
    /// any pixel work.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
        limit: usize,
    ) -> Result<Renderer, RenderError> {
        if limit == 0 {
            return Err(RenderError::InvalidConfiguration(
                "At least one iteration per point is required.".to_string(),
            ));
        }
        let plane = PlaneMapper::new(width, height, leftlower, rightupper)?;
        Ok(Renderer {
            plane,
            limit,
            samples: None,
            seed: None,
        })
    }

    /// Switch on the super-sampled strategy: `count` jittered
    /// sub-samples per pixel, averaged.  Zero samples is refused.
    pub fn supersampled(mut self, count: usize) -> Result<Renderer, RenderError> {
        if count == 0 {
            return Err(RenderError::InvalidSampleCount);
        }
        self.samples = Some(count);
        Ok(self)
    }

    /// Pin the jitter seed, so a super-sampled render can be
    /// reproduced byte for byte.  Worker k derives its own stream
    /// from seed + k; the single-threaded path uses worker zero's.
    pub fn seeded(mut self, seed: u64) -> Renderer {
        self.seed = Some(seed);
        self
    }

    fn build_sampler(&self, seed: Option<u64>) -> Result<Option<Supersampler>, RenderError> {
        match self.samples {
            None => Ok(None),
            Some(count) => {
                let pixel = self.plane.pixel_size();
                let sampler = match seed {
                    Some(seed) => Supersampler::with_seed(count, pixel, seed)?,
                    None => Supersampler::new(count, pixel)?,
                };
                Ok(Some(sampler))
            }
        }
    }

    fn shade<P>(
        &self,
        point: Complex<f64>,
        palette: &mut P,
        sampler: &mut Option<Supersampler>,
    ) -> Result<Rgba, RenderError>
    where
        P: Palette,
    {
        match sampler.as_mut() {
            Some(sampler) => average(&sampler.sample(point, self.limit, palette)),
            None => Ok(palette.color(&evaluate(&point, self.limit))),
        }
    }

    /// The main function for single-threaded renders.  Sweeps the
    /// grid row by row and colors every pixel in turn.
    pub fn render_single<P>(&self, palette: &mut P) -> Result<Vec<u8>, RenderError>
    where
        P: Palette,
    {
        let IntegralPlane(width, height) = self.plane.integral_plane;
        let mut buffer = vec![0 as u8; self.plane.len() * 4];
        let mut sampler = self.build_sampler(self.seed)?;
        for (row, column) in iproduct!(0..height, 0..width) {
            let point = self.plane.pixel_to_point(&Pixel(column, row));
            let color = self.shade(point, palette, &mut sampler)?;
            let offset = (row * width + column) * 4;
            buffer[offset] = color.0;
            buffer[offset + 1] = color.1;
            buffer[offset + 2] = color.2;
            buffer[offset + 3] = color.3;
        }
        Ok(buffer)
    }

    /// A multi-threaded version of the render function that takes a
    /// thread count as an option.  Rows are handed out through a
    /// mutex-guarded queue; each worker owns the rows it pops, so
    /// every pixel is written exactly once.
    pub fn render<P>(&self, palette: &mut P, threads: usize) -> Result<Vec<u8>, RenderError>
    where
        P: Palette + Send,
    {
        if threads == 0 {
            return Err(RenderError::InvalidConfiguration(
                "At least one render thread is required.".to_string(),
            ));
        }
        let IntegralPlane(width, _) = self.plane.integral_plane;
        let mut buffer = vec![0 as u8; self.plane.len() * 4];
        let palette = Mutex::new(palette);
        crossbeam::scope(|spawner| -> Result<(), RenderError> {
            let rows: RowQueue = Arc::new(Mutex::new(buffer.chunks_mut(width * 4).enumerate()));
            let palette = &palette;
            let handles: Vec<ScopedJoinHandle<Result<(), RenderError>>> = (0..threads)
                .map(|thread| {
                    let rows = rows.clone();
                    let seed = self.seed.map(|seed| seed.wrapping_add(thread as u64));
                    spawner.spawn(move |_| {
                        let mut sampler = self.build_sampler(seed)?;
                        loop {
                            let row = { rows.lock().unwrap().next() };
                            match row {
                                Some((row, line)) => {
                                    self.shade_row(row, line, palette, &mut sampler)?;
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        Ok(())
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap()?;
            }
            Ok(())
        })
        .unwrap()?;
        Ok(buffer)
    }

    fn shade_row<P>(
        &self,
        row: usize,
        line: &mut [u8],
        palette: &Mutex<&mut P>,
        sampler: &mut Option<Supersampler>,
    ) -> Result<(), RenderError>
    where
        P: Palette,
    {
        let IntegralPlane(width, _) = self.plane.integral_plane;
        for column in 0..width {
            let point = self.plane.pixel_to_point(&Pixel(column, row));
            let color = match sampler.as_mut() {
                Some(sampler) => {
                    let mut palette = palette.lock().unwrap();
                    average(&sampler.sample(point, self.limit, &mut **palette))?
                }
                None => {
                    // Iterating the point is the expensive part; keep
                    // it outside the lock.
                    let escape = evaluate(&point, self.limit);
                    palette.lock().unwrap().color(&escape)
                }
            };
            let offset = column * 4;
            line[offset] = color.0;
            line[offset + 1] = color.1;
            line[offset + 2] = color.2;
            line[offset + 3] = color.3;
        }
        Ok(())
    }
}
