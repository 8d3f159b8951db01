#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot takes a point on the complex plane and repeatedly
//! multiplies it by itself, measuring how quickly that number goes to
//! infinity.  This "velocity" is the number used to render the image:
//! points that never get away are painted black, and points that do
//! are painted according to how long they held out.
//!
//! Two coloring models are provided.  The discrete model invents a
//! random color for every whole-number magnitude bucket the first time
//! an escaping point lands in it, which produces the classic garish
//! contour bands.  The continuous model renormalizes the escape count
//! with a log-log correction so the bands melt into smooth gradients,
//! and colors them with a trio of Bernstein polynomials.  Both models
//! memoize their answers, so every pixel that lands in a bucket gets
//! the same color as the first one that did.
//!
//! Rendering is a batch, single-pass affair: map every pixel of the
//! output image to a point inside the view window, iterate it, color
//! it, and hand the finished RGBA buffer to an encoder.  An optional
//! super-sampling pass averages several randomly jittered sub-samples
//! per pixel to knock the aliasing off the set's boundary.

extern crate crossbeam;
extern crate itertools;
extern crate num;
extern crate rand;
#[macro_use]
extern crate failure;

pub mod errors;
pub mod escape;
pub mod palette;
pub mod planes;
pub mod renderer;
pub mod sampler;

pub use errors::RenderError;
pub use escape::{evaluate, Escape};
pub use palette::{BernsteinPalette, Palette, RandomPalette, Rgba, BLACK};
pub use planes::{Pixel, PlaneMapper};
pub use renderer::Renderer;
pub use sampler::{average, Supersampler};
