//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a view window on the complex plane with an arbitrary pair of
//! corners defining the leftlower and rightupper corners of the
//! visible region.  Every pixel of the output image maps to exactly
//! one point of the window, and the mapping is linear in both axes,
//! so adjacent pixels land on adjacent points.  That monotonicity is
//! what keeps the rendered set visually continuous.
use num::Complex;

use errors::RenderError;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.  For that reason,
/// the lower-left-hand corner is not included.
#[derive(Copy, Clone, Debug)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Describes the x, y of a point in a region.  Yes, it's the exact
/// same. Names are important.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// We don't need a Point, as a single Complex number is a Point.

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex, real cartesian plane.  Maps pixels inside one to
/// points inside the other.  'leftlower' may seem ungrammatical, but
/// it fits with our x,y schema.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // The width and height of a single pixel, in plane units.
    scale: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the width and height of the integral plane,
    /// and two points describing the complex plane.  The corners must
    /// be strictly ordered and the resolution must be at least one
    /// pixel in both dimensions; everything downstream assumes both.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfiguration(
                "The output image must be at least one pixel in each dimension.".to_string(),
            ));
        }

        if rightupper.re <= leftlower.re {
            return Err(RenderError::InvalidConfiguration(
                "The left lower corner is not to the left of the right upper corner.".to_string(),
            ));
        }

        if rightupper.im <= leftlower.im {
            return Err(RenderError::InvalidConfiguration(
                "The left lower corner is not lower than the right upper corner.".to_string(),
            ));
        }

        // The total size of the region.
        let region_width = rightupper.re - leftlower.re;
        let region_height = rightupper.im - leftlower.im;

        // How much of the region one pixel covers.  Multiply a pixel
        // coordinate by these and offset by the leftlower corner to
        // get the corresponding point.
        let scale = (
            region_width / (width as f64),
            region_height / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(leftlower, rightupper),
            scale,
        })
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, map that to the
    /// corresponding point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            (pixel.0 as f64) * self.scale.0 + self.complex_plane.0.re,
            (pixel.1 as f64) * self.scale.1 + self.complex_plane.0.im,
        )
    }

    /// The width and height of a single pixel, in plane units.  The
    /// super-sampler jitters its sub-samples within this box, so every
    /// draw stays inside the pixel being averaged.
    pub fn pixel_size(&self) -> (f64, f64) {
        self.scale
    }
}
