//! The escape-time iteration at the heart of the renderer.  A point
//! belongs to the Mandelbrot set if iterating v = v*v + c from zero
//! never drives the magnitude of v past the escape radius of 2.  We
//! can't iterate forever, so a point that survives the iteration
//! budget is declared a member, and a point that escapes reports how
//! long it held out and how hard it left.

use num::Complex;

/// The outcome of iterating a single point of the complex plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// True if the point's magnitude exceeded the escape radius
    /// before the iteration budget ran out.
    pub escaped: bool,
    /// The number of iterations completed before escaping, or the
    /// full budget for points that never escaped.
    pub iterations: usize,
    /// The true magnitude of the iterated value at the moment the
    /// loop stopped.  The continuous coloring model feeds this to a
    /// pair of logarithms, which is why the square root is taken here
    /// rather than leaving the squared magnitude.
    pub magnitude: f64,
}

/// This is our classic iterator function.  The in-loop test compares
/// the squared magnitude against 4, which spares the hot loop a
/// square root; the square root is only taken once, on the way out.
/// The comparison is strict: a point sitting at a magnitude of
/// exactly 2 has not escaped.
pub fn evaluate(point: &Complex<f64>, limit: usize) -> Escape {
    let mut v = Complex {
        re: 0.0_f64,
        im: 0.0_f64,
    };
    for n in 0..limit {
        v = v * v + point;
        if v.norm_sqr() > 4.0_f64 {
            return Escape {
                escaped: true,
                iterations: n,
                magnitude: v.norm(),
            };
        }
    }
    Escape {
        escaped: false,
        iterations: limit,
        magnitude: v.norm(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_origin_never_escapes() {
        let outcome = evaluate(&Complex::new(0.0, 0.0), 1000);
        assert!(!outcome.escaped);
        assert_eq!(outcome.iterations, 1000);
        assert!(outcome.magnitude <= 2.0);
    }

    #[test]
    fn a_far_point_escapes_on_the_first_iteration() {
        let outcome = evaluate(&Complex::new(2.0, 2.0), 500);
        assert!(outcome.escaped);
        assert_eq!(outcome.iterations, 0);
        assert!((outcome.magnitude - 8.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn a_magnitude_of_exactly_two_is_bounded() {
        // c = -2 lands on 2 and stays there forever, and 2 is not
        // past the escape radius.
        let outcome = evaluate(&Complex::new(-2.0, 0.0), 100);
        assert!(!outcome.escaped);
        assert_eq!(outcome.iterations, 100);
    }

    #[test]
    fn a_known_interior_point_is_bounded() {
        let outcome = evaluate(&Complex::new(-1.0, 0.0), 10000);
        assert!(!outcome.escaped);
    }

    #[test]
    fn the_iteration_count_never_exceeds_the_budget() {
        for limit in &[1, 2, 10, 100] {
            for point in &[
                Complex::new(0.0, 0.0),
                Complex::new(-0.75, 0.1),
                Complex::new(0.3, 0.6),
                Complex::new(2.0, 2.0),
            ] {
                let outcome = evaluate(point, *limit);
                assert!(outcome.iterations <= *limit);
            }
        }
    }
}
