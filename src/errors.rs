//! The error taxonomy, which is short because the escape-time math is
//! total over its input domain: once a configuration has been
//! validated, nothing on the pixel path can fail.

/// Everything that can go wrong setting up or running a render.  All
/// of these are detected before any pixel work begins; a render either
/// completes the full grid or aborts without producing output.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The resolution, iteration budget, thread count, or view window
    /// handed to the renderer was degenerate.
    #[fail(display = "invalid render configuration: {}", _0)]
    InvalidConfiguration(String),

    /// Zero sub-samples were requested for super-sampling, or an
    /// empty sample set was handed to the averaging step.
    #[fail(display = "super-sampling requires at least one sample per pixel")]
    InvalidSampleCount,
}
