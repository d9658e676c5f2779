//! Shadow renderers.
//!
//! A renderer binds a kernel shape to the generic two-pass convolution
//! engine. All variants share the same contract:
//!
//! | Renderer | Kernel | Notes |
//! |----------|--------|-------|
//! | [`GaussianShadowRenderer`] | quantized Gaussian bell | the default look |
//! | [`BoxShadowRenderer`] | uniform | cheapest to construct |
//! | [`DoubleBoxShadowRenderer`] | uniform, applied twice | box-based Gaussian approximation |
//! | [`ReferenceShadowRenderer`] | configurable | sequential, unoptimized; validation only |
//!
//! The destination is always `source + 2 * kernel radius` per axis and holds
//! only alpha; RGB stays zero.

mod box_shadow;
mod double_box;
mod gaussian;
mod reference;

pub use box_shadow::BoxShadowRenderer;
pub use double_box::DoubleBoxShadowRenderer;
pub use gaussian::GaussianShadowRenderer;
pub use reference::ReferenceShadowRenderer;

use crate::convolve::Convolution;
use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::pixels::PixelBuffer;

/// User-facing shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    /// Requested blur radius in pixels. Each renderer maps it to an integer
    /// kernel radius (rounding up, so the shadow never under-covers).
    pub radius: f32,
    /// Opacity multiplier applied to the blurred alpha, 0.0 to 1.0.
    pub opacity: f32,
}

impl ShadowParams {
    pub fn new(radius: f32, opacity: f32) -> ShadowParams {
        ShadowParams { radius, opacity }
    }

    /// The integer kernel radius this request maps to.
    pub fn kernel_radius(&self) -> usize {
        self.radius.ceil() as usize
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "shadow radius {} must be finite and non-negative",
                self.radius
            )));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(Error::InvalidParameter(format!(
                "shadow opacity {} must be within 0.0..=1.0",
                self.opacity
            )));
        }
        Ok(())
    }
}

/// Renders a blurred, opacity-scaled silhouette of a source image's alpha
/// channel.
pub trait ShadowRenderer {
    /// Blur the source's alpha channel into a destination buffer and return
    /// it.
    ///
    /// When `dst` is `None` a correctly sized buffer is allocated; a supplied
    /// buffer must measure exactly `source + 2 * kernel radius` per axis or
    /// the call fails with [`Error::SizeMismatch`]. On any error the
    /// destination is discarded; a partially blurred buffer is never
    /// returned.
    fn create_shadow(
        &self,
        src: &PixelBuffer,
        dst: Option<PixelBuffer>,
        params: &ShadowParams,
    ) -> Result<PixelBuffer>;

    /// The kernel this renderer would use for `params`.
    ///
    /// Pure; callers can use `kernel(params).radius()` to size a destination
    /// buffer before rendering.
    fn kernel(&self, params: &ShadowParams) -> Kernel;
}

/// Size (or size-check) the destination and run the two-pass engine.
///
/// The shared funnel for every engine-backed renderer.
pub(crate) fn render_with_kernel(
    src: &PixelBuffer,
    dst: Option<PixelBuffer>,
    kernel: &Kernel,
    opacity: f32,
) -> Result<PixelBuffer> {
    let k = kernel.radius();
    let dst_width = src.width() + 2 * k;
    let dst_height = src.height() + 2 * k;

    let mut dst = match dst {
        Some(dst) => {
            if dst.width() != dst_width || dst.height() != dst_height {
                return Err(Error::SizeMismatch {
                    expected_width: dst_width,
                    expected_height: dst_height,
                    actual_width: dst.width(),
                    actual_height: dst.height(),
                });
            }
            dst
        }
        None => PixelBuffer::new(dst_width, dst_height),
    };

    log::debug!(
        "rendering {dst_width}x{dst_height} shadow from {}x{} source, kernel radius {k}",
        src.width(),
        src.height(),
    );

    Convolution::new(src, kernel, opacity).run(&mut dst)?;
    Ok(dst)
}
