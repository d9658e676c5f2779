//! Double-box shadow renderer.

use crate::error::Result;
use crate::kernel::Kernel;
use crate::pixels::PixelBuffer;
use crate::renderer::{render_with_kernel, ShadowParams, ShadowRenderer};

/// Approximates a Gaussian blur with two successive box blurs.
///
/// The requested integer radius `R` splits into `r1 = R / 2` and
/// `r2 = R - r1`; the engine runs once per sub-radius, with the caller's
/// opacity applied only on the second application. Total padding is `2 * R`
/// per axis, the same as the single-kernel renderers, and [`Self::kernel`]
/// reports the composed trapezoid kernel of radius `R` so buffer sizing
/// agrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleBoxShadowRenderer;

fn split_radius(radius: usize) -> (usize, usize) {
    let r1 = radius / 2;
    (r1, radius - r1)
}

impl ShadowRenderer for DoubleBoxShadowRenderer {
    fn create_shadow(
        &self,
        src: &PixelBuffer,
        dst: Option<PixelBuffer>,
        params: &ShadowParams,
    ) -> Result<PixelBuffer> {
        params.validate()?;
        let (r1, r2) = split_radius(params.kernel_radius());

        if r1 == 0 {
            // Radius 0 or 1: a single box pass covers the whole request.
            return render_with_kernel(src, dst, &Kernel::uniform(r2), params.opacity);
        }

        // First application at opacity 1.0; the intermediate's alpha byte is
        // the second application's source.
        let inner = render_with_kernel(src, None, &Kernel::uniform(r1), 1.0)?;
        render_with_kernel(&inner, dst, &Kernel::uniform(r2), params.opacity)
    }

    fn kernel(&self, params: &ShadowParams) -> Kernel {
        let (r1, r2) = split_radius(params.kernel_radius());
        Kernel::compose(&Kernel::uniform(r1), &Kernel::uniform(r2))
    }
}
