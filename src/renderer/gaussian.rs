//! Gaussian shadow renderer.

use crate::error::Result;
use crate::kernel::Kernel;
use crate::pixels::PixelBuffer;
use crate::renderer::{render_with_kernel, ShadowParams, ShadowRenderer};

/// Blurs the shadow with a quantized Gaussian kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianShadowRenderer;

impl ShadowRenderer for GaussianShadowRenderer {
    fn create_shadow(
        &self,
        src: &PixelBuffer,
        dst: Option<PixelBuffer>,
        params: &ShadowParams,
    ) -> Result<PixelBuffer> {
        params.validate()?;
        render_with_kernel(src, dst, &self.kernel(params), params.opacity)
    }

    fn kernel(&self, params: &ShadowParams) -> Kernel {
        Kernel::gaussian(params.kernel_radius())
    }
}
