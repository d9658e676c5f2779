//! Box shadow renderer.

use crate::error::Result;
use crate::kernel::Kernel;
use crate::pixels::PixelBuffer;
use crate::renderer::{render_with_kernel, ShadowParams, ShadowRenderer};

/// Blurs the shadow with a uniform kernel.
///
/// Cheaper to construct than the Gaussian and noticeably blockier; runs on
/// the same two-pass engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxShadowRenderer;

impl ShadowRenderer for BoxShadowRenderer {
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
        Kernel::uniform(params.kernel_radius())
    }
}
