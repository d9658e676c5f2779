//! Sequential reference renderer.

use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::pixels::PixelBuffer;
use crate::renderer::{ShadowParams, ShadowRenderer};

/// Unoptimized single-threaded renderer with the same integer truncation
/// order as the parallel engine.
///
/// Every window is summed in full, with no saturation shortcut and no work
/// partitioning, over plain flat slices, so the two implementations share no
/// code. Kept to validate the optimized engine: for identical parameters the
/// outputs must match exactly. Not intended for production rendering.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceShadowRenderer {
    kernel_fn: fn(usize) -> Kernel,
}

impl ReferenceShadowRenderer {
    /// Reference renderer over a Gaussian kernel.
    pub fn gaussian() -> ReferenceShadowRenderer {
        ReferenceShadowRenderer {
            kernel_fn: Kernel::gaussian,
        }
    }

    /// Reference renderer over a uniform (box) kernel.
    pub fn uniform() -> ReferenceShadowRenderer {
        ReferenceShadowRenderer {
            kernel_fn: Kernel::uniform,
        }
    }
}

impl Default for ReferenceShadowRenderer {
    fn default() -> ReferenceShadowRenderer {
        ReferenceShadowRenderer::gaussian()
    }
}

impl ShadowRenderer for ReferenceShadowRenderer {
    fn create_shadow(
        &self,
        src: &PixelBuffer,
        dst: Option<PixelBuffer>,
        params: &ShadowParams,
    ) -> Result<PixelBuffer> {
        params.validate()?;
        let kernel = self.kernel(params);
        let k = kernel.radius();
        let weights = kernel.weights();
        let kernel_sum = kernel.sum();

        let src_w = src.width();
        let src_h = src.height();
        let dst_w = src_w + 2 * k;
        let dst_h = src_h + 2 * k;

        let mut dst = match dst {
            Some(dst) => {
                if dst.width() != dst_w || dst.height() != dst_h {
                    return Err(Error::SizeMismatch {
                        expected_width: dst_w,
                        expected_height: dst_h,
                        actual_width: dst.width(),
                        actual_height: dst.height(),
                    });
                }
                dst
            }
            None => PixelBuffer::new(dst_w, dst_h),
        };

        let mut opacity_lookup = [0u32; 256];
        for (alpha, slot) in opacity_lookup.iter_mut().enumerate() {
            *slot = ((alpha as f32 * params.opacity) as u32) << 24;
        }

        let src_px = src.as_slice();
        let mut work = vec![0u32; dst_w * dst_h];

        // Vertical pass over the columns that have a source column beneath
        // them; the rest of `work` stays zero.
        for dst_x in k..k + src_w {
            let src_x = dst_x - k;
            for dst_y in 0..dst_h {
                let top = dst_y as isize - 2 * k as isize;
                let mut sum = 0u32;
                for (j, &weight) in weights.iter().enumerate() {
                    let sy = top + j as isize;
                    if sy >= 0 && (sy as usize) < src_h {
                        sum += (src_px[sy as usize * src_w + src_x] >> 24) * weight;
                    }
                }
                work[dst_y * dst_w + dst_x] = sum / kernel_sum;
            }
        }

        // Horizontal pass, convolving each row from a private copy.
        let mut row = vec![0u32; dst_w];
        for dst_y in 0..dst_h {
            row.copy_from_slice(&work[dst_y * dst_w..(dst_y + 1) * dst_w]);
            for dst_x in 0..dst_w {
                let left = dst_x as isize - k as isize;
                let mut sum = 0u32;
                for (j, &weight) in weights.iter().enumerate() {
                    let sx = left + j as isize;
                    if sx >= 0 && (sx as usize) < dst_w {
                        sum += row[sx as usize] * weight;
                    }
                }
                work[dst_y * dst_w + dst_x] = opacity_lookup[(sum / kernel_sum) as usize];
            }
        }

        dst.as_mut_slice().copy_from_slice(&work);
        Ok(dst)
    }

    fn kernel(&self, params: &ShadowParams) -> Kernel {
        (self.kernel_fn)(params.kernel_radius())
    }
}
