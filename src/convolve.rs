//! Two-pass separable convolution over the alpha channel.
//!
//! The blur runs as a vertical pass followed by a horizontal pass, both using
//! the same 1-D kernel. The vertical pass reads source alpha and writes
//! unscaled 0-255 partial results into the destination; the horizontal pass
//! re-reads those rows, convolves again, applies the opacity lookup table and
//! packs the final value into the alpha byte of the destination pixel. RGB
//! channels stay zero.
//!
//! ## Parallelism
//!
//! Each pass is partitioned into strips of [`STRIP`] contiguous destination
//! columns (vertical) or rows (horizontal) and dispatched on the rayon pool
//! via `axis_chunks_iter_mut`. Strips write disjoint regions, so no locking
//! is needed; the only synchronization is the join at the end of each pass.
//! The horizontal pass reads columns written by many different vertical
//! strips, so it is not submitted until the vertical pass has fully joined.
//!
//! All arithmetic is integer, so output is byte-identical across runs and
//! thread counts.

use std::panic::{self, AssertUnwindSafe};

use ndarray::{ArrayView2, Axis};
use ndarray::parallel::prelude::*;

use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::pixels::PixelBuffer;

/// Columns (or rows) per independently scheduled work unit.
pub(crate) const STRIP: usize = 16;

/// Per-invocation convolution state.
///
/// Holds read-only views of the source and kernel plus the precomputed
/// opacity table; never shared across invocations.
pub(crate) struct Convolution<'a> {
    src: ArrayView2<'a, u32>,
    weights: &'a [u32],
    kernel_sum: u32,
    k: usize,
    /// `table[v] = ((v * opacity) as u32) << 24`: raw blurred alpha to
    /// opacity-scaled alpha, pre-shifted into the alpha byte position.
    opacity_lookup: [u32; 256],
}

impl<'a> Convolution<'a> {
    pub(crate) fn new(src: &'a PixelBuffer, kernel: &'a Kernel, opacity: f32) -> Convolution<'a> {
        let mut opacity_lookup = [0u32; 256];
        for (alpha, slot) in opacity_lookup.iter_mut().enumerate() {
            *slot = ((alpha as f32 * opacity) as u32) << 24;
        }
        Convolution {
            src: src.view(),
            weights: kernel.weights(),
            kernel_sum: kernel.sum(),
            k: kernel.radius(),
            opacity_lookup,
        }
    }

    /// Run both passes over `dst`, which must already be sized
    /// `source + 2k` per axis.
    ///
    /// A panic on any worker is caught at the pass boundary and surfaced as
    /// [`Error::Worker`]; the partially written destination never escapes
    /// because the caller drops it on error.
    pub(crate) fn run(&self, dst: &mut PixelBuffer) -> Result<()> {
        catch_worker(|| self.vertical_pass(dst))?;
        // Full barrier: every column above is finished before any row starts.
        catch_worker(|| self.horizontal_pass(dst))?;
        Ok(())
    }

    /// Vertical pass: for every destination column, the weighted sum of a
    /// `2k+1`-tall window of source alpha, divided by the kernel sum, stored
    /// unscaled at the same `(x, y)`.
    ///
    /// Off-source taps contribute 0 while the divisor stays the full kernel
    /// sum, so the blur falls off to zero at the image edge instead of
    /// clamping to it.
    pub(crate) fn vertical_pass(&self, dst: &mut PixelBuffer) {
        let (src_h, src_w) = self.src.dim();
        let dst_h = dst.height();
        let weights = self.weights;
        let taps = weights.len();
        let k = self.k;
        let kernel_sum = self.kernel_sum;
        let max_sum = kernel_sum * 255;

        dst.view_mut()
            .axis_chunks_iter_mut(Axis(1), STRIP)
            .into_par_iter()
            .enumerate()
            .for_each(|(strip_idx, mut strip)| {
                for col in 0..strip.ncols() {
                    let dst_x = strip_idx * STRIP + col;

                    // No source column underneath and the window never
                    // reaches one: stays fully transparent. Filled
                    // explicitly so reused destination buffers behave like
                    // fresh ones.
                    if dst_x < k || dst_x >= k + src_w {
                        strip.column_mut(col).fill(0);
                        continue;
                    }
                    let src_x = dst_x - k;

                    let mut prev_sum: Option<u32> = None;
                    for dst_y in 0..dst_h {
                        // Leading tap: the bottom edge of the window, source
                        // row `dst_y`.
                        let mut w = if dst_y < src_h {
                            self.src[[dst_y, src_x]] >> 24
                        } else {
                            0
                        };

                        if prev_sum == Some(0) && w == 0 {
                            // still inside a fully transparent run
                        } else if prev_sum == Some(max_sum) && w == 255 {
                            // still inside a fully opaque run
                        } else {
                            let top = dst_y as isize - 2 * k as isize;
                            let mut sum = w * weights[taps - 1];
                            for (j, &weight) in weights[..taps - 1].iter().enumerate() {
                                let sy = top + j as isize;
                                if sy >= 0 && (sy as usize) < src_h {
                                    sum += (self.src[[sy as usize, src_x]] >> 24) * weight;
                                }
                            }
                            prev_sum = Some(sum);
                            w = sum / kernel_sum;
                        }

                        strip[[dst_y, col]] = w;
                    }
                }
            });
    }

    /// Horizontal pass: convolve each destination row in place, then map the
    /// result through the opacity table into the alpha byte.
    ///
    /// The pass overwrites the row it reads, so each row is copied into a
    /// private buffer first.
    pub(crate) fn horizontal_pass(&self, dst: &mut PixelBuffer) {
        let dst_w = dst.width();
        let weights = self.weights;
        let taps = weights.len();
        let k = self.k;
        let kernel_sum = self.kernel_sum;
        let max_sum = kernel_sum * 255;

        dst.view_mut()
            .axis_chunks_iter_mut(Axis(0), STRIP)
            .into_par_iter()
            .for_each(|mut strip| {
                let mut row_copy = vec![0u32; dst_w];
                for mut row in strip.rows_mut() {
                    for (copy, &v) in row_copy.iter_mut().zip(row.iter()) {
                        *copy = v;
                    }

                    let mut prev_sum: Option<u32> = None;
                    for dst_x in 0..dst_w {
                        let lead = dst_x + k;
                        let mut w = if lead < dst_w { row_copy[lead] } else { 0 };

                        if prev_sum == Some(0) && w == 0 {
                            // still inside a fully transparent run
                        } else if prev_sum == Some(max_sum) && w == 255 {
                            // still inside a fully opaque run
                        } else {
                            let left = dst_x as isize - k as isize;
                            let mut sum = w * weights[taps - 1];
                            for (j, &weight) in weights[..taps - 1].iter().enumerate() {
                                let sx = left + j as isize;
                                if sx >= 0 && (sx as usize) < dst_w {
                                    sum += row_copy[sx as usize] * weight;
                                }
                            }
                            prev_sum = Some(sum);
                            w = sum / kernel_sum;
                        }

                        row[dst_x] = self.opacity_lookup[w as usize];
                    }
                }
            });
    }
}

/// Run a pass, converting a worker panic into [`Error::Worker`].
///
/// Rayon resumes a worker panic on the submitting thread, so catching here
/// covers every strip of the pass.
fn catch_worker<F: FnOnce()>(pass: F) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(pass)).map_err(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Error::Worker(msg)
    })
}
