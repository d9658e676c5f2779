//! WebAssembly exports for shadow rendering.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat row-major arrays of packed ARGB u32 values plus
//! explicit dimensions; the returned mask measures
//! `(width + 2k) x (height + 2k)` where `k` is [`kernel_radius_wasm`] of the
//! requested radius.
//!
//! Rayon falls back to in-place sequential execution on targets without
//! threads, so the same engine runs unchanged here.

use wasm_bindgen::prelude::*;

use crate::pixels::PixelBuffer;
use crate::renderer::{
    BoxShadowRenderer, DoubleBoxShadowRenderer, GaussianShadowRenderer, ShadowParams,
    ShadowRenderer,
};

/// Render a Gaussian drop-shadow mask.
///
/// # Arguments
/// * `pixels` - Flat ARGB u32 array (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `radius` - Blur radius in pixels
/// * `opacity` - Shadow opacity (0.0-1.0)
///
/// # Returns
/// Flat ARGB u32 array of the enlarged shadow mask; only alpha is populated.
#[wasm_bindgen]
pub fn gaussian_shadow_wasm(
    pixels: &[u32],
    width: usize,
    height: usize,
    radius: f32,
    opacity: f32,
) -> Vec<u32> {
    let src = PixelBuffer::from_vec(width, height, pixels.to_vec()).expect("Invalid dimensions");
    GaussianShadowRenderer
        .create_shadow(&src, None, &ShadowParams::new(radius, opacity))
        .expect("Invalid shadow parameters")
        .into_vec()
}

/// Render a box-blurred drop-shadow mask.
#[wasm_bindgen]
pub fn box_shadow_wasm(
    pixels: &[u32],
    width: usize,
    height: usize,
    radius: f32,
    opacity: f32,
) -> Vec<u32> {
    let src = PixelBuffer::from_vec(width, height, pixels.to_vec()).expect("Invalid dimensions");
    BoxShadowRenderer
        .create_shadow(&src, None, &ShadowParams::new(radius, opacity))
        .expect("Invalid shadow parameters")
        .into_vec()
}

/// Render a drop-shadow mask using the double-box Gaussian approximation.
#[wasm_bindgen]
pub fn double_box_shadow_wasm(
    pixels: &[u32],
    width: usize,
    height: usize,
    radius: f32,
    opacity: f32,
) -> Vec<u32> {
    let src = PixelBuffer::from_vec(width, height, pixels.to_vec()).expect("Invalid dimensions");
    DoubleBoxShadowRenderer
        .create_shadow(&src, None, &ShadowParams::new(radius, opacity))
        .expect("Invalid shadow parameters")
        .into_vec()
}

/// The integer kernel radius a blur radius maps to; the shadow mask is
/// enlarged by this amount on every side.
#[wasm_bindgen]
pub fn kernel_radius_wasm(radius: f32) -> usize {
    ShadowParams::new(radius, 1.0).kernel_radius()
}
