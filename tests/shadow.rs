//! Cross-renderer properties of the shadow engine.
//!
//! The optimized parallel engine is held against the sequential reference
//! renderer (identical integer arithmetic, so outputs must match exactly,
//! which also proves the saturation shortcut and the strip partitioning
//! change nothing) and against a double-precision separable convolution
//! (tolerance 1 per pixel, from the truncation the integer pipeline
//! performs between passes).

use umbra::{
    BoxShadowRenderer, DoubleBoxShadowRenderer, Error, GaussianShadowRenderer, Kernel,
    PixelBuffer, ReferenceShadowRenderer, ShadowParams, ShadowRenderer,
};

/// Deterministic 300x100 test image: a soft-edged disc, a translucent-framed
/// opaque block and a band of pseudo-random noise, all away from the borders.
/// RGB bits carry junk so the tests also prove only the alpha byte is read.
fn test_image() -> PixelBuffer {
    let (width, height) = (300usize, 100usize);
    let mut img = PixelBuffer::new(width, height);
    let mut seed = 0x2F6E_2B1Fu32;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 - 60.0;
            let dy = y as f64 - 50.0;
            let disc = ((35.0 - (dx * dx + dy * dy).sqrt()) * 64.0).clamp(0.0, 255.0) as u32;

            let block = if (130..190).contains(&x) && (30..70).contains(&y) {
                255
            } else if (120..200).contains(&x) && (20..80).contains(&y) {
                128
            } else {
                0
            };

            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = if (220..290).contains(&x) && (10..90).contains(&y) {
                seed >> 24
            } else {
                0
            };

            let alpha = disc.max(block).max(noise);
            let rgb = (x as u32 * 31 + y as u32 * 17) & 0x00FF_FFFF;
            img.set(x, y, (alpha << 24) | rgb);
        }
    }
    img
}

/// Unoptimized double-precision separable convolution with the same edge
/// handling, floored to an integer only after the second pass.
fn double_precision_shadow(src: &PixelBuffer, kernel: &Kernel, opacity: f32) -> Vec<u32> {
    let k = kernel.radius();
    let weights: Vec<f64> = kernel.weights().iter().map(|&w| w as f64).collect();
    let kernel_sum = kernel.sum() as f64;
    let (src_w, src_h) = (src.width(), src.height());
    let (dst_w, dst_h) = (src_w + 2 * k, src_h + 2 * k);

    let mut vertical = vec![0.0f64; dst_w * dst_h];
    for dst_x in k..k + src_w {
        let src_x = dst_x - k;
        for dst_y in 0..dst_h {
            let top = dst_y as isize - 2 * k as isize;
            let mut acc = 0.0;
            for (j, &weight) in weights.iter().enumerate() {
                let sy = top + j as isize;
                if sy >= 0 && (sy as usize) < src_h {
                    acc += src.alpha(src_x, sy as usize) as f64 * weight;
                }
            }
            vertical[dst_y * dst_w + dst_x] = acc / kernel_sum;
        }
    }

    let mut out = vec![0u32; dst_w * dst_h];
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let left = dst_x as isize - k as isize;
            let mut acc = 0.0;
            for (j, &weight) in weights.iter().enumerate() {
                let sx = left + j as isize;
                if sx >= 0 && (sx as usize) < dst_w {
                    acc += vertical[dst_y * dst_w + sx as usize] * weight;
                }
            }
            let v = (acc / kernel_sum).floor() as u32;
            out[dst_y * dst_w + dst_x] = ((v as f32 * opacity) as u32) << 24;
        }
    }
    out
}

fn max_alpha_difference(a: &[u32], b: &[u32]) -> u32 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&p, &q)| ((p >> 24) as i32 - (q >> 24) as i32).unsigned_abs())
        .max()
        .unwrap()
}

#[test]
fn test_gaussian_matches_reference_exactly() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 0.5);

    let optimized = GaussianShadowRenderer
        .create_shadow(&src, None, &params)
        .unwrap();
    let reference = ReferenceShadowRenderer::gaussian()
        .create_shadow(&src, None, &params)
        .unwrap();

    assert_eq!(optimized.as_slice(), reference.as_slice());
}

#[test]
fn test_box_matches_reference_exactly() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 0.5);

    let optimized = BoxShadowRenderer.create_shadow(&src, None, &params).unwrap();
    let reference = ReferenceShadowRenderer::uniform()
        .create_shadow(&src, None, &params)
        .unwrap();

    assert_eq!(optimized.as_slice(), reference.as_slice());
}

#[test]
fn test_gaussian_matches_double_precision_within_one() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 0.5);
    let renderer = GaussianShadowRenderer;

    let optimized = renderer.create_shadow(&src, None, &params).unwrap();
    let expected = double_precision_shadow(&src, &renderer.kernel(&params), params.opacity);

    assert!(max_alpha_difference(optimized.as_slice(), &expected) <= 1);
}

#[test]
fn test_output_is_deterministic() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 0.5);

    let first = GaussianShadowRenderer
        .create_shadow(&src, None, &params)
        .unwrap();
    let second = GaussianShadowRenderer
        .create_shadow(&src, None, &params)
        .unwrap();

    assert_eq!(first.as_slice(), second.as_slice());
}

#[test]
fn test_shadow_falls_off_to_transparent_corners() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 1.0);

    let shadow = GaussianShadowRenderer
        .create_shadow(&src, None, &params)
        .unwrap();

    let (w, h) = (shadow.width(), shadow.height());
    for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        assert_eq!(shadow.alpha(x, y), 0, "corner ({x}, {y})");
    }
}

#[test]
fn test_radius_zero_is_identity() {
    let src = test_image();
    let params = ShadowParams::new(0.0, 1.0);

    let shadow = GaussianShadowRenderer
        .create_shadow(&src, None, &params)
        .unwrap();

    assert_eq!(shadow.width(), src.width());
    assert_eq!(shadow.height(), src.height());
    for y in 0..src.height() {
        for x in 0..src.width() {
            assert_eq!(shadow.alpha(x, y), src.alpha(x, y));
            // The shadow carries no color of its own.
            assert_eq!(shadow.get(x, y) & 0x00FF_FFFF, 0);
        }
    }
}

#[test]
fn test_kernel_larger_than_image() {
    let mut src = PixelBuffer::new(7, 7);
    for y in 0..7 {
        for x in 0..7 {
            src.set(x, y, ((x as u32 * 40 + y as u32 * 25) % 256) << 24);
        }
    }
    let params = ShadowParams::new(10.0, 0.8);

    for (optimized, reference) in [
        (
            GaussianShadowRenderer.create_shadow(&src, None, &params),
            ReferenceShadowRenderer::gaussian().create_shadow(&src, None, &params),
        ),
        (
            BoxShadowRenderer.create_shadow(&src, None, &params),
            ReferenceShadowRenderer::uniform().create_shadow(&src, None, &params),
        ),
    ] {
        assert_eq!(optimized.unwrap().as_slice(), reference.unwrap().as_slice());
    }
}

#[test]
fn test_supplied_destination_is_used_and_stale_contents_ignored() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 0.5);
    let renderer = GaussianShadowRenderer;

    let fresh = renderer.create_shadow(&src, None, &params).unwrap();

    let k = renderer.kernel(&params).radius();
    let stale = PixelBuffer::from_vec(
        src.width() + 2 * k,
        src.height() + 2 * k,
        vec![0xFFFF_FFFF; (src.width() + 2 * k) * (src.height() + 2 * k)],
    )
    .unwrap();
    let reused = renderer.create_shadow(&src, Some(stale), &params).unwrap();

    assert_eq!(fresh.as_slice(), reused.as_slice());
}

#[test]
fn test_wrong_destination_size_is_rejected() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 0.5);

    let too_small = PixelBuffer::new(src.width(), src.height());
    let err = GaussianShadowRenderer
        .create_shadow(&src, Some(too_small), &params)
        .unwrap_err();

    match err {
        Error::SizeMismatch {
            expected_width,
            expected_height,
            ..
        } => {
            assert_eq!(expected_width, src.width() + 30);
            assert_eq!(expected_height, src.height() + 30);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }
}

#[test]
fn test_invalid_parameters_are_rejected_before_rendering() {
    let src = test_image();

    for params in [
        ShadowParams::new(-1.0, 0.5),
        ShadowParams::new(15.0, 1.5),
        ShadowParams::new(15.0, -0.5),
        ShadowParams::new(f32::NAN, 0.5),
    ] {
        let err = GaussianShadowRenderer
            .create_shadow(&src, None, &params)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)), "{params:?}");
    }
}

#[test]
fn test_double_box_is_two_box_applications() {
    let src = test_image();
    let params = ShadowParams::new(15.0, 0.5);

    let double = DoubleBoxShadowRenderer
        .create_shadow(&src, None, &params)
        .unwrap();

    // r1 = 7, r2 = 8; opacity lands on the second application only.
    let inner = BoxShadowRenderer
        .create_shadow(&src, None, &ShadowParams::new(7.0, 1.0))
        .unwrap();
    let manual = BoxShadowRenderer
        .create_shadow(&inner, None, &ShadowParams::new(8.0, 0.5))
        .unwrap();

    assert_eq!(double.as_slice(), manual.as_slice());
    assert_eq!(double.width(), src.width() + 30);
    assert_eq!(double.height(), src.height() + 30);
}

#[test]
fn test_opacity_zero_renders_fully_transparent() {
    let src = test_image();
    let params = ShadowParams::new(5.0, 0.0);

    let shadow = GaussianShadowRenderer
        .create_shadow(&src, None, &params)
        .unwrap();

    assert!(shadow.as_slice().iter().all(|&px| px == 0));
}

#[test]
fn test_kernel_sizing_contract() {
    let src = test_image();
    let params = ShadowParams::new(8.0, 0.5);

    // Pre-size the destination from the pure kernel() accessor.
    for renderer in [
        &GaussianShadowRenderer as &dyn ShadowRenderer,
        &BoxShadowRenderer,
        &DoubleBoxShadowRenderer,
    ] {
        let k = renderer.kernel(&params).radius();
        let dst = PixelBuffer::new(src.width() + 2 * k, src.height() + 2 * k);
        let rendered = renderer.create_shadow(&src, Some(dst), &params).unwrap();
        assert_eq!(rendered.width(), src.width() + 2 * k);
    }
}
