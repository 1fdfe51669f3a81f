//! Bilinear resize
//!
//! Both variants sample with half-pixel centers and clamp at the edges:
//! `src = (dst + 0.5) * (src_len / dst_len) - 0.5`. The reference blends
//! in `f32`; the optimized path quantizes the same taps to 11 fractional
//! bits and stays in integers. Outputs differ by at most 1 per sample.

use crate::error::{KernelError, Result};
use crate::models::{Image, Shape, Size};

/// Fractional bits of the fixed-point interpolation weights
const WEIGHT_BITS: u32 = 11;
const WEIGHT_ONE: i32 = 1 << WEIGHT_BITS;

/// Source indices and blend factor for one destination coordinate
#[derive(Debug, Clone, Copy)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f32,
}

fn axis_taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let i0 = (pos.floor() as usize).min(last);
            if i0 == last {
                Tap { i0, i1: last, frac: 0.0 }
            } else {
                Tap {
                    i0,
                    i1: i0 + 1,
                    frac: pos - i0 as f32,
                }
            }
        })
        .collect()
}

fn check_resize(src: &Image, dst: &Image, target: Size) -> Result<()> {
    if src.width() == 0 || src.height() == 0 {
        return Err(KernelError::InvalidInput(
            "cannot resize an empty image".to_string(),
        ));
    }
    let expected = Shape {
        width: target.width,
        height: target.height,
        channels: src.channels(),
    };
    if dst.shape() != expected {
        return Err(KernelError::DimensionMismatch {
            expected,
            actual: dst.shape(),
        });
    }
    Ok(())
}

/// Floating-point bilinear resize into a caller-sized destination
pub fn resize_reference(src: &Image, dst: &mut Image, target: Size) -> Result<()> {
    check_resize(src, dst, target)?;

    let channels = src.channels();
    let x_taps = axis_taps(src.width(), target.width);
    let y_taps = axis_taps(src.height(), target.height);

    for (dy, ty) in y_taps.iter().enumerate() {
        let row0 = src.row(ty.i0);
        let row1 = src.row(ty.i1);
        let out = dst.row_mut(dy);
        for (dx, tx) in x_taps.iter().enumerate() {
            for c in 0..channels {
                let p00 = row0[tx.i0 * channels + c] as f32;
                let p01 = row0[tx.i1 * channels + c] as f32;
                let p10 = row1[tx.i0 * channels + c] as f32;
                let p11 = row1[tx.i1 * channels + c] as f32;

                let top = p00 * (1.0 - tx.frac) + p01 * tx.frac;
                let bottom = p10 * (1.0 - tx.frac) + p11 * tx.frac;
                let value = top * (1.0 - ty.frac) + bottom * ty.frac;
                out[dx * channels + c] = (value + 0.5).clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(())
}

/// Fixed-point bilinear resize into a caller-sized destination
///
/// Horizontal taps are quantized once per call and every source row is
/// interpolated horizontally at most once per destination row pair.
pub fn resize_optimized(src: &Image, dst: &mut Image, target: Size) -> Result<()> {
    check_resize(src, dst, target)?;

    let channels = src.channels();
    let quantize = |t: &Tap| {
        let w1 = (t.frac * WEIGHT_ONE as f32).round() as i32;
        (t.i0 * channels, t.i1 * channels, WEIGHT_ONE - w1, w1)
    };
    let x_taps: Vec<_> = axis_taps(src.width(), target.width)
        .iter()
        .map(quantize)
        .collect();
    let y_taps = axis_taps(src.height(), target.height);

    let row_len = target.width * channels;
    let mut top = vec![0i32; row_len];
    let mut bottom = vec![0i32; row_len];
    let mut cached = (usize::MAX, usize::MAX);

    let interpolate_row = |src_row: &[u8], out: &mut [i32]| {
        for (dx, &(o0, o1, w0, w1)) in x_taps.iter().enumerate() {
            for c in 0..channels {
                out[dx * channels + c] =
                    src_row[o0 + c] as i32 * w0 + src_row[o1 + c] as i32 * w1;
            }
        }
    };

    const ROUND: i32 = 1 << (2 * WEIGHT_BITS - 1);
    for (dy, ty) in y_taps.iter().enumerate() {
        if cached.0 != ty.i0 {
            if cached.1 == ty.i0 {
                std::mem::swap(&mut top, &mut bottom);
                cached.1 = usize::MAX;
            } else {
                interpolate_row(src.row(ty.i0), &mut top);
            }
            cached.0 = ty.i0;
        }
        if cached.1 != ty.i1 {
            interpolate_row(src.row(ty.i1), &mut bottom);
            cached.1 = ty.i1;
        }

        let wy1 = (ty.frac * WEIGHT_ONE as f32).round() as i32;
        let wy0 = WEIGHT_ONE - wy1;
        let out = dst.row_mut(dy);
        for ((o, &t), &b) in out.iter_mut().zip(&top).zip(&bottom) {
            let value = (t * wy0 + b * wy1 + ROUND) >> (2 * WEIGHT_BITS);
            *o = value.clamp(0, 255) as u8;
        }
    }
    Ok(())
}

/// Resize into a freshly allocated image using the optimized path
pub fn resize(src: &Image, target: Size) -> Result<Image> {
    let mut dst = Image::new(target.width, target.height, src.format());
    resize_optimized(src, &mut dst, target)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PixelFormat;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_image(width: usize, height: usize, format: PixelFormat, seed: u64) -> Image {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = vec![0u8; width * height * format.channels()];
        rng.fill(&mut data[..]);
        Image::from_raw(width, height, format, data).unwrap()
    }

    #[test]
    fn test_axis_taps_clamp_to_edges() {
        let taps = axis_taps(4, 8);
        assert_eq!(taps[0].i0, 0);
        assert_eq!(taps[0].frac, 0.0);
        let last = taps.last().unwrap();
        assert_eq!((last.i0, last.i1), (3, 3));
    }

    #[test]
    fn test_same_size_is_copy() {
        let src = random_image(13, 7, PixelFormat::Color8, 1);
        let target = Size::new(13, 7);
        let mut a = Image::new(13, 7, PixelFormat::Color8);
        let mut b = Image::new(13, 7, PixelFormat::Color8);
        resize_reference(&src, &mut a, target).unwrap();
        resize_optimized(&src, &mut b, target).unwrap();
        assert_eq!(a, src);
        assert_eq!(b, src);
    }

    #[test]
    fn test_optimized_within_one_of_reference() {
        // Ratios from the perf sweep: width / 1.7, height / 1.4
        for (i, (w, h)) in [(64usize, 48usize), (50, 33), (17, 90)].into_iter().enumerate() {
            for format in [PixelFormat::Gray8, PixelFormat::Color8] {
                let src = random_image(w, h, format, i as u64 + 10);
                let target = Size::new((w as f32 / 1.7) as usize, (h as f32 / 1.4) as usize);
                let mut gold = Image::new(target.width, target.height, format);
                let mut fast = Image::new(target.width, target.height, format);
                resize_reference(&src, &mut gold, target).unwrap();
                resize_optimized(&src, &mut fast, target).unwrap();
                for (a, b) in gold.as_bytes().iter().zip(fast.as_bytes()) {
                    assert!((*a as i32 - *b as i32).abs() <= 1, "{w}x{h} {:?}", format);
                }
            }
        }
    }

    #[test]
    fn test_upscale_within_one_of_reference() {
        let src = random_image(9, 5, PixelFormat::Gray8, 4);
        let target = Size::new(31, 12);
        let mut gold = Image::new(31, 12, PixelFormat::Gray8);
        let mut fast = Image::new(31, 12, PixelFormat::Gray8);
        resize_reference(&src, &mut gold, target).unwrap();
        resize_optimized(&src, &mut fast, target).unwrap();
        for (a, b) in gold.as_bytes().iter().zip(fast.as_bytes()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let src = Image::from_raw(6, 6, PixelFormat::Gray8, vec![77; 36]).unwrap();
        let out = resize(&src, Size::new(4, 3)).unwrap();
        assert!(out.as_bytes().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_wrong_destination_shape() {
        let src = random_image(8, 8, PixelFormat::Gray8, 2);
        let mut dst = Image::new(4, 4, PixelFormat::Color8);
        let err = resize_optimized(&src, &mut dst, Size::new(4, 4)).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { .. }));

        let mut dst = Image::new(5, 4, PixelFormat::Gray8);
        let err = resize_reference(&src, &mut dst, Size::new(4, 4)).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_empty_source_rejected() {
        let src = Image::new(0, 3, PixelFormat::Gray8);
        let mut dst = Image::new(2, 2, PixelFormat::Gray8);
        let err = resize_reference(&src, &mut dst, Size::new(2, 2)).unwrap_err();
        assert!(matches!(err, KernelError::InvalidInput(_)));
    }
}
