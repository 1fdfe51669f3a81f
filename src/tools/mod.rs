use crate::models::{Image, PixelFormat, Size};
use crate::utils::grayscale::ChannelOrder;
use image::GenericImageView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::path::Path;

/// Seed used by the perf sweep when `KERNEL_SEED` is unset.
pub const DEFAULT_SEED: u64 = 234231412;

/// Threshold used to turn uniform noise into a mostly-foreground binary image.
pub const NOISE_THRESHOLD: u8 = 240;

/// VGA, 720p and 1080p.
pub const DEFAULT_SIZES: [Size; 3] = [
    Size::new(640, 480),
    Size::new(1280, 720),
    Size::new(1920, 1080),
];

/// Channel order of images produced by [`load_color`].
pub const LOADED_ORDER: ChannelOrder = ChannelOrder::Rgb;

/// Load an image file as interleaved RGB.
///
/// Pair the result with [`LOADED_ORDER`].
pub fn load_color<P: AsRef<Path>>(path: P) -> Result<Image, image::ImageError> {
    let img = image::open(path)?;
    Ok(Image::from_rgb8(&img.to_rgb8()))
}

/// Load an image file as 8-bit gray.
///
/// Uses the `image` crate's own gray conversion; color sources should go
/// through [`load_color`] and the luma kernels instead.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<Image, image::ImageError> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    tracing::debug!(width, height, "loaded gray image");
    Ok(Image::from_luma8(&img.to_luma8()))
}

/// Save a gray image; the format follows the file extension.
pub fn save_gray<P: AsRef<Path>>(img: &Image, path: P) -> Result<(), image::ImageError> {
    let buffer = img.to_luma8().ok_or_else(|| {
        image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::Generic("only gray images can be saved".to_string()),
        ))
    })?;
    buffer.save(path)
}

/// Uniform random 3-channel image.
pub fn random_color(width: usize, height: usize, seed: u64) -> Image {
    let mut img = Image::new(width, height, PixelFormat::Color8);
    let mut rng = StdRng::seed_from_u64(seed);
    for y in 0..height {
        rng.fill(img.row_mut(y));
    }
    img
}

/// Uniform random gray image.
pub fn random_gray(width: usize, height: usize, seed: u64) -> Image {
    let mut img = Image::new(width, height, PixelFormat::Gray8);
    let mut rng = StdRng::seed_from_u64(seed);
    for y in 0..height {
        rng.fill(img.row_mut(y));
    }
    img
}

/// Random {0, 255} image: noise at or below [`NOISE_THRESHOLD`] becomes
/// foreground, so roughly 94% of pixels are set.
pub fn random_binary(width: usize, height: usize, seed: u64) -> Image {
    threshold_inverse(&random_gray(width, height, seed), NOISE_THRESHOLD)
}

/// 255 where `value > threshold`, 0 elsewhere.
pub fn threshold(src: &Image, threshold: u8) -> Image {
    map_gray(src, |v| if v > threshold { 255 } else { 0 })
}

/// 0 where `value > threshold`, 255 elsewhere.
pub fn threshold_inverse(src: &Image, threshold: u8) -> Image {
    map_gray(src, |v| if v > threshold { 0 } else { 255 })
}

fn map_gray(src: &Image, f: impl Fn(u8) -> u8) -> Image {
    let mut dst = Image::new(src.width(), src.height(), src.format());
    for y in 0..src.height() {
        for (out, &v) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            *out = f(v);
        }
    }
    dst
}

/// Count samples that differ between two images of the same shape.
///
/// Images of different shapes count every sample of the larger one.
pub fn count_mismatches(a: &Image, b: &Image) -> usize {
    count_mismatches_above(a, b, 0)
}

/// Count samples whose absolute difference exceeds `tolerance`.
pub fn count_mismatches_above(a: &Image, b: &Image, tolerance: u8) -> usize {
    if a.shape() != b.shape() {
        return (a.row_bytes() * a.height()).max(b.row_bytes() * b.height());
    }
    a.rows()
        .zip(b.rows())
        .map(|(ra, rb)| {
            ra.iter()
                .zip(rb)
                .filter(|&(&x, &y)| x.abs_diff(y) > tolerance)
                .count()
        })
        .sum()
}

/// Number of non-zero samples.
pub fn count_nonzero(img: &Image) -> usize {
    img.rows().map(|row| row.iter().filter(|&&v| v != 0).count()).sum()
}

/// Parse `WxH` pairs separated by commas. Malformed entries are skipped.
pub fn parse_sizes(value: &str) -> Vec<Size> {
    value
        .split(',')
        .filter_map(|item| {
            let (w, h) = item.trim().split_once(['x', 'X'])?;
            let width = w.trim().parse::<usize>().ok()?;
            let height = h.trim().parse::<usize>().ok()?;
            if width == 0 || height == 0 {
                None
            } else {
                Some(Size::new(width, height))
            }
        })
        .collect()
}

/// Image sizes for sweeps from `KERNEL_SIZES`, falling back to [`DEFAULT_SIZES`].
pub fn sizes_from_env() -> Vec<Size> {
    match env::var("KERNEL_SIZES") {
        Ok(value) => {
            let sizes = parse_sizes(&value);
            if sizes.is_empty() {
                DEFAULT_SIZES.to_vec()
            } else {
                sizes
            }
        }
        Err(_) => DEFAULT_SIZES.to_vec(),
    }
}

/// RNG seed from `KERNEL_SEED`, falling back to [`DEFAULT_SEED`].
pub fn seed_from_env() -> u64 {
    env::var("KERNEL_SEED")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sizes_accepts_mixed_separators() {
        let sizes = parse_sizes("640x480, 32X16,bad,0x5,7x");
        assert_eq!(sizes, vec![Size::new(640, 480), Size::new(32, 16)]);
    }

    #[test]
    fn random_images_are_seeded() {
        assert_eq!(random_color(9, 4, 1), random_color(9, 4, 1));
        assert_ne!(random_color(9, 4, 1), random_color(9, 4, 2));
    }

    #[test]
    fn random_binary_is_mostly_foreground() {
        let img = random_binary(100, 100, DEFAULT_SEED);
        assert!(img.as_bytes().iter().all(|&v| v == 0 || v == 255));
        let ratio = count_nonzero(&img) as f64 / 10_000.0;
        assert!(ratio > 0.9 && ratio < 0.98, "ratio {ratio}");
    }

    #[test]
    fn threshold_pair_is_complementary() {
        let gray = random_gray(20, 20, 3);
        let a = threshold(&gray, 128);
        let b = threshold_inverse(&gray, 128);
        assert_eq!(count_mismatches(&a, &b), 400);
    }

    #[test]
    fn mismatch_tolerance() {
        let a = Image::from_raw(3, 1, PixelFormat::Gray8, vec![10, 20, 30]).unwrap();
        let b = Image::from_raw(3, 1, PixelFormat::Gray8, vec![11, 22, 30]).unwrap();
        assert_eq!(count_mismatches(&a, &b), 2);
        assert_eq!(count_mismatches_above(&a, &b, 1), 1);

        let c = Image::new(2, 1, PixelFormat::Gray8);
        assert_eq!(count_mismatches(&a, &c), 3);
    }

    #[test]
    fn save_and_load_gray_roundtrip() {
        let img = random_binary(12, 7, 5);
        let mut path = std::env::temp_dir();
        path.push(format!("pixel_kernels_roundtrip_{}.png", std::process::id()));
        save_gray(&img, &path).expect("failed to write temp image");
        let loaded = load_gray(&path).expect("failed to read temp image");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, img);
    }
}
