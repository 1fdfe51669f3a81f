//! Reference and optimized kernels must agree
//!
//! Luma and thinning are checked for exact equality, resize for a difference
//! of at most 1 per sample. Random inputs are seeded so failures reproduce.

use pixel_kernels::thinning::{ReferenceThinning, TableThinning, ThinningWorkspace, skeletonize_into};
use pixel_kernels::tools::{
    DEFAULT_SEED, count_mismatches, count_mismatches_above, count_nonzero, random_binary,
    random_color, random_gray, threshold,
};
use pixel_kernels::{
    ChannelOrder, Image, Parity, PixelFormat, RemovalTable, Size, luma_float, luma_optimized,
    luma_reference, resize_optimized, resize_reference, skeletonize_optimized,
    skeletonize_reference,
};

fn square(size: usize, from: usize, to: usize) -> Image {
    let mut img = Image::new(size, size, PixelFormat::Gray8);
    for y in from..to {
        for x in from..to {
            img.set(x, y, 0, 255);
        }
    }
    img
}

/// Number of 8-connected foreground components
fn components(img: &Image) -> usize {
    let (w, h) = (img.width(), img.height());
    let mut seen = vec![false; w * h];
    let mut count = 0;
    for start in 0..w * h {
        if seen[start] || img.get(start % w, start / w, 0) == 0 {
            continue;
        }
        count += 1;
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(at) = stack.pop() {
            let (x, y) = ((at % w) as isize, (at / w) as isize);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                        continue;
                    }
                    let next = ny as usize * w + nx as usize;
                    if !seen[next] && img.get(nx as usize, ny as usize, 0) != 0 {
                        seen[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
    }
    count
}

#[test]
fn test_luma_optimized_matches_reference() {
    let sizes = [(1, 1), (15, 3), (16, 2), (17, 5), (33, 9), (640, 48), (333, 17)];
    for (i, &(w, h)) in sizes.iter().enumerate() {
        let color = random_color(w, h, DEFAULT_SEED + i as u64);
        for order in [ChannelOrder::Bgr, ChannelOrder::Rgb] {
            let mut gold = Image::default();
            let mut fast = Image::default();
            luma_reference(&color, &mut gold, order).unwrap();
            luma_optimized(&color, &mut fast, order).unwrap();
            assert_eq!(count_mismatches(&gold, &fast), 0, "{w}x{h} {order:?}");
        }
    }
}

#[test]
fn test_luma_float_within_one() {
    let color = random_color(257, 31, DEFAULT_SEED);
    let mut fixed = Image::default();
    let mut float = Image::default();
    luma_reference(&color, &mut fixed, ChannelOrder::Bgr).unwrap();
    luma_float(&color, &mut float, ChannelOrder::Bgr).unwrap();
    assert_eq!(count_mismatches_above(&fixed, &float, 1), 0);
}

#[test]
fn test_thinning_optimized_matches_reference_on_noise() {
    for (i, &(w, h)) in [(64, 48), (31, 17), (3, 3), (1, 9)].iter().enumerate() {
        let binary = random_binary(w, h, DEFAULT_SEED + i as u64);
        let gold = skeletonize_reference(&binary).unwrap();
        let fast = skeletonize_optimized(&binary).unwrap();
        assert_eq!(count_mismatches(&gold, &fast), 0, "{w}x{h}");
    }
}

#[test]
fn test_thinning_matches_on_thresholded_blobs() {
    // Smooth-ish blobs: average noise over 4x4 cells, then threshold
    let noise = random_gray(12, 10, 99);
    let mut blobs = Image::new(48, 40, PixelFormat::Gray8);
    for y in 0..40 {
        for x in 0..48 {
            blobs.set(x, y, 0, noise.get(x / 4, y / 4, 0));
        }
    }
    let binary = threshold(&blobs, 128);
    assert_eq!(
        skeletonize_reference(&binary).unwrap(),
        skeletonize_optimized(&binary).unwrap()
    );
}

#[test]
fn test_thinning_is_idempotent() {
    let binary = random_binary(40, 30, DEFAULT_SEED);
    let once = skeletonize_optimized(&binary).unwrap();

    let mut twice = Image::default();
    let mut workspace = ThinningWorkspace::new();
    let report = skeletonize_into(&once, &mut twice, &TableThinning::new(), &mut workspace).unwrap();
    assert_eq!(twice, once);
    assert_eq!(report.rounds, 1);
}

#[test]
fn test_square_thins_to_connected_subset() {
    let src = square(16, 3, 13);
    let gold = skeletonize_reference(&src).unwrap();
    let fast = skeletonize_optimized(&src).unwrap();
    assert_eq!(gold, fast);

    let remaining = count_nonzero(&gold);
    assert!(remaining > 0);
    assert!(remaining < 100);
    assert_eq!(components(&gold), 1);
    for y in 0..16 {
        for x in 0..16 {
            if gold.get(x, y, 0) != 0 {
                assert!((3..13).contains(&x) && (3..13).contains(&y), "({x}, {y}) outside square");
            }
        }
    }
}

#[test]
fn test_thinning_preserves_component_count() {
    let mut src = square(24, 2, 9);
    for y in 12..21 {
        for x in 4..20 {
            src.set(x, y, 0, 255);
        }
    }
    assert_eq!(components(&src), 2);
    let out = skeletonize_optimized(&src).unwrap();
    assert_eq!(components(&out), 2);
}

#[test]
fn test_strategies_agree_through_shared_loop() {
    let binary = random_binary(50, 20, 7);
    let mut workspace = ThinningWorkspace::new();
    let mut gold = Image::default();
    let mut fast = Image::default();
    let a = skeletonize_into(&binary, &mut gold, &ReferenceThinning, &mut workspace).unwrap();
    let b = skeletonize_into(&binary, &mut fast, &TableThinning::new(), &mut workspace).unwrap();
    assert_eq!(gold, fast);
    assert_eq!(a, b);
}

#[test]
fn test_removal_tables_total_and_deterministic() {
    for parity in Parity::ROUND {
        let first = RemovalTable::build(parity);
        let second = RemovalTable::build(parity);
        assert_eq!(first, second);
        assert!(!first.get(0));
        assert!(!first.get(255));
        assert!(first.removable_count() > 0 && first.removable_count() < 256);
    }
}

#[test]
fn test_resize_optimized_within_one() {
    for (i, &(w, h)) in [(640, 480), (97, 61), (5, 3)].iter().enumerate() {
        let gray = random_gray(w, h, DEFAULT_SEED + i as u64);
        for target in [
            Size::new(((w as f64 / 1.7) as usize).max(1), ((h as f64 / 1.4) as usize).max(1)),
            Size::new(w * 2 + 1, h + 3),
        ] {
            let mut gold = Image::new(target.width, target.height, PixelFormat::Gray8);
            let mut fast = Image::new(target.width, target.height, PixelFormat::Gray8);
            resize_reference(&gray, &mut gold, target).unwrap();
            resize_optimized(&gray, &mut fast, target).unwrap();
            assert_eq!(count_mismatches_above(&gold, &fast, 1), 0, "{w}x{h} -> {target:?}");
        }
    }
}

#[test]
fn test_resize_color_within_one() {
    let color = random_color(120, 90, DEFAULT_SEED);
    let target = Size::new(70, 64);
    let mut gold = Image::new(70, 64, PixelFormat::Color8);
    let mut fast = Image::new(70, 64, PixelFormat::Color8);
    resize_reference(&color, &mut gold, target).unwrap();
    resize_optimized(&color, &mut fast, target).unwrap();
    assert_eq!(count_mismatches_above(&gold, &fast, 1), 0);
}
