use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pixel_kernels::tools::{DEFAULT_SEED, random_color};
use pixel_kernels::utils::grayscale::luma_lanes;
use pixel_kernels::{ChannelOrder, Image, luma_float, luma_optimized, luma_reference};

fn bench_luma_reference_medium(c: &mut Criterion) {
    let image = random_color(640, 480, DEFAULT_SEED);
    let mut dst = Image::default();
    c.bench_function("luma_reference_640x480", |b| {
        b.iter(|| luma_reference(black_box(&image), &mut dst, ChannelOrder::Bgr))
    });
}

fn bench_luma_optimized_medium(c: &mut Criterion) {
    let image = random_color(640, 480, DEFAULT_SEED);
    let mut dst = Image::default();
    c.bench_function("luma_optimized_640x480", |b| {
        b.iter(|| luma_optimized(black_box(&image), &mut dst, ChannelOrder::Bgr))
    });
}

fn bench_luma_float_medium(c: &mut Criterion) {
    let image = random_color(640, 480, DEFAULT_SEED);
    let mut dst = Image::default();
    c.bench_function("luma_float_640x480", |b| {
        b.iter(|| luma_float(black_box(&image), &mut dst, ChannelOrder::Bgr))
    });
}

fn bench_luma_portable_medium(c: &mut Criterion) {
    let image = random_color(640, 480, DEFAULT_SEED);
    let mut dst = Image::default();
    c.bench_function("luma_lanes16_640x480", |b| {
        b.iter(|| luma_lanes::<16>(black_box(&image), &mut dst, ChannelOrder::Bgr))
    });
}

fn bench_luma_reference_large(c: &mut Criterion) {
    let image = random_color(1920, 1080, DEFAULT_SEED);
    let mut dst = Image::default();
    c.bench_function("luma_reference_1920x1080", |b| {
        b.iter(|| luma_reference(black_box(&image), &mut dst, ChannelOrder::Bgr))
    });
}

fn bench_luma_optimized_large(c: &mut Criterion) {
    let image = random_color(1920, 1080, DEFAULT_SEED);
    let mut dst = Image::default();
    c.bench_function("luma_optimized_1920x1080", |b| {
        b.iter(|| luma_optimized(black_box(&image), &mut dst, ChannelOrder::Bgr))
    });
}

criterion_group!(
    benches,
    bench_luma_reference_medium,
    bench_luma_optimized_medium,
    bench_luma_float_medium,
    bench_luma_portable_medium,
    bench_luma_reference_large,
    bench_luma_optimized_large
);
criterion_main!(benches);
