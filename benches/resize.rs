use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pixel_kernels::tools::{DEFAULT_SEED, random_gray};
use pixel_kernels::{Image, Size, resize_optimized, resize_reference};

const TARGET: Size = Size::new(376, 342);

fn bench_resize_reference_medium(c: &mut Criterion) {
    let image = random_gray(640, 480, DEFAULT_SEED);
    let mut dst = Image::new(TARGET.width, TARGET.height, image.format());
    c.bench_function("resize_reference_640x480", |b| {
        b.iter(|| resize_reference(black_box(&image), &mut dst, TARGET))
    });
}

fn bench_resize_optimized_medium(c: &mut Criterion) {
    let image = random_gray(640, 480, DEFAULT_SEED);
    let mut dst = Image::new(TARGET.width, TARGET.height, image.format());
    c.bench_function("resize_optimized_640x480", |b| {
        b.iter(|| resize_optimized(black_box(&image), &mut dst, TARGET))
    });
}

criterion_group!(
    benches,
    bench_resize_reference_medium,
    bench_resize_optimized_medium
);
criterion_main!(benches);
