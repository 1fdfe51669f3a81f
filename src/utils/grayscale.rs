/// Convert 3-channel images to BT.709 luma
/// Y = 0.2126*R + 0.7152*G + 0.0722*B
/// Uses fixed-point arithmetic: Y = (13933*R + 46871*G + 4732*B + 32768) >> 16
///
/// Three entry points share one contract:
/// - `luma_float`: floating-point formula per pixel
/// - `luma_reference`: scalar fixed-point model per pixel (exactness oracle)
/// - `luma_optimized`: 16-pixel vector groups, scalar tail
///
/// SIMD Implementation:
/// - x86_64: SSSE3 byte shuffles deinterleave 16 pixels (runtime detected)
/// - aarch64: NEON `vld3q_u8` deinterleaves 16 pixels
/// - Fallback: portable fixed-width lane groups
use crate::error::{KernelError, Result};
use crate::models::{Image, PixelFormat};
use crate::utils::fixed_point::{FIXED_SHIFT, FixedPointWeights, LumaWeights};

// Platform-specific SIMD implementations
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// Pixels per vector group
pub const LANES: usize = 16;

/// Byte order of interleaved 3-channel pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Blue, green, red
    #[default]
    Bgr,
    /// Red, green, blue
    Rgb,
}

impl ChannelOrder {
    /// Byte offsets of (red, green, blue) inside one pixel
    pub const fn offsets(self) -> (usize, usize, usize) {
        match self {
            ChannelOrder::Bgr => (2, 1, 0),
            ChannelOrder::Rgb => (0, 1, 2),
        }
    }
}

fn check_source(src: &Image) -> Result<()> {
    if src.format() != PixelFormat::Color8 {
        return Err(KernelError::InvalidInput(format!(
            "luma conversion needs a 3-channel source, got {} channel(s)",
            src.channels()
        )));
    }
    Ok(())
}

/// Floating-point luma conversion
pub fn luma_float(src: &Image, dst: &mut Image, order: ChannelOrder) -> Result<()> {
    check_source(src)?;
    dst.ensure_shape(src.width(), src.height(), PixelFormat::Gray8);

    let weights = LumaWeights::BT709;
    let (ri, gi, bi) = order.offsets();
    for y in 0..src.height() {
        let src_row = src.row(y);
        let dst_row = dst.row_mut(y);
        for (px, out) in src_row.chunks_exact(3).zip(dst_row.iter_mut()) {
            *out = weights.apply_float(px[ri], px[gi], px[bi]);
        }
    }
    Ok(())
}

/// Scalar fixed-point luma conversion
pub fn luma_reference(src: &Image, dst: &mut Image, order: ChannelOrder) -> Result<()> {
    check_source(src)?;
    dst.ensure_shape(src.width(), src.height(), PixelFormat::Gray8);

    let model = FixedPointWeights::bt709();
    for y in 0..src.height() {
        luma_row_scalar(src.row(y), dst.row_mut(y), order, &model);
    }
    Ok(())
}

/// Vectorized fixed-point luma conversion with automatic SIMD selection
///
/// Output is identical to [`luma_reference`].
pub fn luma_optimized(src: &Image, dst: &mut Image, order: ChannelOrder) -> Result<()> {
    check_source(src)?;
    dst.ensure_shape(src.width(), src.height(), PixelFormat::Gray8);

    let model = FixedPointWeights::bt709();
    let kernel = RowKernel::detect();
    for y in 0..src.height() {
        kernel.run(src.row(y), dst.row_mut(y), order, &model);
    }
    Ok(())
}

/// Portable lane-group conversion with a caller-chosen group width
///
/// Output is identical to [`luma_reference`] for every `N >= 1`. A zero
/// width is rejected at compile time:
///
/// ```compile_fail
/// use pixel_kernels::utils::grayscale::luma_lanes;
/// use pixel_kernels::{ChannelOrder, Image, PixelFormat};
///
/// let src = Image::new(4, 1, PixelFormat::Color8);
/// let mut dst = Image::default();
/// let _ = luma_lanes::<0>(&src, &mut dst, ChannelOrder::Bgr);
/// ```
pub fn luma_lanes<const N: usize>(src: &Image, dst: &mut Image, order: ChannelOrder) -> Result<()> {
    check_source(src)?;
    dst.ensure_shape(src.width(), src.height(), PixelFormat::Gray8);

    let model = FixedPointWeights::bt709();
    for y in 0..src.height() {
        luma_row_lanes::<N>(src.row(y), dst.row_mut(y), order, &model);
    }
    Ok(())
}

/// Convert a color image to a freshly allocated luma image
pub fn to_luma(src: &Image, order: ChannelOrder) -> Result<Image> {
    let mut dst = Image::default();
    luma_optimized(src, &mut dst, order)?;
    Ok(dst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKernel {
    #[cfg(target_arch = "x86_64")]
    Ssse3,
    #[cfg(target_arch = "aarch64")]
    Neon,
    #[cfg_attr(target_arch = "aarch64", allow(dead_code))]
    Portable,
}

impl RowKernel {
    fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("ssse3") {
                return RowKernel::Ssse3;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            RowKernel::Neon
        }

        #[cfg(not(target_arch = "aarch64"))]
        {
            RowKernel::Portable
        }
    }

    fn run(self, src: &[u8], dst: &mut [u8], order: ChannelOrder, model: &FixedPointWeights) {
        match self {
            #[cfg(target_arch = "x86_64")]
            RowKernel::Ssse3 => unsafe { luma_row_ssse3(src, dst, order, model) },
            #[cfg(target_arch = "aarch64")]
            RowKernel::Neon => unsafe { luma_row_neon(src, dst, order, model) },
            RowKernel::Portable => luma_row_lanes::<LANES>(src, dst, order, model),
        }
    }
}

// ============== Scalar Implementation ==============

fn luma_row_scalar(src: &[u8], dst: &mut [u8], order: ChannelOrder, model: &FixedPointWeights) {
    let (ri, gi, bi) = order.offsets();
    for (px, out) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *out = model.apply(px[ri], px[gi], px[bi]);
    }
}

// ============== Portable Lane-Group Implementation ==============

fn luma_row_lanes<const N: usize>(
    src: &[u8],
    dst: &mut [u8],
    order: ChannelOrder,
    model: &FixedPointWeights,
) {
    const { assert!(N > 0, "lane group width must be positive") };
    let (ri, gi, bi) = order.offsets();

    let mut src_groups = src.chunks_exact(3 * N);
    let mut dst_groups = dst.chunks_exact_mut(N);
    for (group, out) in (&mut src_groups).zip(&mut dst_groups) {
        let mut r = [0i32; N];
        let mut g = [0i32; N];
        let mut b = [0i32; N];
        for lane in 0..N {
            r[lane] = group[lane * 3 + ri] as i32;
            g[lane] = group[lane * 3 + gi] as i32;
            b[lane] = group[lane * 3 + bi] as i32;
        }
        for lane in 0..N {
            let acc = model.r * r[lane] + model.g * g[lane] + model.b * b[lane] + model.bias;
            out[lane] = (acc >> FIXED_SHIFT).clamp(0, 255) as u8;
        }
    }

    // Process remaining pixels
    luma_row_scalar(
        src_groups.remainder(),
        dst_groups.into_remainder(),
        order,
        model,
    );
}

// ============== x86_64 SSSE3 Implementation ==============

/// Shuffle mask gathering `channel` of 16 interleaved pixels out of the
/// `chunk`-th 16-byte load. Lanes whose byte lives in another chunk get
/// -1 so `pshufb` zeroes them.
#[cfg(target_arch = "x86_64")]
const fn deinterleave_mask(channel: usize, chunk: usize) -> [i8; 16] {
    let mut mask = [-1i8; 16];
    let mut lane = 0;
    while lane < 16 {
        let byte = 3 * lane + channel;
        if byte >= 16 * chunk && byte < 16 * (chunk + 1) {
            mask[lane] = (byte - 16 * chunk) as i8;
        }
        lane += 1;
    }
    mask
}

#[cfg(target_arch = "x86_64")]
const DEINTERLEAVE_MASKS: [[[i8; 16]; 3]; 3] = [
    [
        deinterleave_mask(0, 0),
        deinterleave_mask(0, 1),
        deinterleave_mask(0, 2),
    ],
    [
        deinterleave_mask(1, 0),
        deinterleave_mask(1, 1),
        deinterleave_mask(1, 2),
    ],
    [
        deinterleave_mask(2, 0),
        deinterleave_mask(2, 1),
        deinterleave_mask(2, 2),
    ],
];

/// Gather one channel of 16 pixels from three consecutive 16-byte chunks
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn gather_channel(chunks: &[__m128i; 3], channel: usize) -> __m128i {
    let masks = &DEINTERLEAVE_MASKS[channel];
    unsafe {
        let m0 = _mm_loadu_si128(masks[0].as_ptr() as *const __m128i);
        let m1 = _mm_loadu_si128(masks[1].as_ptr() as *const __m128i);
        let m2 = _mm_loadu_si128(masks[2].as_ptr() as *const __m128i);
        _mm_or_si128(
            _mm_or_si128(
                _mm_shuffle_epi8(chunks[0], m0),
                _mm_shuffle_epi8(chunks[1], m1),
            ),
            _mm_shuffle_epi8(chunks[2], m2),
        )
    }
}

/// 32-bit products of eight u16 samples with one u16 weight,
/// returned as (pixels 0..4, pixels 4..8)
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn widening_mul(samples: __m128i, weight: __m128i) -> (__m128i, __m128i) {
    let lo = _mm_mullo_epi16(samples, weight);
    let hi = _mm_mulhi_epu16(samples, weight);
    (_mm_unpacklo_epi16(lo, hi), _mm_unpackhi_epi16(lo, hi))
}

/// Luma of eight pixels held as u16 lanes, returned as eight i16 lanes
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn luma8_sse2(
    r: __m128i,
    g: __m128i,
    b: __m128i,
    weights: &[__m128i; 3],
    bias: __m128i,
) -> __m128i {
    unsafe {
        let (r_lo, r_hi) = widening_mul(r, weights[0]);
        let (g_lo, g_hi) = widening_mul(g, weights[1]);
        let (b_lo, b_hi) = widening_mul(b, weights[2]);

        let sum_lo = _mm_add_epi32(_mm_add_epi32(r_lo, g_lo), _mm_add_epi32(b_lo, bias));
        let sum_hi = _mm_add_epi32(_mm_add_epi32(r_hi, g_hi), _mm_add_epi32(b_hi, bias));

        _mm_packs_epi32(_mm_srli_epi32::<16>(sum_lo), _mm_srli_epi32::<16>(sum_hi))
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn luma_row_ssse3(src: &[u8], dst: &mut [u8], order: ChannelOrder, model: &FixedPointWeights) {
    let width = dst.len().min(src.len() / 3);
    let in_ptr = src.as_ptr();
    let out_ptr = dst.as_mut_ptr();
    let (ri, gi, bi) = order.offsets();
    let mut x = 0;

    unsafe {
        // Weights are below 2^16; the u16 bit pattern is what matters
        let weights = [
            _mm_set1_epi16(model.r as u16 as i16),
            _mm_set1_epi16(model.g as u16 as i16),
            _mm_set1_epi16(model.b as u16 as i16),
        ];
        let bias = _mm_set1_epi32(model.bias);
        let zero = _mm_setzero_si128();

        // Process 16 pixels (48 bytes in, 16 bytes out) at a time
        while x + LANES <= width {
            let base = in_ptr.add(x * 3);
            let chunks = [
                _mm_loadu_si128(base as *const __m128i),
                _mm_loadu_si128(base.add(16) as *const __m128i),
                _mm_loadu_si128(base.add(32) as *const __m128i),
            ];

            let r = gather_channel(&chunks, ri);
            let g = gather_channel(&chunks, gi);
            let b = gather_channel(&chunks, bi);

            let lum_lo = luma8_sse2(
                _mm_unpacklo_epi8(r, zero),
                _mm_unpacklo_epi8(g, zero),
                _mm_unpacklo_epi8(b, zero),
                &weights,
                bias,
            );
            let lum_hi = luma8_sse2(
                _mm_unpackhi_epi8(r, zero),
                _mm_unpackhi_epi8(g, zero),
                _mm_unpackhi_epi8(b, zero),
                &weights,
                bias,
            );

            // Saturating pack doubles as the [0, 255] clamp
            _mm_storeu_si128(
                out_ptr.add(x) as *mut __m128i,
                _mm_packus_epi16(lum_lo, lum_hi),
            );
            x += LANES;
        }
    }

    // Process remaining pixels
    luma_row_scalar(&src[x * 3..], &mut dst[x..], order, model);
}

// ============== aarch64 NEON Implementation ==============

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn luma8_neon(r: uint16x8_t, g: uint16x8_t, b: uint16x8_t, model: &FixedPointWeights) -> uint8x8_t {
    let (wr, wg, wb) = (model.r as u16, model.g as u16, model.b as u16);

    unsafe {
        let bias = vdupq_n_u32(model.bias as u32);

        let mut lo = vmlal_n_u16(bias, vget_low_u16(r), wr);
        lo = vmlal_n_u16(lo, vget_low_u16(g), wg);
        lo = vmlal_n_u16(lo, vget_low_u16(b), wb);

        let mut hi = vmlal_n_u16(bias, vget_high_u16(r), wr);
        hi = vmlal_n_u16(hi, vget_high_u16(g), wg);
        hi = vmlal_n_u16(hi, vget_high_u16(b), wb);

        vqmovn_u16(vcombine_u16(vshrn_n_u32::<16>(lo), vshrn_n_u32::<16>(hi)))
    }
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn luma_row_neon(src: &[u8], dst: &mut [u8], order: ChannelOrder, model: &FixedPointWeights) {
    let width = dst.len().min(src.len() / 3);
    let in_ptr = src.as_ptr();
    let out_ptr = dst.as_mut_ptr();
    let mut x = 0;

    unsafe {
        // Process 16 pixels at a time using NEON
        while x + LANES <= width {
            let planes = vld3q_u8(in_ptr.add(x * 3));
            let (r, b) = match order {
                ChannelOrder::Bgr => (planes.2, planes.0),
                ChannelOrder::Rgb => (planes.0, planes.2),
            };
            let g = planes.1;

            let lum_lo = luma8_neon(
                vmovl_u8(vget_low_u8(r)),
                vmovl_u8(vget_low_u8(g)),
                vmovl_u8(vget_low_u8(b)),
                model,
            );
            let lum_hi = luma8_neon(
                vmovl_u8(vget_high_u8(r)),
                vmovl_u8(vget_high_u8(g)),
                vmovl_u8(vget_high_u8(b)),
                model,
            );
            vst1q_u8(out_ptr.add(x), vcombine_u8(lum_lo, lum_hi));
            x += LANES;
        }
    }

    // Process remaining pixels
    luma_row_scalar(&src[x * 3..], &mut dst[x..], order, model);
}
