//! Fixed-point luma model (16 fractional bits)
//!
//! The BT.709 weights are scaled by 2^16 and rounded once, when the model
//! is built. Per-pixel work is then three integer multiplies, two adds,
//! one bias add and a shift:
//!
//! Y = (13933*R + 46871*G + 4732*B + 32768) >> 16
//!
//! The three weights sum to exactly 65536, so full white stays 255.

/// Number of fractional bits
pub const FIXED_SHIFT: u32 = 16;
/// Scaling factor: 2^16 = 65536
const SCALE: f64 = (1u32 << FIXED_SHIFT) as f64;

/// Floating-point luma coefficients for red, green and blue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaWeights {
    /// Red coefficient
    pub r: f64,
    /// Green coefficient
    pub g: f64,
    /// Blue coefficient
    pub b: f64,
}

impl LumaWeights {
    /// ITU-R BT.709 coefficients
    pub const BT709: LumaWeights = LumaWeights {
        r: 0.2126,
        g: 0.7152,
        b: 0.0722,
    };

    /// Floating-point luma, rounded half up
    pub fn apply_float(&self, r: u8, g: u8, b: u8) -> u8 {
        let color = (self.r * r as f64 + self.g * g as f64 + self.b * b as f64) as f32;
        (color + 0.5) as u8
    }
}

/// Integer weights and rounding bias derived from [`LumaWeights`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointWeights {
    /// Red weight scaled by 2^16
    pub r: i32,
    /// Green weight scaled by 2^16
    pub g: i32,
    /// Blue weight scaled by 2^16
    pub b: i32,
    /// Rounding bias, 0.5 scaled by 2^16
    pub bias: i32,
}

impl FixedPointWeights {
    /// Scale and round floating-point weights
    pub fn new(weights: LumaWeights) -> Self {
        Self {
            r: (weights.r * SCALE).round() as i32,
            g: (weights.g * SCALE).round() as i32,
            b: (weights.b * SCALE).round() as i32,
            bias: (0.5 * SCALE).round() as i32,
        }
    }

    /// Fixed-point model of [`LumaWeights::BT709`]
    pub fn bt709() -> Self {
        Self::new(LumaWeights::BT709)
    }

    /// Sum of the three channel weights
    pub fn total(&self) -> i32 {
        self.r + self.g + self.b
    }

    /// Luma of one pixel
    #[inline(always)]
    pub fn apply(&self, r: u8, g: u8, b: u8) -> u8 {
        let acc = self.r * r as i32 + self.g * g as i32 + self.b * b as i32 + self.bias;
        (acc >> FIXED_SHIFT).clamp(0, 255) as u8
    }
}

impl Default for FixedPointWeights {
    fn default() -> Self {
        Self::bt709()
    }
}
