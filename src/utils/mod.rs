//! Color and geometry kernels
//!
//! This module provides:
//! - Fixed-point BT.709 luma weights
//! - Luma conversion (float, scalar fixed-point, vectorized)
//! - Bilinear resize (float reference, fixed-point optimized)

/// Fixed-point BT.709 luma model
pub mod fixed_point;
/// Luma conversion kernels
pub mod grayscale;
/// Bilinear resize kernels
pub mod resize;
