//! pixel_kernels - reference and optimized pixel kernels
//!
//! Two kernel families on dense 8-bit images, each with a simple
//! correctness-defining form and a faster form that produces identical
//! pixels:
//! - BT.709 luma conversion: scalar fixed point vs. 16-pixel SIMD groups
//! - Guo-Hall thinning: inline predicate vs. table lookup with
//!   background skipping
//!
//! A bilinear resize pair (float vs. fixed point, within 1 per sample) is
//! included as supporting code.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Error taxonomy for kernel precondition failures
pub mod error;
/// Core data structures (Image, PixelFormat, Shape, Size)
pub mod models;
/// Guo-Hall thinning (tables, sub-iterations, fixed-point loop)
pub mod thinning;
/// Harness helpers (random images, comparisons, file I/O, env config)
pub mod tools;
/// Color and geometry kernels (fixed point, luma, resize)
pub mod utils;

pub use error::{KernelError, Result};
pub use models::{Image, PixelFormat, Shape, Size};
pub use thinning::{
    Parity, RemovalTable, ThinningReport, ThinningWorkspace, skeletonize_optimized,
    skeletonize_reference,
};
pub use utils::grayscale::{ChannelOrder, luma_float, luma_optimized, luma_reference, to_luma};
pub use utils::resize::{resize, resize_optimized, resize_reference};

use thinning::{SubIteration, TableThinning, skeletonize_into, skeletonize_with};

/// Convert a BGR image to luma using the fastest available path
pub fn bgr_to_luma(src: &Image) -> Result<Image> {
    to_luma(src, ChannelOrder::Bgr)
}

/// Skeletonize a {0, 255} image using the optimized path
pub fn skeletonize(src: &Image) -> Result<Image> {
    skeletonize_optimized(src)
}

/// Skeletonize a color image: BT.709 luma, then pixels brighter than
/// `level` become foreground, then the optimized thinning
pub fn skeletonize_color(src: &Image, order: ChannelOrder, level: u8) -> Result<Image> {
    skeletonize_color_with(src, order, level, &TableThinning::new())
}

/// [`skeletonize_color`] with a caller-chosen thinning strategy
pub fn skeletonize_color_with<S: SubIteration + ?Sized>(
    src: &Image,
    order: ChannelOrder,
    level: u8,
    strategy: &S,
) -> Result<Image> {
    let gray = to_luma(src, order)?;
    skeletonize_with(&tools::threshold(&gray, level), strategy)
}

/// Thinning runner that keeps its removal tables and, optionally, its
/// scratch buffers across calls
pub struct Skeletonizer {
    strategy: TableThinning,
    /// Optional workspace for buffer reuse
    workspace: Option<ThinningWorkspace>,
}

impl Skeletonizer {
    /// Create a skeletonizer that allocates scratch buffers per call
    pub fn new() -> Self {
        Self {
            strategy: TableThinning::new(),
            workspace: None,
        }
    }

    /// Create a skeletonizer that reuses one workspace
    pub fn with_workspace() -> Self {
        Self {
            strategy: TableThinning::new(),
            workspace: Some(ThinningWorkspace::new()),
        }
    }

    /// Create a skeletonizer whose workspace starts with room for
    /// `capacity` pixels
    pub fn with_workspace_capacity(capacity: usize) -> Self {
        Self {
            strategy: TableThinning::new(),
            workspace: Some(ThinningWorkspace::with_capacity(capacity)),
        }
    }

    /// Skeletonize into a new image
    pub fn run(&mut self, src: &Image) -> Result<Image> {
        let mut dst = Image::default();
        self.run_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Skeletonize into `dst`, reshaping it if needed
    pub fn run_into(&mut self, src: &Image, dst: &mut Image) -> Result<ThinningReport> {
        match &mut self.workspace {
            Some(workspace) => skeletonize_into(src, dst, &self.strategy, workspace),
            None => {
                let mut workspace = ThinningWorkspace::new();
                skeletonize_into(src, dst, &self.strategy, &mut workspace)
            }
        }
    }
}

impl Default for Skeletonizer {
    fn default() -> Self {
        Self::new()
    }
}
