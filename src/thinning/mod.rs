//! Guo-Hall skeletonization
//!
//! A round applies the even pass, then the odd pass, and the loop stops at
//! the first round that leaves the whole image unchanged. The reference and
//! optimized variants share that loop and differ only in the
//! [`SubIteration`] strategy plugged into it.

pub mod iteration;
pub mod table;
pub mod workspace;

pub use iteration::{ReferenceThinning, SubIteration, TableThinning};
pub use table::{Neighborhood, Parity, RemovalTable, is_removable};
pub use workspace::ThinningWorkspace;

use crate::error::Result;
use crate::models::Image;

/// Summary of one thinning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinningReport {
    /// Rounds executed, including the final unchanged one
    pub rounds: usize,
    /// Foreground pixels on entry
    pub foreground_before: usize,
    /// Foreground pixels of the skeleton
    pub foreground_after: usize,
}

/// Skeletonize a {0, 255} image into `dst` with the given strategy,
/// reusing `workspace` buffers
///
/// `dst` is reshaped to the source size if needed. On error `dst` is left
/// untouched.
pub fn skeletonize_into<S: SubIteration + ?Sized>(
    src: &Image,
    dst: &mut Image,
    strategy: &S,
    workspace: &mut ThinningWorkspace,
) -> Result<ThinningReport> {
    workspace.load(src)?;
    let foreground_before = workspace.foreground_count();

    let mut rounds = 0;
    loop {
        workspace.take_snapshot();
        let mut cleared = false;
        for parity in Parity::ROUND {
            cleared |= strategy.apply(workspace, parity);
        }
        rounds += 1;
        tracing::trace!(round = rounds, cleared, "thinning round complete");

        if !workspace.changed_since_snapshot() {
            break;
        }
    }

    workspace.store(dst);
    let report = ThinningReport {
        rounds,
        foreground_before,
        foreground_after: workspace.foreground_count(),
    };
    tracing::debug!(
        width = src.width(),
        height = src.height(),
        rounds = report.rounds,
        before = report.foreground_before,
        after = report.foreground_after,
        "thinning converged"
    );
    Ok(report)
}

/// Skeletonize with the given strategy into a new image
pub fn skeletonize_with<S: SubIteration + ?Sized>(src: &Image, strategy: &S) -> Result<Image> {
    let mut dst = Image::default();
    let mut workspace = ThinningWorkspace::with_capacity(src.width() * src.height());
    skeletonize_into(src, &mut dst, strategy, &mut workspace)?;
    Ok(dst)
}

/// Skeletonize with the inline predicate on every interior pixel
pub fn skeletonize_reference(src: &Image) -> Result<Image> {
    skeletonize_with(src, &ReferenceThinning)
}

/// Skeletonize with background skipping and table lookup
///
/// Pixel-identical to [`skeletonize_reference`]. The removal tables are
/// built once per call.
pub fn skeletonize_optimized(src: &Image) -> Result<Image> {
    skeletonize_with(src, &TableThinning::new())
}
