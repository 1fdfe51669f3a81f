//! One Guo-Hall sub-iteration
//!
//! Both implementations scan interior pixels only (the outermost rows and
//! columns are never modified), write removal decisions into the marker
//! plane, then clear the marked pixels in one sweep.

use super::table::{Neighborhood, Parity, RemovalTable, is_removable};
use super::workspace::ThinningWorkspace;

/// A strategy for running one half-step of a thinning round
pub trait SubIteration {
    /// Mark and clear removable pixels for `parity`; true if any pixel
    /// was cleared
    fn apply(&self, workspace: &mut ThinningWorkspace, parity: Parity) -> bool;
}

/// Evaluates the predicate inline for every interior pixel
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceThinning;

impl SubIteration for ReferenceThinning {
    fn apply(&self, workspace: &mut ThinningWorkspace, parity: Parity) -> bool {
        let width = workspace.width();
        let height = workspace.height();
        let (im, marker) = workspace.scan_planes();

        for i in 1..height.saturating_sub(1) {
            for j in 1..width.saturating_sub(1) {
                let at = |y: usize, x: usize| im[y * width + x];
                let neighbors = Neighborhood([
                    at(i - 1, j),
                    at(i - 1, j + 1),
                    at(i, j + 1),
                    at(i + 1, j + 1),
                    at(i + 1, j),
                    at(i + 1, j - 1),
                    at(i, j - 1),
                    at(i - 1, j - 1),
                ]);

                if is_removable(neighbors, parity) {
                    marker[i * width + j] = 1;
                }
            }
        }

        workspace.clear_marked()
    }
}

/// Skips background pixels and looks removability up by neighbor code
#[derive(Debug, Clone, Copy)]
pub struct TableThinning {
    tables: [RemovalTable; 2],
}

impl TableThinning {
    /// Build the tables for both parities
    pub fn new() -> Self {
        Self {
            tables: [
                RemovalTable::build(Parity::Even),
                RemovalTable::build(Parity::Odd),
            ],
        }
    }

    /// Table used for `parity`
    pub fn table(&self, parity: Parity) -> &RemovalTable {
        &self.tables[parity.index()]
    }
}

impl Default for TableThinning {
    fn default() -> Self {
        Self::new()
    }
}

impl SubIteration for TableThinning {
    fn apply(&self, workspace: &mut ThinningWorkspace, parity: Parity) -> bool {
        let width = workspace.width();
        let height = workspace.height();
        let table = self.table(parity);
        let (im, marker) = workspace.scan_planes();

        for y in 1..height.saturating_sub(1) {
            let above = &im[(y - 1) * width..y * width];
            let row = &im[y * width..(y + 1) * width];
            let below = &im[(y + 1) * width..(y + 2) * width];
            let marker_row = &mut marker[y * width..(y + 1) * width];

            for x in 1..width.saturating_sub(1) {
                // Skeletons are sparse; most pixels end here
                if row[x] == 0 {
                    continue;
                }
                let code = above[x]
                    | (above[x + 1] << 1)
                    | (row[x + 1] << 2)
                    | (below[x + 1] << 3)
                    | (below[x] << 4)
                    | (below[x - 1] << 5)
                    | (row[x - 1] << 6)
                    | (above[x - 1] << 7);
                marker_row[x] = table.marker(code);
            }
        }

        workspace.clear_marked()
    }
}
