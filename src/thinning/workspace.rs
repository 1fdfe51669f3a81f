//! Reusable buffers for the thinning loop
//!
//! Holds three tightly packed planes of the image being thinned:
//! - the working image ({0, 1} values)
//! - the marker plane written by a sub-iteration
//! - the snapshot taken at the start of each round
//!
//! Sub-iterations read the working plane and write only the marker plane,
//! so every pixel of a pass sees the neighborhood as it was when the pass
//! started.

use crate::error::{KernelError, Result};
use crate::models::{Image, PixelFormat};

/// Double-buffered scratch space for Guo-Hall thinning
#[derive(Debug, Default, Clone)]
pub struct ThinningWorkspace {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    marker: Vec<u8>,
    snapshot: Vec<u8>,
}

impl ThinningWorkspace {
    /// Create an empty workspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workspace with room for `capacity` pixels per plane
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::with_capacity(capacity),
            marker: Vec::with_capacity(capacity),
            snapshot: Vec::with_capacity(capacity),
        }
    }

    /// Width of the loaded image
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the loaded image
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels each plane can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.pixels
            .capacity()
            .min(self.marker.capacity())
            .min(self.snapshot.capacity())
    }

    /// Working plane, {0, 1} per pixel
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Load a {0, 255} gray image as {0, 1}
    ///
    /// Fails on color images and on any value other than 0 or 255.
    pub fn load(&mut self, src: &Image) -> Result<()> {
        if src.format() != PixelFormat::Gray8 {
            return Err(KernelError::InvalidInput(format!(
                "thinning needs a single-channel image, got {} channels",
                src.channels()
            )));
        }
        for (y, row) in src.rows().enumerate() {
            if let Some(x) = row.iter().position(|&v| v != 0 && v != 255) {
                return Err(KernelError::InvalidInput(format!(
                    "thinning needs a binary image, found {} at ({}, {})",
                    row[x], x, y
                )));
            }
        }

        let len = src.width() * src.height();
        self.width = src.width();
        self.height = src.height();
        self.pixels.clear();
        self.pixels.reserve(len);
        for row in src.rows() {
            self.pixels.extend(row.iter().map(|&v| v / 255));
        }
        self.marker.clear();
        self.marker.resize(len, 0);
        self.snapshot.clear();
        self.snapshot.resize(len, 0);
        Ok(())
    }

    /// Write the working plane back as {0, 255}
    pub fn store(&self, dst: &mut Image) {
        dst.ensure_shape(self.width, self.height, PixelFormat::Gray8);
        if self.width == 0 {
            return;
        }
        for (y, src_row) in self.pixels.chunks_exact(self.width).enumerate() {
            for (out, &v) in dst.row_mut(y).iter_mut().zip(src_row) {
                *out = v * 255;
            }
        }
    }

    /// Number of foreground pixels in the working plane
    pub fn foreground_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v != 0).count()
    }

    pub(crate) fn take_snapshot(&mut self) {
        self.snapshot.copy_from_slice(&self.pixels);
    }

    /// Full-image comparison against the last snapshot
    pub(crate) fn changed_since_snapshot(&self) -> bool {
        self.pixels != self.snapshot
    }

    /// Working plane for reading, zeroed marker plane for writing
    pub(crate) fn scan_planes(&mut self) -> (&[u8], &mut [u8]) {
        self.marker.fill(0);
        (&self.pixels, &mut self.marker)
    }

    /// Clear every marked pixel (`pixel &= !marker`); true if any was set
    pub(crate) fn clear_marked(&mut self) -> bool {
        let mut cleared = 0u8;
        for (p, &m) in self.pixels.iter_mut().zip(&self.marker) {
            cleared |= *p & m;
            *p &= !m;
        }
        cleared != 0
    }
}
