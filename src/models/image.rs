use crate::error::{KernelError, Result};
use std::fmt;

/// Pixel layout of an [`Image`]. Every sample is an unsigned byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One channel per pixel.
    Gray8,
    /// Three interleaved channels per pixel.
    Color8,
}

impl PixelFormat {
    /// Number of bytes per pixel.
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Color8 => 3,
        }
    }
}

/// Width, height and channel count of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Bytes per pixel.
    pub channels: usize,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// Target dimensions for resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Size {
    /// Create a size
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Dense row-major byte image with an explicit row stride.
///
/// Rows never overlap: `stride >= width * channels`. Padding bytes between
/// rows are owned by the image but never read or written by kernels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Create a zero-filled image with a tight stride
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let stride = width * format.channels();
        Self {
            width,
            height,
            stride,
            format,
            data: vec![0; stride * height],
        }
    }

    /// Create a zero-filled image whose rows are `stride` bytes apart
    pub fn with_stride(
        width: usize,
        height: usize,
        format: PixelFormat,
        stride: usize,
    ) -> Result<Self> {
        let row_bytes = width * format.channels();
        if stride < row_bytes {
            return Err(KernelError::InvalidInput(format!(
                "stride {} is smaller than a {}-byte row",
                stride, row_bytes
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data: vec![0; stride * height],
        })
    }

    /// Wrap an existing tightly packed buffer
    pub fn from_raw(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        Self::from_raw_with_stride(width, height, format, width * format.channels(), data)
    }

    /// Wrap an existing buffer whose rows are `stride` bytes apart
    pub fn from_raw_with_stride(
        width: usize,
        height: usize,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self> {
        let row_bytes = width * format.channels();
        if stride < row_bytes {
            return Err(KernelError::InvalidInput(format!(
                "stride {} is smaller than a {}-byte row",
                stride, row_bytes
            )));
        }
        let required = if height == 0 {
            0
        } else {
            stride * (height - 1) + row_bytes
        };
        if data.len() < required {
            return Err(KernelError::InvalidInput(format!(
                "buffer holds {} bytes, {}x{} {:?} needs {}",
                data.len(),
                width,
                height,
                format,
                required
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance in bytes between the starts of two consecutive rows
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel layout
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Width, height and channel count
    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width,
            height: self.height,
            channels: self.channels(),
        }
    }

    /// Bytes of pixel data in one row (excludes stride padding)
    pub fn row_bytes(&self) -> usize {
        self.width * self.channels()
    }

    /// Pixel bytes of row `y`
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Mutable pixel bytes of row `y`
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// Iterate over the pixel bytes of every row, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Get channel `c` of pixel (x, y)
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[y * self.stride + x * self.channels() + c]
    }

    /// Set channel `c` of pixel (x, y)
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: u8) {
        let idx = y * self.stride + x * self.channels() + c;
        self.data[idx] = value;
    }

    /// Reallocate as a zero-filled tight image unless the shape already
    /// matches. A matching image keeps its buffer, stride and contents.
    pub fn ensure_shape(&mut self, width: usize, height: usize, format: PixelFormat) {
        if self.width != width || self.height != height || self.format != format {
            *self = Image::new(width, height, format);
        }
    }

    /// Copy the pixel rows into a tightly packed vector
    pub fn to_packed(&self) -> Vec<u8> {
        let mut packed = Vec::with_capacity(self.row_bytes() * self.height);
        for row in self.rows() {
            packed.extend_from_slice(row);
        }
        packed
    }

    /// Raw storage including stride padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Build a color image from an RGB buffer of the `image` crate
    pub fn from_rgb8(rgb: &image::RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            stride: width as usize * 3,
            format: PixelFormat::Color8,
            data: rgb.as_raw().clone(),
        }
    }

    /// Build a gray image from a luma buffer of the `image` crate
    pub fn from_luma8(gray: &image::GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            stride: width as usize,
            format: PixelFormat::Gray8,
            data: gray.as_raw().clone(),
        }
    }

    /// Convert a gray image into an `image` crate buffer
    ///
    /// Returns `None` for color images or dimensions beyond `u32`.
    pub fn to_luma8(&self) -> Option<image::GrayImage> {
        if self.format != PixelFormat::Gray8 {
            return None;
        }
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        image::GrayImage::from_raw(width, height, self.to_packed())
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new(0, 0, PixelFormat::Gray8)
    }
}
