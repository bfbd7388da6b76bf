//! Decoded frame types

use std::time::Duration;

use imgref::ImgVec;
use rgb::Rgba;

use crate::color::ColorConfig;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either side is strictly smaller than `other`'s
    pub fn is_smaller_than(&self, other: Dimensions) -> bool {
        self.width < other.width || self.height < other.height
    }
}

/// Pixels produced by the frame decoder for one frame
///
/// The variant follows the storage layout of the session's [`ColorConfig`].
/// `ColorConfig::Default` and `ColorConfig::HardwareOpaque` are free to pick
/// whichever layout the frame decoder prefers.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum PixelBuffer {
    /// 8-bit RGBA
    Rgba8(ImgVec<Rgba<u8>>),
    /// Packed 5-6-5 RGB
    Rgb565(ImgVec<u16>),
    /// Half-float RGBA, stored as raw IEEE 754 binary16 bits
    RgbaF16(ImgVec<Rgba<u16>>),
    /// Packed 10-10-10-2 RGBA
    Rgba1010102(ImgVec<u32>),
}

impl PixelBuffer {
    /// Get the width of the buffer
    pub fn width(&self) -> usize {
        match self {
            PixelBuffer::Rgba8(img) => img.width(),
            PixelBuffer::Rgb565(img) => img.width(),
            PixelBuffer::RgbaF16(img) => img.width(),
            PixelBuffer::Rgba1010102(img) => img.width(),
        }
    }

    /// Get the height of the buffer
    pub fn height(&self) -> usize {
        match self {
            PixelBuffer::Rgba8(img) => img.height(),
            PixelBuffer::Rgb565(img) => img.height(),
            PixelBuffer::RgbaF16(img) => img.height(),
            PixelBuffer::Rgba1010102(img) => img.height(),
        }
    }

    /// Size of the buffer
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width() as u32, self.height() as u32)
    }

    /// Bytes per pixel of the storage layout
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelBuffer::Rgba8(_) | PixelBuffer::Rgba1010102(_) => 4,
            PixelBuffer::Rgb565(_) => 2,
            PixelBuffer::RgbaF16(_) => 8,
        }
    }

    /// Raw bytes of the backing buffer, including any row padding
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PixelBuffer::Rgba8(img) => bytemuck::cast_slice(img.buf()),
            PixelBuffer::Rgb565(img) => bytemuck::cast_slice(img.buf()),
            PixelBuffer::RgbaF16(img) => bytemuck::cast_slice(img.buf()),
            PixelBuffer::Rgba1010102(img) => bytemuck::cast_slice(img.buf()),
        }
    }

    /// The color configuration this layout satisfies without conversion
    pub fn color_config(&self) -> ColorConfig {
        match self {
            PixelBuffer::Rgba8(_) => ColorConfig::Rgba8888,
            PixelBuffer::Rgb565(_) => ColorConfig::Rgb565,
            PixelBuffer::RgbaF16(_) => ColorConfig::RgbaF16,
            PixelBuffer::Rgba1010102(_) => ColorConfig::Rgba1010102,
        }
    }
}

/// A decoded, converted frame ready for display
///
/// Shared read-only with the renderer. A renderer that keeps a frame past
/// the store's next eviction holds its own reference; the store never
/// hands out mutable access.
#[derive(Debug)]
pub struct DecodedFrame {
    /// Frame index in the animation
    pub index: u32,
    /// Pixel data
    pub pixels: PixelBuffer,
    /// Size of `pixels`
    pub size: Dimensions,
    /// Display duration of this frame
    pub duration: Duration,
    /// Produced below the source's natural resolution
    pub is_sampled: bool,
}
