//! Request and playback configuration

use std::sync::Arc;

use crate::aspect::{self, ScaleMode};
use crate::color::{self, ColorConfig, ColorRequest, PlatformCaps, RequestedFormat};
use crate::image::Dimensions;
use crate::observer::FrameErrorObserver;

/// Default number of frames decoded ahead of the playback cursor
pub const DEFAULT_PREHEAT_FRAMES: usize = 6;

/// Size the host wants the result in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundingSize {
    /// Decode at natural resolution
    #[default]
    Original,
    /// Fit inside this box; 0 marks an undefined side
    Px {
        /// Box width in pixels
        width: u32,
        /// Box height in pixels
        height: u32,
    },
}

/// Per-request decode options
///
/// # Example
///
/// ```
/// use zenavif_anim::{BoundingSize, DecodeOptions, RequestedFormat};
///
/// let options = DecodeOptions::new()
///     .format(RequestedFormat::Argb8888)
///     .size(BoundingSize::Px { width: 480, height: 0 })
///     .animation(true);
/// ```
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub(crate) format: RequestedFormat,
    pub(crate) allow_rgb565: bool,
    pub(crate) allow_hardware: bool,
    pub(crate) platform: PlatformCaps,
    pub(crate) size: BoundingSize,
    pub(crate) animation: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            format: RequestedFormat::Unspecified,
            allow_rgb565: false,
            allow_hardware: true,
            platform: PlatformCaps::NONE,
            size: BoundingSize::Original,
            animation: true,
        }
    }
}

impl DecodeOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested pixel format
    pub fn format(mut self, format: RequestedFormat) -> Self {
        self.format = format;
        self
    }

    /// Allow lossy 5-6-5 output when it is requested
    pub fn allow_rgb565(mut self, allow: bool) -> Self {
        self.allow_rgb565 = allow;
        self
    }

    /// Allow hardware surfaces
    ///
    /// When disallowed, unspecified requests decode to 8-bit RGBA instead of
    /// the decoder's preferred representation.
    pub fn allow_hardware(mut self, allow: bool) -> Self {
        self.allow_hardware = allow;
        self
    }

    /// Declare which optional output formats the platform supports
    pub fn platform(mut self, caps: PlatformCaps) -> Self {
        self.platform = caps;
        self
    }

    /// Set the bounding size
    pub fn size(mut self, size: BoundingSize) -> Self {
        self.size = size;
        self
    }

    /// Enable or disable animation (default: enabled)
    ///
    /// Disabled animation decodes only the first frame, which is what a
    /// caller converting the image into another format wants.
    pub fn animation(mut self, enabled: bool) -> Self {
        self.animation = enabled;
        self
    }

    /// Whether animation is enabled
    pub fn animation_enabled(&self) -> bool {
        self.animation
    }

    /// Resolved color configuration for this request
    pub fn color_config(&self) -> ColorConfig {
        let request = ColorRequest {
            format: self.format,
            allow_rgb565: self.allow_rgb565,
            allow_hardware: self.allow_hardware,
        };
        color::resolve(&request, self.platform)
    }

    /// Target frame size for a source of the given natural size.
    ///
    /// Falls back to the natural size when fitting would collapse a side to
    /// zero, as happens for extreme aspect ratios.
    pub fn target_size(&self, natural: Dimensions) -> Dimensions {
        match self.size {
            BoundingSize::Original => natural,
            BoundingSize::Px { width, height } => {
                let fitted = aspect::fit(natural, width.max(height) as i64);
                if fitted.width == 0 || fitted.height == 0 {
                    natural
                } else {
                    fitted
                }
            }
        }
    }

    /// Scale mode passed to the frame decoder
    pub fn scale_mode(&self) -> ScaleMode {
        ScaleMode::Fit
    }
}

/// Playback settings shared by every player a dispatcher creates
#[derive(Clone)]
pub struct PlaybackConfig {
    pub(crate) preheat_frames: usize,
    pub(crate) observer: Option<Arc<dyn FrameErrorObserver>>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            preheat_frames: DEFAULT_PREHEAT_FRAMES,
            observer: None,
        }
    }
}

impl std::fmt::Debug for PlaybackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackConfig")
            .field("preheat_frames", &self.preheat_frames)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl PlaybackConfig {
    /// Create a playback configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many frames the preheat window holds (minimum 1)
    pub fn preheat_frames(mut self, frames: usize) -> Self {
        self.preheat_frames = frames.max(1);
        self
    }

    /// Install a failure observer
    pub fn observer(mut self, observer: Arc<dyn FrameErrorObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Configured preheat window capacity
    pub fn preheat_capacity(&self) -> usize {
        self.preheat_frames
    }
}
