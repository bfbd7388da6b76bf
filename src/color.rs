//! Output color configuration negotiation
//!
//! Maps the pixel format a host asks for onto one of the decode color
//! configurations the frame decoder can produce. The precedence in
//! [`resolve`] is fixed: hosts rely on it to trade fidelity against
//! compatibility.

/// Decode color configuration, fixed for the lifetime of a decode session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ColorConfig {
    /// Let the frame decoder pick its best internal representation
    #[default]
    Default,
    /// 8 bits per channel RGBA
    Rgba8888,
    /// 16-bit packed 5-6-5 RGB, no alpha
    Rgb565,
    /// Half-float RGBA
    RgbaF16,
    /// 10-10-10-2 packed RGBA
    Rgba1010102,
    /// Opaque GPU surface owned by the host
    HardwareOpaque,
}

/// Pixel format explicitly requested by the host, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum RequestedFormat {
    /// No explicit request
    #[default]
    Unspecified,
    /// 8-bit alpha-only
    Alpha8,
    /// 8-bit ARGB
    Argb8888,
    /// 5-6-5 RGB
    Rgb565,
    /// Half-float RGBA
    RgbaF16,
    /// Hardware surface
    Hardware,
    /// 10-10-10-2 RGBA
    Rgba1010102,
}

/// Output formats the host platform can actually display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCaps {
    /// Half-float surfaces are supported
    pub rgba_f16: bool,
    /// Opaque hardware surfaces are supported
    pub hardware: bool,
    /// 10-10-10-2 surfaces are supported
    pub rgba1010102: bool,
}

impl PlatformCaps {
    /// A platform that supports every optional format
    pub const ALL: Self = Self {
        rgba_f16: true,
        hardware: true,
        rgba1010102: true,
    };

    /// A platform with no optional formats
    pub const NONE: Self = Self {
        rgba_f16: false,
        hardware: false,
        rgba1010102: false,
    };
}

/// What the caller asked for, plus the caller's policy flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRequest {
    /// Explicitly requested format
    pub format: RequestedFormat,
    /// Caller accepts lossy 5-6-5 rendering
    pub allow_rgb565: bool,
    /// Caller accepts hardware surfaces
    pub allow_hardware: bool,
}

impl Default for ColorRequest {
    fn default() -> Self {
        Self {
            format: RequestedFormat::Unspecified,
            allow_rgb565: false,
            allow_hardware: true,
        }
    }
}

/// Resolve the decode color configuration for a request.
///
/// Total and pure. Platform-gated requests that the platform cannot honor
/// fall through to the final rule instead of failing.
pub fn resolve(request: &ColorRequest, caps: PlatformCaps) -> ColorConfig {
    match request.format {
        RequestedFormat::Alpha8 | RequestedFormat::Argb8888 => return ColorConfig::Rgba8888,
        RequestedFormat::RgbaF16 if caps.rgba_f16 => return ColorConfig::RgbaF16,
        RequestedFormat::Hardware if caps.hardware => return ColorConfig::HardwareOpaque,
        RequestedFormat::Rgba1010102 if caps.rgba1010102 => return ColorConfig::Rgba1010102,
        RequestedFormat::Rgb565 => {
            return if request.allow_rgb565 {
                ColorConfig::Rgb565
            } else {
                ColorConfig::Default
            };
        }
        _ => {}
    }

    if request.allow_hardware {
        ColorConfig::Default
    } else {
        ColorConfig::Rgba8888
    }
}
