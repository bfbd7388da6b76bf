//! Target size derivation

use crate::image::Dimensions;

/// How the frame decoder maps a frame onto the target dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Preserve aspect ratio, fit entirely inside the target box
    #[default]
    Fit,
    /// Preserve aspect ratio, cover the target box
    Fill,
    /// Stretch to the exact target dimensions
    Exact,
    /// No scaling
    None,
}

/// Fit `natural` inside a square of side `max_dimension`, keeping aspect ratio.
///
/// `max_dimension <= 0` means "original resolution" and returns `natural`.
/// The longer side becomes `max_dimension`; the shorter side is scaled by the
/// same ratio and truncated, never rounded.
pub fn fit(natural: Dimensions, max_dimension: i64) -> Dimensions {
    if max_dimension <= 0 {
        return natural;
    }
    let max = max_dimension.min(u32::MAX as i64) as u64;
    let (w, h) = (natural.width as u64, natural.height as u64);

    if h >= w {
        if h == 0 {
            return natural;
        }
        Dimensions::new((max * w / h) as u32, max as u32)
    } else {
        Dimensions::new(max as u32, (max * h / w) as u32)
    }
}
