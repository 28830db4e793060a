use std::fmt;

/// Reasons a [`FireConfig`](crate::FireConfig) is rejected at construction.
///
/// The simulation itself has no runtime failure modes; every index it touches
/// is derived from dimensions checked here.
#[derive(Debug, Clone, PartialEq)]
pub enum FireError {
    /// A pixel dimension or cell size was zero.
    InvalidDimension { name: &'static str, value: u32 },
    /// The derived grid has no interior cells.
    GridTooSmall { width: usize, height: usize },
    /// The hotspot range `[margin, dim - 1 - margin]` is empty on some axis.
    HotspotRangeEmpty {
        width: usize,
        height: usize,
        margin: usize,
    },
    /// Any other out-of-range or non-finite parameter.
    InvalidParameter { name: &'static str, reason: String },
}

impl FireError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        FireError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireError::InvalidDimension { name, value } => {
                write!(f, "{name} must be > 0 (got {value})")
            }
            FireError::GridTooSmall { width, height } => {
                write!(f, "grid {width}x{height} is too small, need at least 3x3 cells")
            }
            FireError::HotspotRangeEmpty {
                width,
                height,
                margin,
            } => write!(
                f,
                "grid {width}x{height} leaves no room for hotspots with margin {margin} \
                 (need at least {}x{} cells)",
                2 * margin + 1,
                2 * margin + 1
            ),
            FireError::InvalidParameter { name, reason } => write!(f, "{name}: {reason}"),
        }
    }
}

impl std::error::Error for FireError {}
