//! Screen geometry and the active-region crop.
//!
//! The measurement assumes that the pen tablet's full active area is mapped to
//! a fixed sub-rectangle of the screen: the 1152×864 play field of a 1920×1080
//! reference display. [`ActiveRegionRatio::REFERENCE`] expresses that crop as
//! fractions so it can be applied to any resolution.
//!
//! # Conventions
//! - Pixel sizes are positive integers. [`ScreenGeometry::new`] rejects zero.
//! - The inner region is **truncated** to whole pixels.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// User-supplied screen resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    pub width_px: u32,
    pub height_px: u32,
}

impl ScreenGeometry {
    /// Validate and build a geometry. Both sides must be non-zero.
    pub fn new(width_px: u32, height_px: u32) -> Result<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(Error::InvalidInput(format!(
                "screen geometry must be positive, got {width_px}x{height_px}"
            )));
        }
        Ok(Self {
            width_px,
            height_px,
        })
    }

    /// Pixel size of the active region on this screen.
    pub fn inner_region(&self, ratio: ActiveRegionRatio) -> InnerRegion {
        InnerRegion {
            width_px: (ratio.x * self.width_px as f64) as u32,
            height_px: (ratio.y * self.height_px as f64) as u32,
        }
    }
}

/// Fraction of the screen that the tablet's active area maps onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveRegionRatio {
    pub x: f64,
    pub y: f64,
}

impl ActiveRegionRatio {
    /// 1152×864 out of 1920×1080.
    pub const REFERENCE: ActiveRegionRatio = ActiveRegionRatio {
        x: 1152.0 / 1920.0,
        y: 864.0 / 1080.0,
    };
}

impl Default for ActiveRegionRatio {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Truncated pixel size of the active region, the denominator of the mm conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InnerRegion {
    pub width_px: u32,
    pub height_px: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_screen_maps_to_play_field() {
        let screen = ScreenGeometry::new(1920, 1080).unwrap();
        let inner = screen.inner_region(ActiveRegionRatio::REFERENCE);
        assert_eq!(inner.width_px, 1152);
        assert_eq!(inner.height_px, 864);
    }

    #[test]
    fn inner_region_truncates() {
        // 0.6 * 1366 = 819.6, 0.8 * 768 = 614.4
        let screen = ScreenGeometry::new(1366, 768).unwrap();
        let inner = screen.inner_region(ActiveRegionRatio::default());
        assert_eq!(inner.width_px, 819);
        assert_eq!(inner.height_px, 614);
    }

    #[test]
    fn zero_sized_screen_is_rejected() {
        assert!(matches!(
            ScreenGeometry::new(0, 1080),
            Err(Error::InvalidInput(_))
        ));
        assert!(ScreenGeometry::new(1920, 0).is_err());
    }
}
