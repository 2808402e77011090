//! Speed limit offset bands.
//!
//! The configured safety offset depends on how fast the road is. Four bands
//! are split at fixed breakpoints (m/s):
//!
//! ```text
//!   limit < 14        → offset 1   (below ~30 mph)
//!   14 ≤ limit < 24   → offset 2   (~30-45 mph)
//!   24 ≤ limit < 29   → offset 3   (~45-55 mph)
//!   limit ≥ 29        → offset 4   (~55 mph and up)
//! ```

use crate::units::UnitSystem;

/// Band breakpoints (m/s). Each is the inclusive lower bound of the next band.
pub const BAND_BREAKPOINTS: [f64; 3] = [14.0, 24.0, 29.0];

/// Configured offsets for the four bands, in m/s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffsetBands {
    offsets: [f64; 4],
}

impl OffsetBands {
    /// Create bands from offsets already in m/s.
    pub fn new(offsets: [f64; 4]) -> Self {
        Self { offsets }
    }

    /// Create bands from whole km/h or mph settings.
    ///
    /// Conversion happens here, once, not on every lookup.
    pub fn from_settings(settings: [i64; 4], units: UnitSystem) -> Self {
        Self {
            offsets: settings.map(|v| units.to_ms(v as f64)),
        }
    }

    /// Offsets for each band in m/s.
    pub fn offsets(&self) -> [f64; 4] {
        self.offsets
    }

    /// Index (0-3) of the band containing `limit`.
    pub fn band_index(limit: f64) -> usize {
        BAND_BREAKPOINTS
            .iter()
            .take_while(|&&breakpoint| limit >= breakpoint)
            .count()
    }

    /// Offset for a resolved limit.
    ///
    /// Only meaningful for a non-zero limit; callers must not add it to an
    /// unknown (zero) limit.
    pub fn offset_for(&self, limit: f64) -> f64 {
        self.offsets[Self::band_index(limit)]
    }
}
