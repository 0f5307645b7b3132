//! Usage-area analysis.
//!
//! Turns a noisy, time-ordered [`SampleSequence`] into a [`UsageMeasurement`]:
//! how many millimeters of the tablet's active area the recorded motion spans
//! on each axis, and the dominant rotation of that motion.
//!
//! ## Pipeline
//! 1. Split samples into `xs`/`ys` (index-aligned).
//! 2. Reject outliers with a `mean ± sigma·stddev` band per axis ([`SigmaBand`]).
//!    [`FilterMode::Paired`] drops a whole sample when either coordinate is out
//!    of band, keeping x/y aligned. [`FilterMode::PerAxis`] filters each axis on
//!    its own; pairs are then re-formed by position and may no longer be the
//!    samples that were recorded together.
//! 3. Fewer than 2 retained values on either axis ⇒ [`AnalysisOutcome::Insufficient`].
//! 4. Rotation = `atan2(ΣΔy, ΣΔx)` over consecutive retained points.
//! 5. Optionally rotate every retained point by `-rotation` around the
//!    pre-filter mean so the dominant motion lies on the x axis.
//! 6. Measure each axis with an [`ExtentStrategy`].
//! 7. Scale pixels to millimeters against the screen's active region.
//!
//! The analyzer is pure: no I/O, no shared state, input is borrowed immutably.
//!
//! # Example
//! ```
//! use padspan::{analyze, AnalysisOutcome, DeviceSpec, SampleSequence, ScreenGeometry};
//!
//! let samples: SampleSequence = (0..=60).map(|i| (400 + i * 10, 540)).collect::<Vec<_>>().into();
//! let device = DeviceSpec::new("Acme", "Pad", 300.0, 200.0).unwrap();
//! let screen = ScreenGeometry::new(1920, 1080).unwrap();
//!
//! match analyze(&samples, &device, &screen) {
//!     AnalysisOutcome::Measured(m) => assert!((m.width_mm - 156.25).abs() < 1e-9),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

use crate::catalog::DeviceSpec;
use crate::geometry::{ActiveRegionRatio, ScreenGeometry};
use crate::sample::SampleSequence;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default half-width of the outlier band, in standard deviations.
pub const DEFAULT_SIGMA: f64 = 3.0;

/// Default band, in percent of the value range, searched by [`ExtentStrategy::PeakNearExtremes`].
pub const DEFAULT_PEAK_THRESHOLD_PERCENT: f64 = 5.0;

/// How outliers are removed before measuring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Drop a sample if either coordinate is out of band. Keeps x/y aligned.
    #[default]
    Paired,
    /// Filter each axis independently. Alignment is best-effort.
    PerAxis,
}

/// Algorithm used to turn one axis of retained values into a pixel extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ExtentStrategy {
    /// `max - min`.
    #[default]
    BoundingBox,
    /// Most frequent value within `threshold_percent` of the range from each end.
    PeakNearExtremes { threshold_percent: f64 },
}

impl ExtentStrategy {
    /// Peak-near-extremes with the default 5% band.
    pub fn peak_near_extremes() -> Self {
        ExtentStrategy::PeakNearExtremes {
            threshold_percent: DEFAULT_PEAK_THRESHOLD_PERCENT,
        }
    }

    /// Extent of `values` in the same unit as the values. Empty input yields `0.0`.
    pub fn extent(&self, values: &[f64]) -> f64 {
        let (lo, hi) = match *self {
            ExtentStrategy::BoundingBox => match min_max(values) {
                Some(bounds) => bounds,
                None => return 0.0,
            },
            ExtentStrategy::PeakNearExtremes { threshold_percent } => {
                match peak_near_extremes(values, threshold_percent) {
                    Some(bounds) => bounds,
                    None => return 0.0,
                }
            }
        };
        hi - lo
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExtentStrategy::BoundingBox => "bounding box",
            ExtentStrategy::PeakNearExtremes { .. } => "peak near extremes",
        }
    }
}

/// Analyzer knobs. `Default` is the canonical pipeline: paired 3σ filter,
/// de-rotation, bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyzerConfig {
    pub filter: FilterMode,
    pub strategy: ExtentStrategy,
    pub derotate: bool,
    pub sigma: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            filter: FilterMode::Paired,
            strategy: ExtentStrategy::BoundingBox,
            derotate: true,
            sigma: DEFAULT_SIGMA,
        }
    }
}

/// Used tablet area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UsageMeasurement {
    pub width_mm: f64,
    pub height_mm: f64,
    /// Dominant motion angle in degrees, `(-180, 180]`.
    pub rotation_deg: f64,
    /// Whether extents were measured in the de-rotated frame.
    pub derotated: bool,
}

/// Result of one analysis run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnalysisOutcome {
    /// Nothing was recorded. Not an error.
    NoSamples,
    /// Too few samples survived filtering to measure anything.
    Insufficient { retained_x: usize, retained_y: usize },
    Measured(UsageMeasurement),
}

impl AnalysisOutcome {
    pub fn measurement(&self) -> Option<&UsageMeasurement> {
        match self {
            AnalysisOutcome::Measured(m) => Some(m),
            _ => None,
        }
    }
}

/// Acceptance band `mean ± sigma·std_dev` for one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SigmaBand {
    pub mean: f64,
    pub std_dev: f64,
    pub sigma: f64,
}

impl SigmaBand {
    /// Strictly inside the band. A zero-spread band accepts only the mean itself.
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        if self.std_dev == 0.0 {
            return v == self.mean;
        }
        let half = self.sigma * self.std_dev;
        v > self.mean - half && v < self.mean + half
    }

    pub fn filter(&self, values: &[f64]) -> Vec<f64> {
        values.iter().copied().filter(|&v| self.contains(v)).collect()
    }
}

/// Arithmetic mean; `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population (divide-by-n) standard deviation; `None` for empty input.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Band computed from `values` themselves.
pub fn sigma_band(values: &[f64], sigma: f64) -> Option<SigmaBand> {
    Some(SigmaBand {
        mean: mean(values)?,
        std_dev: population_std_dev(values)?,
        sigma,
    })
}

/// Net direction of motion, in radians: `atan2(ΣΔy, ΣΔx)` over consecutive points.
///
/// Fewer than two points, or no net motion, yields `0.0`.
pub fn estimate_rotation(points: &[(f64, f64)]) -> f64 {
    let (sum_dx, sum_dy) = points
        .windows(2)
        .fold((0.0_f64, 0.0_f64), |(sx, sy), w| {
            (sx + (w[1].0 - w[0].0), sy + (w[1].1 - w[0].1))
        });
    sum_dy.atan2(sum_dx)
}

/// Rotate `points` by `-angle` radians around `pivot`. Output is pivot-relative.
pub fn derotate(points: &[(f64, f64)], pivot: (f64, f64), angle: f64) -> Vec<(f64, f64)> {
    let theta = -angle;
    let (sin, cos) = theta.sin_cos();
    points
        .iter()
        .map(|&(x, y)| {
            let cx = x - pivot.0;
            let cy = y - pivot.1;
            (cx * cos - cy * sin, cx * sin + cy * cos)
        })
        .collect()
}

/// `(min, max)` of `values`; `None` if empty.
fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Mode-based boundary estimate.
///
/// Values within `threshold_percent` of the range from each end are binned to
/// the nearest integer; the most frequent bin on each side is the boundary.
/// Ties go to the smaller value.
pub fn peak_near_extremes(values: &[f64], threshold_percent: f64) -> Option<(f64, f64)> {
    let (min, max) = min_max(values)?;
    let band = (max - min) * (threshold_percent / 100.0);

    let near_min = values.iter().copied().filter(|&v| v <= min + band);
    let near_max = values.iter().copied().filter(|&v| v >= max - band);

    let lo = mode_of(near_min).map(|b| b as f64).unwrap_or(min);
    let hi = mode_of(near_max).map(|b| b as f64).unwrap_or(max);
    Some((lo, hi))
}

fn mode_of(values: impl Iterator<Item = f64>) -> Option<i64> {
    let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
    for v in values {
        *histogram.entry(v.round() as i64).or_default() += 1;
    }
    let mut best: Option<(i64, usize)> = None;
    for (bin, count) in histogram {
        match best {
            Some((_, c)) if c >= count => {}
            _ => best = Some((bin, count)),
        }
    }
    best.map(|(bin, _)| bin)
}

/// Sample-to-millimeter analyzer.
#[derive(Clone, Debug, Default)]
pub struct UsageAreaAnalyzer {
    config: AnalyzerConfig,
    ratio: ActiveRegionRatio,
}

impl UsageAreaAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ratio: ActiveRegionRatio::REFERENCE,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        samples: &SampleSequence,
        device: &DeviceSpec,
        screen: &ScreenGeometry,
    ) -> AnalysisOutcome {
        if samples.is_empty() {
            debug!("no samples recorded; nothing to analyze");
            return AnalysisOutcome::NoSamples;
        }

        let xs: Vec<f64> = samples.iter().map(|s| s.x as f64).collect();
        let ys: Vec<f64> = samples.iter().map(|s| s.y as f64).collect();

        // Non-empty input, so both bands exist.
        let (Some(band_x), Some(band_y)) = (
            sigma_band(&xs, self.config.sigma),
            sigma_band(&ys, self.config.sigma),
        ) else {
            return AnalysisOutcome::NoSamples;
        };

        let (fx, fy): (Vec<f64>, Vec<f64>) = match self.config.filter {
            FilterMode::Paired => xs
                .iter()
                .zip(&ys)
                .filter(|&(&x, &y)| band_x.contains(x) && band_y.contains(y))
                .map(|(&x, &y)| (x, y))
                .unzip(),
            FilterMode::PerAxis => (band_x.filter(&xs), band_y.filter(&ys)),
        };

        debug!(
            "{:?} filter kept x {}/{} (mean {:.1}, sd {:.1}), y {}/{} (mean {:.1}, sd {:.1})",
            self.config.filter,
            fx.len(),
            xs.len(),
            band_x.mean,
            band_x.std_dev,
            fy.len(),
            ys.len(),
            band_y.mean,
            band_y.std_dev
        );

        if fx.len() < 2 || fy.len() < 2 {
            return AnalysisOutcome::Insufficient {
                retained_x: fx.len(),
                retained_y: fy.len(),
            };
        }

        // Paired: exact pairs. PerAxis: positional, truncated to the shorter axis.
        let points: Vec<(f64, f64)> = fx.iter().copied().zip(fy.iter().copied()).collect();
        let angle = estimate_rotation(&points);

        let (width_px, height_px) = if self.config.derotate {
            let rotated = derotate(&points, (band_x.mean, band_y.mean), angle);
            let (rx, ry): (Vec<f64>, Vec<f64>) = rotated.into_iter().unzip();
            (
                self.config.strategy.extent(&rx),
                self.config.strategy.extent(&ry),
            )
        } else {
            (
                self.config.strategy.extent(&fx),
                self.config.strategy.extent(&fy),
            )
        };

        let inner = screen.inner_region(self.ratio);
        // Sub-2px screens truncate to a zero-pixel region; avoid dividing by it.
        let inner_w = inner.width_px.max(1) as f64;
        let inner_h = inner.height_px.max(1) as f64;

        let measurement = UsageMeasurement {
            width_mm: width_px * device.width_mm / inner_w,
            height_mm: height_px * device.height_mm / inner_h,
            rotation_deg: angle.to_degrees(),
            derotated: self.config.derotate,
        };
        debug!(
            "{} extent {:.1} x {:.1} px over {} x {} px region, rotation {:.2} deg",
            self.config.strategy.name(),
            width_px,
            height_px,
            inner.width_px,
            inner.height_px,
            measurement.rotation_deg
        );
        AnalysisOutcome::Measured(measurement)
    }
}

/// Run the canonical pipeline ([`AnalyzerConfig::default`]).
pub fn analyze(
    samples: &SampleSequence,
    device: &DeviceSpec,
    screen: &ScreenGeometry,
) -> AnalysisOutcome {
    UsageAreaAnalyzer::default().analyze(samples, device, screen)
}
