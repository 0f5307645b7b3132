//! Console report for one analysis.

use crate::analyzer::{AnalysisOutcome, ExtentStrategy};
use crate::catalog::DeviceSpec;
use std::fmt;

/// Human-readable results block.
pub struct Report<'a> {
    pub device: &'a DeviceSpec,
    pub outcome: &'a AnalysisOutcome,
    pub strategy: ExtentStrategy,
    pub samples: usize,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "==== RESULTS ====")?;
        writeln!(
            f,
            "Tablet: {} {} ({} x {} mm)",
            self.device.brand, self.device.model, self.device.width_mm, self.device.height_mm
        )?;
        writeln!(f, "Samples: {}", self.samples)?;
        match self.outcome {
            AnalysisOutcome::NoSamples => {
                writeln!(f, "No cursor movement was recorded.")?;
            }
            AnalysisOutcome::Insufficient {
                retained_x,
                retained_y,
            } => {
                writeln!(
                    f,
                    "Not enough data: {retained_x} x / {retained_y} y sample(s) left after outlier removal (need 2)."
                )?;
            }
            AnalysisOutcome::Measured(m) => {
                writeln!(f, "Used Area: {:.2} x {:.2} mm", m.width_mm, m.height_mm)?;
                if m.derotated {
                    writeln!(f, "Rotation: {:.2} deg", m.rotation_deg)?;
                }
                writeln!(
                    f,
                    "Method: {}{}",
                    self.strategy.name(),
                    if m.derotated { ", rotation corrected" } else { "" }
                )?;
            }
        }
        write!(f, "=================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::UsageMeasurement;

    fn device() -> DeviceSpec {
        DeviceSpec::new("Wacom", "CTL-472", 152.0, 95.0).unwrap()
    }

    #[test]
    fn measured_report_shows_area_and_rotation() {
        let outcome = AnalysisOutcome::Measured(UsageMeasurement {
            width_mm: 120.456,
            height_mm: 80.0,
            rotation_deg: -3.25,
            derotated: true,
        });
        let text = Report {
            device: &device(),
            outcome: &outcome,
            strategy: ExtentStrategy::BoundingBox,
            samples: 1000,
        }
        .to_string();
        assert!(text.contains("Used Area: 120.46 x 80.00 mm"));
        assert!(text.contains("Rotation: -3.25 deg"));
        assert!(text.contains("Method: bounding box, rotation corrected"));
        assert!(text.contains("Tablet: Wacom CTL-472 (152 x 95 mm)"));
    }

    #[test]
    fn rotation_hidden_without_correction() {
        let outcome = AnalysisOutcome::Measured(UsageMeasurement {
            width_mm: 1.0,
            height_mm: 2.0,
            rotation_deg: 10.0,
            derotated: false,
        });
        let text = Report {
            device: &device(),
            outcome: &outcome,
            strategy: ExtentStrategy::peak_near_extremes(),
            samples: 3,
        }
        .to_string();
        assert!(!text.contains("Rotation"));
        assert!(text.contains("Method: peak near extremes\n"));
    }

    #[test]
    fn insufficient_is_reported_distinctly() {
        let outcome = AnalysisOutcome::Insufficient {
            retained_x: 1,
            retained_y: 1,
        };
        let text = Report {
            device: &device(),
            outcome: &outcome,
            strategy: ExtentStrategy::BoundingBox,
            samples: 1,
        }
        .to_string();
        assert!(text.contains("Not enough data: 1 x / 1 y sample(s)"));
        assert!(!text.contains("Used Area"));
    }
}
