use padspan::{
    AnalyzerConfig, DeviceCatalog, ExtentStrategy, Recorder, RecorderConfig, Report,
    ScreenGeometry, ScriptedPointer, UsageAreaAnalyzer,
};
use std::time::Duration;

fn main() -> padspan::Result<()> {
    // A tilted back-and-forth stroke, about 8 degrees off horizontal.
    let stroke = (0..300).map(|i| {
        let t = (i % 100) as f64 * 6.0;
        let x = 660.0 + t * 8f64.to_radians().cos();
        let y = 480.0 + t * 8f64.to_radians().sin();
        (x.round() as i32, y.round() as i32)
    });
    let pointer = ScriptedPointer::from_points(stroke).hold_last();

    // 3 s at 100 Hz, without real-time sleeping.
    let samples = Recorder::new(pointer, RecorderConfig::new(Duration::from_secs(3)))
        .with_sleeper(|_| {})
        .record();

    let device = DeviceCatalog::builtin().find("Wacom", "CTL-472 (One by Wacom S)")?;
    let screen = ScreenGeometry::new(1920, 1080)?;

    for strategy in [ExtentStrategy::BoundingBox, ExtentStrategy::peak_near_extremes()] {
        let analyzer = UsageAreaAnalyzer::new(AnalyzerConfig {
            strategy,
            ..AnalyzerConfig::default()
        });
        let outcome = analyzer.analyze(&samples, &device, &screen);
        println!(
            "{}",
            Report {
                device: &device,
                outcome: &outcome,
                strategy,
                samples: samples.len(),
            }
        );
    }
    Ok(())
}
