use padspan::app::{self, build_catalog, Cli, Session};
use padspan::menu::Selector;
use padspan::pointer::PointerError;
use padspan::prompt::Prompter;
use padspan::{
    analyze, AnalysisOutcome, AnalyzerConfig, Config, DeviceCatalog, DeviceSpec, Error,
    FilterMode, PointerSource, Recorder, RecorderConfig, SampleSequence, ScreenGeometry,
    ScriptedPointer, UsageAreaAnalyzer,
};
use std::io::Cursor;
use std::process::ExitCode;
use std::time::Duration;

const EPS: f64 = 1e-9;

fn no_sleep(_: Duration) {}

fn acme() -> DeviceSpec {
    DeviceSpec::new("Acme", "Pad", 300.0, 200.0).unwrap()
}

fn full_hd() -> ScreenGeometry {
    ScreenGeometry::new(1920, 1080).unwrap()
}

/// 61 points from x=400 to x=1000 at y=540.
fn horizontal_stroke() -> Vec<(i32, i32)> {
    (0..=60).map(|i| (400 + i * 10, 540)).collect()
}

fn line_at(degrees: f64, n: usize, step: f64) -> SampleSequence {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (0..n)
        .map(|i| {
            let t = i as f64 * step;
            ((500.0 + t * cos).round() as i32, (500.0 + t * sin).round() as i32)
        })
        .collect::<Vec<_>>()
        .into()
}

fn measured(outcome: AnalysisOutcome) -> padspan::UsageMeasurement {
    match outcome {
        AnalysisOutcome::Measured(m) => m,
        other => panic!("expected a measurement, got {other:?}"),
    }
}

#[test]
fn horizontal_line_measures_its_length() {
    let samples: SampleSequence = horizontal_stroke().into();
    let m = measured(analyze(&samples, &acme(), &full_hd()));
    assert!((m.width_mm - 600.0 * 300.0 / 1152.0).abs() < EPS);
    assert!(m.height_mm.abs() < EPS);
    assert!(m.rotation_deg.abs() < EPS);
}

#[test]
fn empty_recording_is_not_a_fault() {
    let outcome = analyze(&SampleSequence::default(), &acme(), &full_hd());
    assert_eq!(outcome, AnalysisOutcome::NoSamples);
    assert!(outcome.measurement().is_none());
}

#[test]
fn single_sample_is_insufficient() {
    let samples: SampleSequence = vec![(10, 10)].into();
    assert!(matches!(
        analyze(&samples, &acme(), &full_hd()),
        AnalysisOutcome::Insufficient { .. }
    ));
}

#[test]
fn tilted_stroke_rotation_is_recovered() {
    let samples = line_at(30.0, 200, 3.0);
    let m = measured(analyze(&samples, &acme(), &full_hd()));
    assert!((m.rotation_deg - 30.0).abs() < 2.0, "{}", m.rotation_deg);

    // Corrected, the stroke is as long as it was drawn and nearly flat.
    let length_mm = 199.0 * 3.0 * 300.0 / 1152.0;
    assert!((m.width_mm - length_mm).abs() < 1.0, "{}", m.width_mm);
    assert!(m.height_mm < 1.0, "{}", m.height_mm);

    let raw = UsageAreaAnalyzer::new(AnalyzerConfig {
        derotate: false,
        ..AnalyzerConfig::default()
    });
    let r = measured(raw.analyze(&samples, &acme(), &full_hd()));
    assert!(r.width_mm < m.width_mm);
    assert!(r.height_mm > m.height_mm);
}

#[test]
fn recorded_sentinels_are_filtered_out() {
    let mut pointer = ScriptedPointer::new("flaky");
    for (i, (x, y)) in horizontal_stroke().into_iter().enumerate() {
        if i == 30 {
            pointer.fail(PointerError::QueryFailed("display busy".into()));
            pointer.fail(PointerError::QueryFailed("display busy".into()));
        }
        pointer.move_to(x, y);
    }
    let cfg = RecorderConfig {
        duration: Duration::from_secs(1),
        polling_hz: 63,
        ..RecorderConfig::default()
    };
    let samples = Recorder::new(pointer, cfg).with_sleeper(no_sleep).record();
    assert_eq!(samples.len(), 63);
    assert_eq!(samples.iter().filter(|s| s.x == 0 && s.y == 0).count(), 2);

    let m = measured(analyze(&samples, &acme(), &full_hd()));
    assert!((m.width_mm - 156.25).abs() < EPS);
    assert!(m.height_mm.abs() < EPS);
}

#[test]
fn per_axis_and_paired_agree_without_outliers() {
    let samples = line_at(10.0, 150, 2.0);
    let paired = measured(analyze(&samples, &acme(), &full_hd()));
    let per_axis = UsageAreaAnalyzer::new(AnalyzerConfig {
        filter: FilterMode::PerAxis,
        ..AnalyzerConfig::default()
    });
    let p = measured(per_axis.analyze(&samples, &acme(), &full_hd()));
    assert!((paired.width_mm - p.width_mm).abs() < EPS);
    assert!((paired.height_mm - p.height_mm).abs() < EPS);
}

#[test]
fn analysis_leaves_samples_untouched() {
    let samples = line_at(45.0, 50, 4.0);
    let before = samples.clone();
    let _ = analyze(&samples, &acme(), &full_hd());
    assert_eq!(samples, before);
}

/// Picks options by label, in order.
struct ByName(Vec<&'static str>);

impl Selector for ByName {
    fn select(&mut self, _title: &str, options: &[String]) -> padspan::Result<usize> {
        if self.0.is_empty() {
            return Err(Error::SelectionCancelled);
        }
        let want = self.0.remove(0);
        options
            .iter()
            .position(|o| o == want)
            .ok_or(Error::SelectionCancelled)
    }
}

type Scripted = Session<ByName, Cursor<Vec<u8>>, Vec<u8>>;

fn session(
    cli: Cli,
    config: Config,
    catalog: DeviceCatalog,
    picks: Vec<&'static str>,
    input: &str,
) -> Scripted {
    Session::new(
        cli,
        config,
        catalog,
        ByName(picks),
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()),
    )
    .with_pointer(|| {
        Box::new(ScriptedPointer::from_points(horizontal_stroke())) as Box<dyn PointerSource>
    })
    .with_sleeper(no_sleep)
}

fn acme_catalog() -> DeviceCatalog {
    let mut catalog = DeviceCatalog::builtin();
    catalog.insert(acme()).unwrap();
    catalog
}

/// One sample per scripted point over a one second recording.
fn config_61hz() -> Config {
    let mut config = Config::default();
    config.recording.polling_hz = 61;
    config
}

fn output(session: &mut Scripted) -> String {
    String::from_utf8(session.prompter().output().clone()).unwrap()
}

#[test]
fn session_with_menus_and_prompts() {
    let mut s = session(
        Cli::default(),
        config_61hz(),
        acme_catalog(),
        vec!["Acme", "Pad"],
        "1920\n1080\n1\n\nn\n",
    );
    let result = s.run();
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(app::exit_code(&result), ExitCode::SUCCESS);

    let out = output(&mut s);
    assert!(out.contains("Screen width (px): "));
    assert!(out.contains("Press Enter to start recording..."));
    assert!(out.contains("Tablet: Acme Pad (300 x 200 mm)"));
    assert!(out.contains("Samples: 61"));
    assert!(out.contains("Used Area: 156.25 x 0.00 mm"));
    assert!(out.contains("Record again? [Y/n]"));
}

#[test]
fn record_again_reuses_device_and_screen() {
    let cli = Cli {
        brand: Some("Acme".into()),
        model: Some("Pad".into()),
        screen_width: Some(1920),
        screen_height: Some(1080),
        duration: Some(1),
        ..Cli::default()
    };
    let mut s = session(cli, config_61hz(), acme_catalog(), vec![], "\ny\n\nn\n");
    s.run().unwrap();
    let out = output(&mut s);
    assert_eq!(out.matches("==== RESULTS ====").count(), 2);
    assert!(!out.contains("Screen width"));
}

#[test]
fn zero_duration_reports_no_movement() {
    let cli = Cli {
        brand: Some("Acme".into()),
        model: Some("Pad".into()),
        screen_width: Some(1920),
        screen_height: Some(1080),
        duration: Some(0),
        once: true,
        ..Cli::default()
    };
    let mut config = config_61hz();
    config.recording.wait_for_enter = false;
    let mut s = session(cli, config, acme_catalog(), vec![], "");
    s.run().unwrap();
    let out = output(&mut s);
    assert!(out.contains("Samples: 0"));
    assert!(out.contains("No cursor movement was recorded."));
    assert!(!out.contains("Record again?"));
}

#[test]
fn unknown_tablet_exits_with_one() {
    let cli = Cli {
        brand: Some("Acme".into()),
        model: Some("Nope".into()),
        ..Cli::default()
    };
    let mut s = session(cli, config_61hz(), acme_catalog(), vec![], "");
    let result = s.run();
    assert!(matches!(result, Err(Error::LookupFailure { .. })));
    assert_eq!(app::exit_code(&result), ExitCode::from(1));
}

#[test]
fn leaving_the_menu_exits_cleanly() {
    let mut s = session(Cli::default(), config_61hz(), acme_catalog(), vec![], "");
    let result = s.run();
    assert!(matches!(result, Err(Error::SelectionCancelled)));
    assert_eq!(app::exit_code(&result), ExitCode::SUCCESS);
}

#[test]
fn inventory_model_resolves_without_brand() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tablets.json");
    std::fs::write(
        &path,
        r#"{"tablets": [{"model": "Pad", "width_mm": 300.0, "height_mm": 200.0}]}"#,
    )
    .unwrap();

    let mut config = config_61hz();
    config.catalog.inventory = Some(path);
    config.catalog.inventory_brand = "Lab".into();
    let (catalog, inventory) = build_catalog(&config).unwrap();
    assert_eq!(catalog.models("Lab"), vec!["Pad".to_string()]);

    let cli = Cli {
        model: Some("Pad".into()),
        ..Cli::default()
    };
    let mut s = session(cli, config.clone(), catalog.clone(), vec![], "")
        .with_inventory(inventory.clone());
    let device = s.resolve_device().unwrap();
    assert_eq!(device.brand, "Lab");
    assert_eq!(device.width_mm, 300.0);

    let cli = Cli {
        model: Some("Missing".into()),
        ..Cli::default()
    };
    let mut s = session(cli, config, catalog, vec![], "").with_inventory(inventory);
    let err = s.resolve_device().unwrap_err();
    assert!(matches!(err, Error::InventoryModelMissing { .. }));
    assert_eq!(app::exit_code(&Err(err)), ExitCode::from(1));
}
