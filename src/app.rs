//! Interactive measuring session.
//!
//! [`Cli`] is the command line. [`Session`] is the flow behind it: pick a
//! tablet, ask for the screen size and recording length, record, analyze,
//! print the report, and optionally record again with the same tablet and
//! screen. Every interactive piece (picker, prompts, pointer, sleep) is
//! injected so the whole flow runs from a script in tests.
//!
//! Any value given on the command line skips the matching question.

use crate::analyzer::UsageAreaAnalyzer;
use crate::catalog::{DeviceCatalog, DeviceSpec, TabletInventory};
use crate::config::{Config, StrategyKind};
use crate::error::{Error, Result};
use crate::geometry::ScreenGeometry;
use crate::menu::Selector;
use crate::pointer::PointerSource;
use crate::prompt::Prompter;
use crate::recorder::{CancelToken, Recorder, RecorderConfig};
use crate::report::Report;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug, Default)]
#[command(name = "padspan", author, version, about = "Measure the area of a drawing tablet you actually use", long_about = None)]
pub struct Cli {
    /// Config file (default: ./padspan.toml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON tablet inventory merged into the built-in catalog
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Tablet brand (skips the brand menu)
    #[arg(long)]
    pub brand: Option<String>,

    /// Tablet model (skips the model menu)
    #[arg(long)]
    pub model: Option<String>,

    /// Screen width in pixels
    #[arg(long, value_name = "PX")]
    pub screen_width: Option<u32>,

    /// Screen height in pixels
    #[arg(long, value_name = "PX")]
    pub screen_height: Option<u32>,

    /// Recording length in seconds
    #[arg(short, long, value_name = "SECS")]
    pub duration: Option<u32>,

    /// How the used extent is measured
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Measure the raw samples without rotation correction
    #[arg(long)]
    pub no_derotate: bool,

    /// Record once and exit
    #[arg(long)]
    pub once: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    BoundingBox,
    PeakNearExtremes,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::BoundingBox => StrategyKind::BoundingBox,
            StrategyArg::PeakNearExtremes => StrategyKind::PeakNearExtremes,
        }
    }
}

impl Cli {
    /// Load the config file and layer the command-line overrides on top.
    pub fn effective_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };
        if let Some(strategy) = self.strategy {
            config.analysis.strategy = strategy.into();
        }
        if self.no_derotate {
            config.analysis.derotate = false;
        }
        if let Some(path) = &self.catalog {
            config.catalog.inventory = Some(path.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// Map a finished run to the process exit status.
///
/// An unresolvable tablet exits with `1`, leaving the menus exits with `0`,
/// anything else that stopped the run exits with `2`.
pub fn exit_code(result: &Result<()>) -> ExitCode {
    match result {
        Ok(()) | Err(Error::SelectionCancelled) => ExitCode::SUCCESS,
        Err(e) if e.is_lookup_failure() => ExitCode::from(1),
        Err(_) => ExitCode::from(2),
    }
}

/// Ctrl+C routing: cancel the recording in flight, or quit when idle.
#[derive(Clone, Debug, Default)]
pub struct Interrupts {
    cancel: CancelToken,
    recording: Arc<AtomicBool>,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the process-wide Ctrl+C handler. Call once.
    pub fn install(&self) -> Result<()> {
        let this = self.clone();
        ctrlc::set_handler(move || {
            if this.recording.load(Ordering::SeqCst) {
                this.cancel.cancel();
            } else {
                std::process::exit(130);
            }
        })
        .map_err(|e| Error::InvalidInput(format!("cannot install Ctrl+C handler: {e}")))
    }

    pub fn token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn begin_recording(&self) {
        self.cancel.reset();
        self.recording.store(true, Ordering::SeqCst);
    }

    fn end_recording(&self) {
        self.recording.store(false, Ordering::SeqCst);
    }
}

/// Built-in catalog plus the configured inventory, if any.
///
/// Returns the inventory as well so a bare `--model` can be resolved
/// against it directly.
pub fn build_catalog(config: &Config) -> Result<(DeviceCatalog, Option<TabletInventory>)> {
    let mut catalog = DeviceCatalog::builtin();
    let inventory = match &config.catalog.inventory {
        Some(path) => {
            let inventory = TabletInventory::load(path)?;
            catalog.merge_inventory(&config.catalog.inventory_brand, &inventory)?;
            Some(inventory)
        }
        None => None,
    };
    Ok((catalog, inventory))
}

fn chosen(options: &[String], idx: usize) -> Result<String> {
    options
        .get(idx)
        .cloned()
        .ok_or_else(|| Error::InvalidInput(format!("selection {idx} out of range")))
}

type PointerFactory = Box<dyn FnMut() -> Box<dyn PointerSource>>;

/// One interactive run of the program.
pub struct Session<S, R, W> {
    cli: Cli,
    config: Config,
    catalog: DeviceCatalog,
    inventory: Option<TabletInventory>,
    selector: S,
    prompter: Prompter<R, W>,
    open_pointer: PointerFactory,
    sleep: fn(Duration),
    interrupts: Interrupts,
}

impl<S: Selector, R: BufRead, W: Write> Session<S, R, W> {
    pub fn new(
        cli: Cli,
        config: Config,
        catalog: DeviceCatalog,
        selector: S,
        prompter: Prompter<R, W>,
    ) -> Self {
        Self {
            cli,
            config,
            catalog,
            inventory: None,
            selector,
            prompter,
            open_pointer: Box::new(crate::backends::probe_pointer),
            sleep: std::thread::sleep,
            interrupts: Interrupts::new(),
        }
    }

    /// Inventory consulted for a `--model` given without `--brand`.
    pub fn with_inventory(mut self, inventory: Option<TabletInventory>) -> Self {
        self.inventory = inventory;
        self
    }

    /// Source opened at the start of every recording.
    pub fn with_pointer(mut self, open: impl FnMut() -> Box<dyn PointerSource> + 'static) -> Self {
        self.open_pointer = Box::new(open);
        self
    }

    /// Sleep used for recording ticks and the countdown.
    pub fn with_sleeper(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn with_interrupts(mut self, interrupts: Interrupts) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn prompter(&mut self) -> &mut Prompter<R, W> {
        &mut self.prompter
    }

    /// Resolve the tablet from flags, asking through the menus for what is missing.
    pub fn resolve_device(&mut self) -> Result<DeviceSpec> {
        if let (None, Some(model), Some(inventory)) =
            (&self.cli.brand, &self.cli.model, &self.inventory)
        {
            return inventory.find(&self.config.catalog.inventory_brand, model);
        }

        let brand = match &self.cli.brand {
            Some(brand) => brand.clone(),
            None => {
                let brands = self.catalog.brands();
                let idx = self.selector.select("Select tablet brand:", &brands)?;
                chosen(&brands, idx)?
            }
        };
        let model = match &self.cli.model {
            Some(model) => model.clone(),
            None => {
                let models = self.catalog.models(&brand);
                if models.is_empty() {
                    return Err(Error::LookupFailure {
                        brand,
                        model: String::new(),
                    });
                }
                let title = format!("Select {brand} model:");
                let idx = self.selector.select(&title, &models)?;
                chosen(&models, idx)?
            }
        };
        self.catalog.find(&brand, &model)
    }

    fn ask_screen(&mut self) -> Result<ScreenGeometry> {
        let width = match self.cli.screen_width {
            Some(w) => w,
            None => self.prompter.ask_at_least("Screen width (px)", 1)?,
        };
        let height = match self.cli.screen_height {
            Some(h) => h,
            None => self.prompter.ask_at_least("Screen height (px)", 1)?,
        };
        ScreenGeometry::new(width, height)
    }

    fn ask_duration(&mut self) -> Result<Duration> {
        let secs = match self.cli.duration {
            Some(s) => s,
            None => self.prompter.ask_at_least("Recording duration (s)", 1)?,
        };
        Ok(Duration::from_secs(u64::from(secs)))
    }

    fn record(&mut self, duration: Duration) -> Result<crate::sample::SampleSequence> {
        let rec = &self.config.recording;
        if rec.wait_for_enter {
            self.prompter
                .wait_for_enter("Press Enter to start recording...")?;
        }
        for left in (1..=rec.countdown_secs).rev() {
            writeln!(self.prompter.output(), "Starting in {left}...")?;
            (self.sleep)(Duration::from_secs(1));
        }
        writeln!(
            self.prompter.output(),
            "Recording for {} s. Draw as you normally would (Ctrl+C stops early).",
            duration.as_secs()
        )?;

        let config = RecorderConfig {
            duration,
            polling_hz: rec.polling_hz,
            on_unavailable: rec.on_unavailable,
        };
        let recorder = Recorder::new((self.open_pointer)(), config)
            .with_cancel(self.interrupts.token())
            .with_sleeper(self.sleep);

        self.interrupts.begin_recording();
        let result = recorder.try_record();
        self.interrupts.end_recording();
        result
    }

    /// Run until the user stops recording, or once with `--once`.
    pub fn run(&mut self) -> Result<()> {
        let device = self.resolve_device()?;
        info!(
            "tablet {} {}: {} x {} mm",
            device.brand, device.model, device.width_mm, device.height_mm
        );
        let screen = self.ask_screen()?;
        let duration = self.ask_duration()?;
        let analyzer = UsageAreaAnalyzer::new(self.config.analysis.analyzer_config());

        loop {
            let samples = self.record(duration)?;
            debug!("recorded {} sample(s)", samples.len());
            let outcome = analyzer.analyze(&samples, &device, &screen);
            let report = Report {
                device: &device,
                outcome: &outcome,
                strategy: analyzer.config().strategy,
                samples: samples.len(),
            };
            writeln!(self.prompter.output(), "{report}")?;

            if self.cli.once || !self.prompter.confirm("Record again?", true)? {
                return Ok(());
            }
        }
    }
}
