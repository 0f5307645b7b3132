//! Measure how much of a drawing tablet's active area is actually used.
//!
//! The cursor is sampled at a fixed rate while the user draws normally. The
//! samples are outlier-filtered, corrected for a tilted drawing motion, and
//! their spread is converted from screen pixels to tablet millimeters.
//!
//! ```text
//! PointerSource ──► Recorder ──► SampleSequence ──► UsageAreaAnalyzer ──► Report
//!                                                        ▲
//!                        DeviceCatalog ──► DeviceSpec ───┘
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analyzer;
pub mod app;
pub mod backends;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod menu;
pub mod pointer;
pub mod prompt;
pub mod recorder;
pub mod report;
pub mod sample;

pub use analyzer::{
    analyze, AnalysisOutcome, AnalyzerConfig, ExtentStrategy, FilterMode, UsageAreaAnalyzer,
    UsageMeasurement,
};
pub use backends::{probe_pointer, ScriptedPointer};
pub use catalog::{DeviceCatalog, DeviceSpec, TabletInventory};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{ActiveRegionRatio, ScreenGeometry};
pub use pointer::{PointerError, PointerSource};
pub use recorder::{CancelToken, Recorder, RecorderConfig, UnavailablePolicy};
pub use report::Report;
pub use sample::{Sample, SampleSequence};
