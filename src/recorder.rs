//! Fixed-cadence cursor recording.
//!
//! [`Recorder`] polls a [`PointerSource`] once per tick (10 ms at the default
//! 100 Hz) for a fixed duration. A recording of `d` seconds at `hz` produces
//! exactly `d × hz` samples unless it is cancelled through a [`CancelToken`].
//!
//! ## Lazy vs. collected
//! - [`Recorder::samples`] consumes the recorder and returns a lazy iterator.
//!   Each `next()` sleeps one tick and polls once. It cannot be restarted.
//! - [`Recorder::record`] / [`Recorder::try_record`] drive that iterator to the
//!   end and return a [`SampleSequence`].
//!
//! ## Failed polls
//! A failed poll never stops the loop. With [`UnavailablePolicy::Sentinel`]
//! the tick yields [`Sample::SENTINEL`] `(0, 0)`. With
//! [`UnavailablePolicy::Abort`] the iterator yields the error and
//! [`try_record`](Recorder::try_record) returns
//! [`Error::AcquisitionUnavailable`].

use crate::error::{Error, Result};
use crate::pointer::{PointerError, PointerSource};
use crate::sample::{Sample, SampleSequence};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default polling rate.
pub const DEFAULT_POLLING_HZ: u32 = 100;

/// What a tick produces when the pointer cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailablePolicy {
    /// Emit `(0, 0)` and keep going.
    #[default]
    Sentinel,
    /// Stop the recording with [`Error::AcquisitionUnavailable`].
    Abort,
}

/// Shared stop flag for an in-flight recording.
///
/// Clones share the same flag; cancelling any clone stops the recorder before
/// its next tick.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag so the token can guard another recording.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecorderConfig {
    pub duration: Duration,
    pub polling_hz: u32,
    pub on_unavailable: UnavailablePolicy,
}

impl RecorderConfig {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    /// Time between two polls. A zero rate is treated as 1 Hz.
    pub fn tick(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.polling_hz.max(1)))
    }

    /// Number of polls a full recording makes.
    pub fn total_ticks(&self) -> u64 {
        (self.duration.as_secs_f64() * self.polling_hz as f64).round() as u64
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            duration: Duration::ZERO,
            polling_hz: DEFAULT_POLLING_HZ,
            on_unavailable: UnavailablePolicy::Sentinel,
        }
    }
}

type Sleeper = Box<dyn FnMut(Duration) + Send>;

/// Polls a pointer source on a fixed cadence.
pub struct Recorder<P: PointerSource> {
    source: P,
    config: RecorderConfig,
    cancel: CancelToken,
    sleep: Sleeper,
}

impl<P: PointerSource> Recorder<P> {
    pub fn new(source: P, config: RecorderConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancelToken::new(),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Stop early when `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Replace the per-tick sleep (tests pass a no-op).
    pub fn with_sleeper(mut self, sleep: impl FnMut(Duration) + Send + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Lazy, finite, non-restartable stream of samples.
    pub fn samples(self) -> Samples<P> {
        let total = self.config.total_ticks();
        info!(
            "recording {} tick(s) at {} Hz from {} pointer",
            total,
            self.config.polling_hz,
            self.source.name()
        );
        Samples {
            recorder: self,
            remaining: total,
            failures: 0,
            done: false,
        }
    }

    /// Record for the full duration (or until cancelled). Failed polls become sentinels
    /// regardless of policy.
    pub fn record(mut self) -> SampleSequence {
        self.config.on_unavailable = UnavailablePolicy::Sentinel;
        self.samples().filter_map(|r| r.ok()).collect()
    }

    /// Record, honoring [`UnavailablePolicy::Abort`].
    pub fn try_record(self) -> Result<SampleSequence> {
        self.samples()
            .map(|r| r.map_err(|e| Error::AcquisitionUnavailable(e.to_string())))
            .collect::<Result<Vec<Sample>>>()
            .map(SampleSequence::from)
    }
}

/// Iterator returned by [`Recorder::samples`].
pub struct Samples<P: PointerSource> {
    recorder: Recorder<P>,
    remaining: u64,
    failures: u64,
    done: bool,
}

impl<P: PointerSource> Samples<P> {
    /// Polls that failed so far.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn finish(&mut self, why: &str) {
        self.done = true;
        debug!("recording finished ({why}), {} failed poll(s)", self.failures);
    }
}

impl<P: PointerSource> Iterator for Samples<P> {
    type Item = std::result::Result<Sample, PointerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.remaining == 0 {
            self.finish("duration elapsed");
            return None;
        }
        if self.recorder.cancel.is_cancelled() {
            info!("recording cancelled with {} tick(s) left", self.remaining);
            self.finish("cancelled");
            return None;
        }

        self.remaining -= 1;
        let polled = self.recorder.source.poll();
        let item = match polled {
            Ok(sample) => {
                #[cfg(feature = "debug-log")]
                log::trace!("[POLL] {} {:?}", self.recorder.source.name(), sample);
                Ok(sample)
            }
            Err(e) => {
                self.failures += 1;
                if self.failures == 1 {
                    warn!("pointer poll failed: {e}");
                } else {
                    debug!("pointer poll failed: {e}");
                }
                match self.recorder.config.on_unavailable {
                    UnavailablePolicy::Sentinel => Ok(Sample::SENTINEL),
                    UnavailablePolicy::Abort => {
                        self.finish("pointer unavailable");
                        return Some(Err(e));
                    }
                }
            }
        };

        let tick = self.recorder.config.tick();
        (self.recorder.sleep)(tick);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        (0, usize::try_from(self.remaining).ok())
    }
}
