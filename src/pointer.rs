//! Pointer position capability.
//!
//! [`PointerSource`] is the only seam between padspan and the windowing system.
//! Backends in [`backends`](crate::backends) implement it per platform; the
//! recorder and analyzer never touch a platform API directly.

use crate::sample::Sample;

/// Why a single poll produced no position.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    /// No display server / session to query (headless, SSH, Wayland without XWayland, ...).
    #[error("no display available: {0}")]
    NoDisplay(String),

    /// The platform call was made but returned no position.
    #[error("pointer query failed: {0}")]
    QueryFailed(String),

    /// A scripted source ran out of positions.
    #[error("pointer source exhausted")]
    Exhausted,
}

/// Anything that can report the current cursor position in screen pixels.
pub trait PointerSource {
    /// Read the cursor position once. Must not block beyond the platform call.
    fn poll(&mut self) -> Result<Sample, PointerError>;

    /// Short backend label for logs (`"win32"`, `"x11"`, ...).
    fn name(&self) -> &str;
}

impl<P: PointerSource + ?Sized> PointerSource for Box<P> {
    fn poll(&mut self) -> Result<Sample, PointerError> {
        (**self).poll()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Source used when no backend could be opened. Every poll fails.
#[derive(Clone, Debug)]
pub struct UnavailablePointer {
    reason: String,
}

impl UnavailablePointer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl PointerSource for UnavailablePointer {
    fn poll(&mut self) -> Result<Sample, PointerError> {
        Err(PointerError::NoDisplay(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
