//! Pointer backends for `padspan`.
//!
//! Implementations of [`PointerSource`](crate::pointer::PointerSource) for
//! platform-specific cursor queries, plus a scripted replay source.
//!
//! # Feature flags
//! - **`native`**: enables the platform backends (default). Without it,
//!   [`probe_pointer`] always returns an [`UnavailablePointer`].
//!
//! | Platform            | Backend                     | API                |
//! |---------------------|-----------------------------|--------------------|
//! | Windows             | `windows::Win32Pointer`     | `GetCursorPos`     |
//! | Linux / BSD         | `x11::X11Pointer`           | X11 `QueryPointer` |
//! | macOS               | `macos::QuartzPointer`      | `CGEventGetLocation` |

use crate::pointer::{PointerSource, UnavailablePointer};
use log::{info, warn};

pub mod scripted;

#[cfg(all(feature = "native", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "native", target_os = "windows"))))]
pub mod windows;

#[cfg(all(feature = "native", unix, not(target_os = "macos")))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "native", unix, not(target_os = "macos")))))]
pub mod x11;

#[cfg(all(feature = "native", target_os = "macos"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "native", target_os = "macos"))))]
pub mod macos;

pub use scripted::ScriptedPointer;

/// Open the pointer backend for this platform.
///
/// Never fails: if the backend cannot be opened the reason is logged and an
/// [`UnavailablePointer`] is returned, so the recorder's unavailable-pointer
/// policy decides what happens next.
pub fn probe_pointer() -> Box<dyn PointerSource> {
    match open_native() {
        Ok(source) => {
            info!("using {} pointer backend", source.name());
            source
        }
        Err(reason) => {
            warn!("no pointer backend: {reason}");
            Box::new(UnavailablePointer::new(reason))
        }
    }
}

#[cfg(all(feature = "native", target_os = "windows"))]
fn open_native() -> Result<Box<dyn PointerSource>, String> {
    windows::Win32Pointer::open()
        .map(|p| Box::new(p) as Box<dyn PointerSource>)
        .map_err(|e| e.to_string())
}

#[cfg(all(feature = "native", unix, not(target_os = "macos")))]
fn open_native() -> Result<Box<dyn PointerSource>, String> {
    x11::X11Pointer::open()
        .map(|p| Box::new(p) as Box<dyn PointerSource>)
        .map_err(|e| e.to_string())
}

#[cfg(all(feature = "native", target_os = "macos"))]
fn open_native() -> Result<Box<dyn PointerSource>, String> {
    macos::QuartzPointer::open()
        .map(|p| Box::new(p) as Box<dyn PointerSource>)
        .map_err(|e| e.to_string())
}

#[cfg(not(all(
    feature = "native",
    any(target_os = "windows", target_os = "macos", unix)
)))]
fn open_native() -> Result<Box<dyn PointerSource>, String> {
    Err("no pointer backend compiled for this platform".to_string())
}
