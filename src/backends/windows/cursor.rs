#![cfg(target_os = "windows")]

//! `GetCursorPos` wrapper.
//!
//! The call fails (returns `FALSE`) on a secure desktop or when the calling
//! process has no interactive window station, e.g. when run as a service.

use crate::pointer::{PointerError, PointerSource};
use crate::sample::Sample;
use windows_sys::Win32::Foundation::POINT;
use windows_sys::Win32::UI::WindowsAndMessaging::GetCursorPos;

/// Cursor position via Win32.
#[derive(Debug, Default)]
pub struct Win32Pointer {
    _priv: (),
}

impl Win32Pointer {
    /// Probe once so callers learn about a missing desktop up front.
    pub fn open() -> Result<Self, PointerError> {
        let mut p = Self { _priv: () };
        p.poll()?;
        Ok(p)
    }
}

impl PointerSource for Win32Pointer {
    fn poll(&mut self) -> Result<Sample, PointerError> {
        let mut pt = POINT { x: 0, y: 0 };
        // SAFETY: `pt` is a valid, writable POINT for the duration of the call.
        let ok = unsafe { GetCursorPos(&mut pt) };
        if ok == 0 {
            return Err(PointerError::QueryFailed("GetCursorPos returned FALSE".into()));
        }
        Ok(Sample::new(pt.x, pt.y))
    }

    fn name(&self) -> &str {
        "win32"
    }
}
