#![cfg(target_os = "windows")]

//! Windows pointer backend.
//!
//! Reads the cursor with `GetCursorPos`, which reports virtual-desktop
//! coordinates (may be negative left of / above the primary monitor).
//!
//! Most users should not use this module directly. Prefer
//! [`probe_pointer`](crate::backends::probe_pointer), which picks the backend
//! for the current platform.

pub mod cursor;

pub use cursor::Win32Pointer;
