//! X11 pointer backend (Linux and BSDs).
//!
//! Keeps one connection open for the whole recording and asks the server for
//! the pointer position relative to the root window of the default screen.
//! Under Wayland this works only through XWayland, and only while the cursor
//! is over an X client.

use crate::pointer::{PointerError, PointerSource};
use crate::sample::Sample;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

pub struct X11Pointer {
    conn: RustConnection,
    root: Window,
}

impl X11Pointer {
    /// Connect to `$DISPLAY`.
    pub fn open() -> Result<Self, PointerError> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|e| PointerError::NoDisplay(e.to_string()))?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|s| s.root)
            .ok_or_else(|| PointerError::NoDisplay(format!("screen {screen_num} not found")))?;
        Ok(Self { conn, root })
    }
}

impl PointerSource for X11Pointer {
    fn poll(&mut self) -> Result<Sample, PointerError> {
        let reply = self
            .conn
            .query_pointer(self.root)
            .map_err(|e| PointerError::QueryFailed(e.to_string()))?
            .reply()
            .map_err(|e| PointerError::QueryFailed(e.to_string()))?;
        Ok(Sample::new(reply.root_x as i32, reply.root_y as i32))
    }

    fn name(&self) -> &str {
        "x11"
    }
}
