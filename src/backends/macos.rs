//! macOS pointer backend.
//!
//! Creates a null Quartz event and reads its location, which is the current
//! cursor position in global display coordinates (origin top-left of the main
//! display).

use crate::pointer::{PointerError, PointerSource};
use crate::sample::Sample;
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

#[derive(Debug, Default)]
pub struct QuartzPointer {
    _priv: (),
}

impl QuartzPointer {
    pub fn open() -> Result<Self, PointerError> {
        let mut p = Self { _priv: () };
        p.poll()?;
        Ok(p)
    }
}

impl PointerSource for QuartzPointer {
    fn poll(&mut self) -> Result<Sample, PointerError> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .map_err(|_| PointerError::NoDisplay("CGEventSourceCreate failed".into()))?;
        let event = CGEvent::new(source)
            .map_err(|_| PointerError::QueryFailed("CGEventCreate failed".into()))?;
        let at = event.location();
        Ok(Sample::new(at.x as i32, at.y as i32))
    }

    fn name(&self) -> &str {
        "quartz"
    }
}
