//! Replay backend.
//!
//! [`ScriptedPointer`] hands out a pre-recorded list of positions, one per
//! poll. It backs the `replay` demo and every test that needs a recorder
//! without a display server.

use crate::pointer::{PointerError, PointerSource};
use crate::sample::Sample;
use std::collections::VecDeque;

#[derive(Clone, Debug, Default)]
pub struct ScriptedPointer {
    name: String,
    queue: VecDeque<Result<Sample, PointerError>>,
    /// Repeat the last position instead of failing once the queue is drained.
    hold_last: bool,
    last: Option<Sample>,
}

impl ScriptedPointer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Build from a list of `(x, y)` positions.
    pub fn from_points(points: impl IntoIterator<Item = (i32, i32)>) -> Self {
        let mut p = Self::new("scripted");
        for (x, y) in points {
            p.move_to(x, y);
        }
        p
    }

    /// Keep reporting the last position after the script ends, like a cursor at rest.
    pub fn hold_last(mut self) -> Self {
        self.hold_last = true;
        self
    }

    /// Queue a position.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.queue.push_back(Ok(Sample::new(x, y)));
    }

    /// Queue a failed poll.
    pub fn fail(&mut self, err: PointerError) {
        self.queue.push_back(Err(err));
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl PointerSource for ScriptedPointer {
    fn poll(&mut self) -> Result<Sample, PointerError> {
        match self.queue.pop_front() {
            Some(Ok(s)) => {
                self.last = Some(s);
                Ok(s)
            }
            Some(Err(e)) => Err(e),
            None => match (self.hold_last, self.last) {
                (true, Some(s)) => Ok(s),
                _ => Err(PointerError::Exhausted),
            },
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
