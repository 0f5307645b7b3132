//! Pointer samples and recorded sequences.
//!
//! A [`Sample`] is one cursor position read at one polling tick, in screen
//! pixels. A [`SampleSequence`] is the **owned**, time-ordered result of one
//! recording. Order matters: the analyzer derives motion direction from
//! consecutive samples, so sequences are never sorted or deduplicated.
//!
//! ## Conventions
//! - Coordinates are integer pixels in the OS's virtual-desktop space. They can
//!   be negative on multi-monitor setups.
//! - `(0, 0)` is also the sentinel the recorder emits when the pointer could not
//!   be read (see [`UnavailablePolicy`](crate::recorder::UnavailablePolicy)).
//!
//! # Examples
//! ```
//! use padspan::{Sample, SampleSequence};
//!
//! let seq: SampleSequence = vec![Sample::new(10, 20), Sample::new(12, 21)].into();
//! assert_eq!(seq.xs(), vec![10, 12]);
//! assert_eq!(seq.ys(), vec![20, 21]);
//! ```

use serde::{Deserialize, Serialize};

/// One cursor position in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
}

impl Sample {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sample emitted in place of a failed poll.
    pub const SENTINEL: Sample = Sample::new(0, 0);
}

impl From<(i32, i32)> for Sample {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Owned, time-ordered sequence of samples from one recording.
///
/// No mutable access: a finished recording is read-only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSequence(Vec<Sample>);

impl SampleSequence {
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the sample captured at tick `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Sample> {
        self.0.get(idx)
    }

    /// Iterate samples in capture order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.0.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Sample] {
        &self.0
    }

    /// X coordinates, index-aligned with [`ys`](Self::ys).
    pub fn xs(&self) -> Vec<i32> {
        self.0.iter().map(|s| s.x).collect()
    }

    /// Y coordinates, index-aligned with [`xs`](Self::xs).
    pub fn ys(&self) -> Vec<i32> {
        self.0.iter().map(|s| s.y).collect()
    }

    /// Consume the sequence and return the inner vector.
    #[inline]
    pub fn into_inner(self) -> Vec<Sample> {
        self.0
    }
}

impl From<Vec<Sample>> for SampleSequence {
    fn from(samples: Vec<Sample>) -> Self {
        Self(samples)
    }
}

impl From<Vec<(i32, i32)>> for SampleSequence {
    fn from(points: Vec<(i32, i32)>) -> Self {
        Self(points.into_iter().map(Sample::from).collect())
    }
}

impl FromIterator<Sample> for SampleSequence {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SampleSequence {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
