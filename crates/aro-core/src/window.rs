//! Safe-window policy for reading an unsynchronized ring.
//!
//! The producer never tells readers what it is doing. All a reader has is the
//! total number of frames written so far. From that it derives the range of
//! logical records that are complete and not yet overwritten. Only the
//! trailing `safety_fraction` of the ring counts as readable; the remainder
//! may be in the middle of being overwritten by the time the read lands.
//!
//! The margin is a best-effort heuristic. A producer that laps the reader
//! between the window query and the read still produces torn data.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AcquisitionConfig;
use crate::error::{PowerDataError, Result};
use crate::header::RingGeometry;

/// Range of logical records currently safe to read.
///
/// `first_available <= last` always holds; `last` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWindow {
    first_available: i64,
    last: i64,
}

impl RecordWindow {
    /// Build a window, collapsing an inverted range to an empty one at `last`.
    pub fn new(first_available: i64, last: i64) -> Self {
        Self {
            first_available: first_available.min(last),
            last,
        }
    }

    /// First record that has not been overwritten.
    pub fn first_available(&self) -> i64 {
        self.first_available
    }

    /// One past the newest complete record.
    pub fn last(&self) -> i64 {
        self.last
    }

    /// Number of records in the window.
    pub fn len(&self) -> i64 {
        self.last - self.first_available
    }

    /// Whether no record is available.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a caller request against this window.
    ///
    /// A missing start defaults to `first_available` and a missing end to
    /// `last`. An end past `last` is clamped down, since the producer may not
    /// have written that far yet. A start before `first_available` fails with
    /// [`PowerDataError::DataGone`]; a range that is empty after clamping fails
    /// with [`PowerDataError::InvalidRange`].
    pub fn resolve(&self, request: WindowRequest) -> Result<Range<i64>> {
        let start = request.start.unwrap_or(self.first_available);
        let requested_end = request.end.unwrap_or(self.last);

        if start < self.first_available {
            warn!(
                requested = start,
                first_available = self.first_available,
                "Requested records already overwritten"
            );
            return Err(PowerDataError::DataGone {
                requested: start,
                first_available: self.first_available,
            });
        }

        let end = requested_end.min(self.last);
        if end < requested_end {
            debug!(requested_end, end, "Clamped record range to current window");
        }

        if start >= end {
            return Err(PowerDataError::InvalidRange { start, end });
        }
        Ok(start..end)
    }
}

/// A caller's request for a range of records. Open ends follow the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRequest {
    /// First record to read (inclusive).
    pub start: Option<i64>,
    /// Record to stop at (exclusive).
    pub end: Option<i64>,
}

impl WindowRequest {
    /// The whole current window.
    pub fn all() -> Self {
        Self::default()
    }

    /// Records `[start, end)`.
    pub fn range(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Records from `start` to the end of the window.
    pub fn from_start(start: i64) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Records from the start of the window up to `end`.
    pub fn until(end: i64) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }
}

impl From<Range<i64>> for WindowRequest {
    fn from(range: Range<i64>) -> Self {
        Self::range(range.start, range.end)
    }
}

/// Converts the producer's write position into a [`RecordWindow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCalculator {
    frames_per_record: u64,
    safety_fraction: f64,
}

impl WindowCalculator {
    /// Calculator for records of `scrunch * ntime_record` frames.
    pub fn new(config: &AcquisitionConfig, scrunch: usize) -> Self {
        Self {
            frames_per_record: config.frames_per_record(scrunch).max(1),
            safety_fraction: config.safety_fraction,
        }
    }

    /// Raw frames integrated into one record.
    pub fn frames_per_record(&self) -> u64 {
        self.frames_per_record
    }

    /// Absolute index of the record containing the given write position.
    ///
    /// Used once at open time: the record the producer is writing becomes
    /// logical record 0 of the handle.
    pub fn anchor(&self, frames_written: u64) -> i64 {
        (frames_written / self.frames_per_record) as i64
    }

    /// Currently readable records for a ring that has seen `frames_written`.
    pub fn current_window(&self, geometry: &RingGeometry, frames_written: u64) -> RecordWindow {
        let record_offset = geometry.record_offset();
        let last = self.anchor(frames_written) - record_offset;

        let ring_record_capacity = geometry.ring_capacity() / self.frames_per_record;
        // The record being written shares the ring with the oldest one, so at
        // most `ring_record_capacity - 1` complete records are intact.
        let margin = ((self.safety_fraction * ring_record_capacity as f64).floor() as u64)
            .min(ring_record_capacity.saturating_sub(1)) as i64;

        // Nothing precedes the first frame the producer ever wrote.
        let first_available = (last - margin).max(-record_offset);

        let window = RecordWindow::new(first_available, last);
        debug!(
            frames_written,
            ring_record_capacity,
            first_available = window.first_available(),
            last = window.last(),
            "Computed record window"
        );
        window
    }
}
