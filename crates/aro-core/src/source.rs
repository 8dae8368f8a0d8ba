//! Capability shared by every windowed record source.

use crate::config::AcquisitionConfig;
use crate::error::Result;
use crate::parameters::Parameters;
use crate::spectrogram::Spectrogram;
use crate::window::{RecordWindow, WindowRequest};

/// A source of logical records backed by a producer-owned ring.
///
/// Implemented by the file-backed ring reader and by the synthetic source
/// used in tests. Callers pick the implementation explicitly.
///
/// Every call stands alone: the window is recomputed from the producer's
/// current position each time, and an error leaves the source usable.
pub trait WindowedRecordSource: Send + Sync {
    /// Records currently safe to read.
    fn current_window(&self) -> Result<RecordWindow>;

    /// Reconstruct a range of records, clamped to the current window.
    fn read_records(&self, request: WindowRequest) -> Result<Spectrogram>;

    /// Acquisition metadata together with the current record count.
    fn parameters(&self) -> Result<Parameters>;

    /// Acquisition configuration the source was opened with.
    fn config(&self) -> &AcquisitionConfig;

    /// Raw frames integrated per output sample.
    fn scrunch(&self) -> usize;
}
