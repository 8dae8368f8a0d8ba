//! Reconstructed spectrogram returned by record reads.

use std::ops::Range;

use ndarray::{s, Array1, Array2, ArrayView2};

use crate::config::AcquisitionConfig;

/// Dense `(nfreq, nsamples)` block of integrated power.
///
/// Rows are frequency channels, columns are output samples in ascending time
/// order. Records are laid end to end, `ntime_record` samples each.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    start_record: i64,
    ntime_record: usize,
    data: Array2<f64>,
}

impl Spectrogram {
    /// Wrap reconstructed data starting at logical record `start_record`.
    pub fn new(start_record: i64, ntime_record: usize, data: Array2<f64>) -> Self {
        Self {
            start_record,
            ntime_record,
            data,
        }
    }

    /// Logical index of the first record.
    pub fn start_record(&self) -> i64 {
        self.start_record
    }

    /// Logical records covered, end exclusive.
    pub fn records(&self) -> Range<i64> {
        self.start_record..self.start_record + self.record_count() as i64
    }

    /// Number of records in the block.
    pub fn record_count(&self) -> usize {
        self.nsamples() / self.ntime_record.max(1)
    }

    /// Number of frequency channels.
    pub fn nfreq(&self) -> usize {
        self.data.nrows()
    }

    /// Number of output time samples.
    pub fn nsamples(&self) -> usize {
        self.data.ncols()
    }

    /// Frequency-major view of the data.
    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Samples belonging to one logical record, if it is in the block.
    pub fn record(&self, record: i64) -> Option<ArrayView2<'_, f64>> {
        if !self.records().contains(&record) {
            return None;
        }
        let first = (record - self.start_record) as usize * self.ntime_record;
        Some(self.data.slice(s![.., first..first + self.ntime_record]))
    }

    /// Consume the block and return the underlying array.
    pub fn into_data(self) -> Array2<f64> {
        self.data
    }

    /// Centre frequency of every channel in MHz.
    pub fn frequencies(&self, config: &AcquisitionConfig) -> Array1<f64> {
        Array1::from_shape_fn(self.nfreq(), |i| {
            config.freq0_mhz + i as f64 * config.delta_f_mhz
        })
    }
}
