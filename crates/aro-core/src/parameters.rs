//! Metadata handed to downstream consumers of a record source.

use serde::{Deserialize, Serialize};

use crate::config::AcquisitionConfig;
use crate::window::RecordWindow;

/// Static acquisition metadata plus the size of the current window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Duration of one output sample in seconds (frame time times scrunch).
    pub sample_interval: f64,
    /// Number of frequency channels.
    pub frequency_count: usize,
    /// Centre frequency of channel 0 in MHz.
    pub frequency0: f64,
    /// Channel spacing in MHz.
    pub frequency_delta: f64,
    /// Output samples per record.
    pub samples_per_record: usize,
    /// Records currently available for reading.
    pub record_count: i64,
    /// Noise-cal period in samples (0 = no cal).
    pub cal_period_samples: u64,
}

impl Parameters {
    /// Collect parameters for a source with the given frame time and window.
    pub fn new(
        config: &AcquisitionConfig,
        sample_time: f64,
        scrunch: usize,
        window: RecordWindow,
    ) -> Self {
        Self {
            sample_interval: sample_time * scrunch as f64,
            frequency_count: config.nfreq,
            frequency0: config.freq0_mhz,
            frequency_delta: config.delta_f_mhz,
            samples_per_record: config.ntime_record,
            record_count: window.len(),
            cal_period_samples: config.cal_period_samples,
        }
    }
}
