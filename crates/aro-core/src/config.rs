//! Acquisition parameters of the spectrometer backend.
//!
//! [`AcquisitionConfig`] bundles every constant describing the producer's
//! output: channelization, frame layout, timing and the reader's safety
//! policy. A source receives one at construction and never mutates it.
//!
//! Defaults match the ARO FPGA backend: 1024 channels from 800 MHz down to
//! 400 MHz, two polarizations, `u32` power values.

use serde::{Deserialize, Serialize};

use crate::error::{PowerDataError, Result};

/// Bytes occupied by the three `u32` header fields.
pub const HEADER_FIELDS_LEN: usize = 12;

/// Bytes per raw power value (`u32`).
pub const POWER_VALUE_LEN: usize = std::mem::size_of::<u32>();

/// Immutable description of the producer's data layout and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Number of frequency channels per spectrum.
    pub nfreq: usize,
    /// Number of polarizations per frame.
    pub npol: usize,
    /// Output samples per logical record (post-scrunch).
    pub ntime_record: usize,
    /// FFT rate of the backend in Hz.
    pub fft_rate_hz: f64,
    /// Centre frequency of channel 0 in MHz.
    pub freq0_mhz: f64,
    /// Channel spacing in MHz (negative for a descending band).
    pub delta_f_mhz: f64,
    /// Length of the file header in bytes.
    pub header_len: usize,
    /// Length of the per-frame header (FPGA counter, unix time) in bytes.
    pub frame_header_len: usize,
    /// Noise-cal period in samples (0 = no cal).
    pub cal_period_samples: u64,
    /// Trailing fraction of the ring considered safe to read.
    pub safety_fraction: f64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            nfreq: 1024,
            npol: 2,
            ntime_record: 1024,
            fft_rate_hz: 800e6 / 1024.0 / 2.0,
            freq0_mhz: 800.0,
            delta_f_mhz: -400.0 / 1024.0,
            header_len: HEADER_FIELDS_LEN,
            frame_header_len: 8,
            cal_period_samples: 0,
            safety_fraction: 0.8,
        }
    }
}

impl AcquisitionConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.nfreq == 0 || self.npol == 0 || self.ntime_record == 0 {
            return Err(PowerDataError::invalid_config(format!(
                "nfreq ({}), npol ({}) and ntime_record ({}) must be non-zero",
                self.nfreq, self.npol, self.ntime_record
            )));
        }
        if self.header_len < HEADER_FIELDS_LEN {
            return Err(PowerDataError::invalid_config(format!(
                "header_len {} is shorter than the {} header field bytes",
                self.header_len, HEADER_FIELDS_LEN
            )));
        }
        if !(self.fft_rate_hz.is_finite() && self.fft_rate_hz > 0.0) {
            return Err(PowerDataError::invalid_config(format!(
                "fft_rate_hz must be positive, got {}",
                self.fft_rate_hz
            )));
        }
        if !(self.safety_fraction > 0.0 && self.safety_fraction <= 1.0) {
            return Err(PowerDataError::invalid_config(format!(
                "safety_fraction must be in (0, 1], got {}",
                self.safety_fraction
            )));
        }
        Ok(())
    }

    /// Validate a scrunch factor against this configuration.
    pub fn validate_scrunch(&self, scrunch: usize) -> Result<()> {
        if scrunch == 0 {
            return Err(PowerDataError::invalid_config("scrunch must be at least 1"));
        }
        if scrunch.checked_mul(self.ntime_record).is_none() {
            return Err(PowerDataError::invalid_config(format!(
                "scrunch {} times ntime_record {} overflows the frame count",
                scrunch, self.ntime_record
            )));
        }
        Ok(())
    }

    /// Number of power values in one frame.
    pub fn values_per_frame(&self) -> usize {
        self.nfreq * self.npol
    }

    /// Size in bytes of one raw frame (frame header plus power grid).
    pub fn frame_byte_size(&self) -> usize {
        self.frame_header_len + self.values_per_frame() * POWER_VALUE_LEN
    }

    /// Raw frames integrated into one logical record.
    pub fn frames_per_record(&self, scrunch: usize) -> u64 {
        scrunch.saturating_mul(self.ntime_record) as u64
    }

    /// Duration of one raw frame in seconds.
    pub fn sample_time(&self, samples_per_integration: u32) -> f64 {
        f64::from(samples_per_integration) / self.fft_rate_hz
    }
}
