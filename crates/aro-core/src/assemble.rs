//! Record reconstruction: temporal scrunching and polarization combination.
//!
//! Every output sample is the sum of `scrunch` consecutive raw frames, each
//! frame contributing the sum of its polarizations per channel. Output
//! samples are independent reductions and are computed in parallel.

use std::ops::Range;

use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;
use tracing::debug;

use crate::config::AcquisitionConfig;
use crate::error::{PowerDataError, Result};
use crate::spectrogram::Spectrogram;

/// Access to raw frames by absolute frame index.
///
/// Implementors add the polarization-summed power of one frame into an
/// `nfreq`-long spectrum.
pub trait FrameReader: Sync {
    /// Add frame `absolute_frame` to `spectrum`, summing polarizations.
    fn accumulate(&self, absolute_frame: u64, spectrum: &mut [f64]) -> Result<()>;
}

/// Turns a range of logical records into a [`Spectrogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordAssembler {
    nfreq: usize,
    ntime_record: usize,
    scrunch: usize,
    record_offset: i64,
}

impl RecordAssembler {
    /// Assembler for one source handle anchored at `record_offset`.
    pub fn new(config: &AcquisitionConfig, scrunch: usize, record_offset: i64) -> Self {
        Self {
            nfreq: config.nfreq,
            ntime_record: config.ntime_record,
            scrunch,
            record_offset,
        }
    }

    /// Absolute index of the first raw frame of logical record `record`.
    pub fn first_frame(&self, record: i64) -> Result<u64> {
        let absolute_record = u64::try_from(record + self.record_offset).map_err(|_| {
            PowerDataError::DataGone {
                requested: record,
                first_available: -self.record_offset,
            }
        })?;
        Ok(absolute_record * (self.scrunch * self.ntime_record) as u64)
    }

    /// Reconstruct records `[records.start, records.end)` from `reader`.
    pub fn assemble<R>(&self, reader: &R, records: Range<i64>) -> Result<Spectrogram>
    where
        R: FrameReader + ?Sized,
    {
        if records.start >= records.end {
            return Err(PowerDataError::InvalidRange {
                start: records.start,
                end: records.end,
            });
        }

        let base_frame = self.first_frame(records.start)?;
        let nsamples = (records.end - records.start) as usize * self.ntime_record;
        let nfreq = self.nfreq;
        let scrunch = self.scrunch as u64;

        debug!(
            start = records.start,
            end = records.end,
            base_frame,
            nsamples,
            "Assembling records"
        );

        // One column per output sample; each worker reduces into its own
        // contiguous spectrum before copying it into place.
        let mut data = Array2::<f64>::zeros((nfreq, nsamples));
        data.axis_iter_mut(Axis(1))
            .into_par_iter()
            .enumerate()
            .try_for_each_init(
                || vec![0.0f64; nfreq],
                |spectrum, (sample, mut column)| {
                    spectrum.fill(0.0);
                    let first = base_frame + sample as u64 * scrunch;
                    (first..first + scrunch).try_for_each(|frame| {
                        reader.accumulate(frame, spectrum.as_mut_slice())
                    })?;
                    column.assign(&ArrayView1::from(&spectrum[..]));
                    Ok::<(), PowerDataError>(())
                },
            )?;

        Ok(Spectrogram::new(records.start, self.ntime_record, data))
    }
}
