//! File-backed reader for the ARO power-data ring.
//!
//! The spectrometer backend writes integration frames into a fixed-size file
//! and wraps around forever. [`RingSource`] opens such a file read-only,
//! anchors logical record 0 at the producer's position at open time, and
//! serves reconstructed records through
//! [`WindowedRecordSource`](aro_core::WindowedRecordSource).
//!
//! # Example
//!
//! ```no_run
//! use aro_core::{AcquisitionConfig, WindowRequest, WindowedRecordSource};
//! use aro_ring::RingSource;
//!
//! # fn example() -> aro_core::Result<()> {
//! let source = RingSource::open("/dev/shm/aro_power", AcquisitionConfig::default(), 4)?;
//!
//! let window = source.current_window()?;
//! println!("records {}..{}", window.first_available(), window.last());
//!
//! let spectrogram = source.read_records(WindowRequest::from_start(window.first_available()))?;
//! println!("{} channels x {} samples", spectrogram.nfreq(), spectrogram.nsamples());
//! # Ok(())
//! # }
//! ```

pub mod frames;
pub mod header_reader;
pub mod source;

pub use header_reader::HeaderReader;
pub use source::RingSource;
