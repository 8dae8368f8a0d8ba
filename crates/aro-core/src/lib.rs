//! `aro-core`
//!
//! Core types and algorithms for reading the power-data ring written by the
//! ARO spectrometer backend.
//!
//! The producer overwrites a fixed-size on-disk ring forever and never talks
//! to its readers. This crate holds everything that does not touch the
//! backing store:
//!
//! - [`AcquisitionConfig`]: channelization, frame layout, timing and safety margin
//! - [`Header`] / [`RingGeometry`]: producer header and ring layout
//! - [`WindowCalculator`] / [`RecordWindow`]: which records are safe to read
//! - [`RecordAssembler`] / [`FrameReader`]: scrunching and polarization sums
//! - [`WindowedRecordSource`]: the capability every source implements
//! - [`PowerDataError`]: `MalformedHeader`, `DataGone`, `InvalidRange` and friends

pub mod assemble;
pub mod config;
pub mod error;
pub mod header;
pub mod parameters;
pub mod source;
pub mod spectrogram;
pub mod window;

pub use assemble::{FrameReader, RecordAssembler};
pub use config::AcquisitionConfig;
pub use error::{PowerDataError, Result};
pub use header::{Header, RingGeometry};
pub use parameters::Parameters;
pub use source::WindowedRecordSource;
pub use spectrogram::Spectrogram;
pub use window::{RecordWindow, WindowCalculator, WindowRequest};
