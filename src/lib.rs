//! Reader for the ARO power-data ring.
//!
//! A live spectrometer backend writes integration frames into a fixed-size
//! ring file and never coordinates with readers. This crate works out which
//! records are safe to read from the producer's header alone, and rebuilds
//! time- and polarization-integrated spectrograms from the raw frames.
//!
//! The work is split across the workspace:
//! - [`aro_core`]: window policy, record assembly, shared types
//! - [`aro_ring`]: the file-backed [`RingSource`]
//! - [`aro_driver_mock`]: the clock-driven [`SyntheticSource`]
//!
//! This crate adds configuration, logging setup and [`open_source`].
//!
//! # Example
//! ```no_run
//! use aro_power::{config::AroConfig, logging, open_source, WindowRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AroConfig::load()?;
//! config.validate()?;
//! logging::init_from_config(&config)?;
//!
//! let source = open_source(&config)?;
//! let window = source.current_window()?;
//! let spectrogram = source.read_records(WindowRequest::range(
//!     window.first_available(),
//!     window.last(),
//! ))?;
//! println!("{} samples", spectrogram.nsamples());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod logging;
pub mod source;

pub use aro_core::{
    AcquisitionConfig, Parameters, PowerDataError, RecordWindow, Result, Spectrogram,
    WindowRequest, WindowedRecordSource,
};
pub use aro_driver_mock::{ManualClock, SyntheticConfig, SyntheticSource};
pub use aro_ring::RingSource;
pub use config::{AroConfig, ConfigError, SourceConfig};
pub use source::open_source;
