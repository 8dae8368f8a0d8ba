//! Synthetic power-data source for testing without a live producer.
//!
//! [`SyntheticSource`] serves the same [`WindowedRecordSource`] contract as
//! the file-backed ring reader. Instead of reading a header it derives the
//! producer's position from a clock, and instead of reading frames it
//! synthesizes seeded noise on a fixed bias.
//!
//! - **clock**: [`SystemClock`] for wall time, [`ManualClock`] for tests
//! - **noise**: deterministic per-frame noise generator
//! - **synthetic**: the source itself and its [`SyntheticConfig`]
//!
//! [`WindowedRecordSource`]: aro_core::WindowedRecordSource

pub mod clock;
pub mod noise;
pub mod synthetic;

pub use clock::{Clock, ManualClock, SystemClock};
pub use noise::NoiseFrames;
pub use synthetic::{SyntheticConfig, SyntheticSource};
