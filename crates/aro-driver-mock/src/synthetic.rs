//! [`SyntheticSource`]: a clock-driven stand-in for a live ring.
//!
//! The simulated producer started writing frames at the clock's start point
//! and has written `initial_frames + elapsed / sample_time` of them since.
//! Window policy and record assembly are the same ones the file-backed
//! reader uses; only the frame contents are synthesized.

use std::time::Duration;

use aro_core::{
    AcquisitionConfig, Parameters, PowerDataError, RecordAssembler, RecordWindow, Result,
    RingGeometry, Spectrogram, WindowCalculator, WindowRequest, WindowedRecordSource,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::clock::{Clock, SystemClock};
use crate::noise::NoiseFrames;

/// Parameters of the simulated producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Capacity of the simulated ring in frames.
    pub ring_frames: u64,
    /// FFT samples integrated per frame, as a producer header would carry.
    pub samples_per_integration: u32,
    /// Constant power added to every value.
    pub bias: u32,
    /// Upper bound of the uniform noise added on top of `bias`.
    pub noise_amplitude: u32,
    /// Noise seed.
    pub seed: u64,
    /// Frames already written when the clock starts.
    pub initial_frames: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            ring_frames: 4096,
            samples_per_integration: 390,
            bias: 1000,
            noise_amplitude: 100,
            seed: 0,
            initial_frames: 0,
        }
    }
}

impl SyntheticConfig {
    /// Reject an empty ring or a zero integration length.
    pub fn validate(&self) -> Result<()> {
        if self.ring_frames == 0 {
            return Err(PowerDataError::invalid_config(
                "synthetic ring_frames must be positive",
            ));
        }
        if self.samples_per_integration == 0 {
            return Err(PowerDataError::invalid_config(
                "synthetic samples_per_integration must be positive",
            ));
        }
        Ok(())
    }
}

/// Record source backed by a simulated producer.
#[derive(Debug)]
pub struct SyntheticSource<C: Clock = SystemClock> {
    config: AcquisitionConfig,
    synthetic: SyntheticConfig,
    scrunch: usize,
    clock: C,
    geometry: RingGeometry,
    calculator: WindowCalculator,
    assembler: RecordAssembler,
    frames: NoiseFrames,
    sample_time: f64,
}

impl SyntheticSource<SystemClock> {
    /// Synthetic source running on wall time from now.
    pub fn start(
        config: AcquisitionConfig,
        synthetic: SyntheticConfig,
        scrunch: usize,
    ) -> Result<Self> {
        Self::with_clock(config, synthetic, scrunch, SystemClock::new())
    }
}

impl<C: Clock> SyntheticSource<C> {
    /// Synthetic source driven by `clock`, anchored at the clock's current
    /// position.
    pub fn with_clock(
        config: AcquisitionConfig,
        synthetic: SyntheticConfig,
        scrunch: usize,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;
        config.validate_scrunch(scrunch)?;
        synthetic.validate()?;

        let sample_time = config.sample_time(synthetic.samples_per_integration);
        let calculator = WindowCalculator::new(&config, scrunch);
        let frames_written = frames_written_at(&synthetic, sample_time, clock.elapsed());
        let record_offset = calculator.anchor(frames_written);
        let geometry = RingGeometry::with_capacity(synthetic.ring_frames, &config)
            .anchored(record_offset);
        let assembler = RecordAssembler::new(&config, scrunch, record_offset);
        let frames = NoiseFrames::new(
            synthetic.seed,
            synthetic.bias,
            synthetic.noise_amplitude,
            config.npol,
        );

        info!(
            ring_frames = synthetic.ring_frames,
            record_offset,
            scrunch,
            sample_time,
            seed = synthetic.seed,
            "Started synthetic power-data source"
        );

        Ok(Self {
            config,
            synthetic,
            scrunch,
            clock,
            geometry,
            calculator,
            assembler,
            frames,
            sample_time,
        })
    }

    /// Frames the simulated producer has written so far.
    pub fn frames_written(&self) -> u64 {
        frames_written_at(&self.synthetic, self.sample_time, self.clock.elapsed())
    }

    /// Simulated ring geometry, anchored at construction.
    pub fn geometry(&self) -> RingGeometry {
        self.geometry
    }

    /// Producer parameters this source was built with.
    pub fn synthetic_config(&self) -> &SyntheticConfig {
        &self.synthetic
    }

    /// Clock driving the producer.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Duration of one raw frame in seconds.
    pub fn sample_time(&self) -> f64 {
        self.sample_time
    }
}

fn frames_written_at(synthetic: &SyntheticConfig, sample_time: f64, elapsed: Duration) -> u64 {
    let elapsed_frames = (elapsed.as_secs_f64() / sample_time).floor() as u64;
    synthetic.initial_frames.saturating_add(elapsed_frames)
}

impl<C: Clock> WindowedRecordSource for SyntheticSource<C> {
    fn current_window(&self) -> Result<RecordWindow> {
        Ok(self
            .calculator
            .current_window(&self.geometry, self.frames_written()))
    }

    #[instrument(skip(self), fields(seed = self.synthetic.seed))]
    fn read_records(&self, request: WindowRequest) -> Result<Spectrogram> {
        let window = self.current_window()?;
        let records = window.resolve(request)?;
        let spectrogram = self.assembler.assemble(&self.frames, records.clone())?;

        debug!(
            start = records.start,
            end = records.end,
            nsamples = spectrogram.nsamples(),
            "Synthesized records"
        );
        Ok(spectrogram)
    }

    fn parameters(&self) -> Result<Parameters> {
        let window = self.current_window()?;
        Ok(Parameters::new(
            &self.config,
            self.sample_time,
            self.scrunch,
            window,
        ))
    }

    fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    fn scrunch(&self) -> usize {
        self.scrunch
    }
}
