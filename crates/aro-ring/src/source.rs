//! [`RingSource`]: windowed record access to a live ring file.

use std::path::Path;

use aro_core::{
    AcquisitionConfig, Header, Parameters, PowerDataError, RecordAssembler, RecordWindow, Result,
    RingGeometry, Spectrogram, WindowCalculator, WindowRequest, WindowedRecordSource,
};
use tracing::{debug, info, instrument};

use crate::frames::MappedFrames;
use crate::header_reader::HeaderReader;

/// Reader of a power-data ring file written by a live producer.
///
/// Geometry and the record anchor are fixed at [`RingSource::open`]; the
/// producer's position is re-read on every query.
#[derive(Debug)]
pub struct RingSource {
    config: AcquisitionConfig,
    scrunch: usize,
    header_reader: HeaderReader,
    geometry: RingGeometry,
    calculator: WindowCalculator,
    assembler: RecordAssembler,
    sample_time: f64,
}

impl RingSource {
    /// Open a ring file, integrating `scrunch` raw frames per output sample.
    ///
    /// Logical record 0 is anchored at the record the producer is writing at
    /// the time of the call.
    pub fn open(
        path: impl AsRef<Path>,
        config: AcquisitionConfig,
        scrunch: usize,
    ) -> Result<Self> {
        config.validate()?;
        config.validate_scrunch(scrunch)?;

        let header_reader = HeaderReader::open(path, &config)?;
        let header = header_reader.read_header()?;
        if header.samples_per_integration == 0 {
            return Err(PowerDataError::malformed(
                header_reader.path(),
                "samples_per_integration is zero",
            ));
        }

        let calculator = WindowCalculator::new(&config, scrunch);
        let unanchored = header_reader.geometry();
        let record_offset = calculator.anchor(header.frames_written(unanchored.ring_capacity()));
        let geometry = unanchored.anchored(record_offset);
        let assembler = RecordAssembler::new(&config, scrunch, record_offset);
        let sample_time = config.sample_time(header.samples_per_integration);

        info!(
            path = %header_reader.path().display(),
            ring_capacity = geometry.ring_capacity(),
            record_offset,
            scrunch,
            sample_time,
            "Opened power-data ring"
        );

        Ok(Self {
            config,
            scrunch,
            header_reader,
            geometry,
            calculator,
            assembler,
            sample_time,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.header_reader.path()
    }

    /// Ring geometry, anchored at the record offset chosen at open.
    pub fn geometry(&self) -> RingGeometry {
        self.geometry
    }

    /// Duration of one raw frame in seconds, from the header seen at open.
    pub fn sample_time(&self) -> f64 {
        self.sample_time
    }

    /// Producer header as it is right now.
    pub fn read_header(&self) -> Result<Header> {
        self.header_reader.read_header()
    }
}

impl WindowedRecordSource for RingSource {
    fn current_window(&self) -> Result<RecordWindow> {
        let header = self.header_reader.read_header()?;
        let frames_written = header.frames_written(self.geometry.ring_capacity());
        Ok(self.calculator.current_window(&self.geometry, frames_written))
    }

    #[instrument(skip(self), fields(path = %self.path().display()))]
    fn read_records(&self, request: WindowRequest) -> Result<Spectrogram> {
        let window = self.current_window()?;
        let records = window.resolve(request)?;

        let frames = MappedFrames::map(self.path(), self.geometry, self.config.npol)?;
        let spectrogram = self.assembler.assemble(&frames, records.clone())?;

        debug!(
            start = records.start,
            end = records.end,
            nsamples = spectrogram.nsamples(),
            "Read records"
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
