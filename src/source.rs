//! Opening the configured record source.

use aro_core::{Result, WindowedRecordSource};
use aro_driver_mock::SyntheticSource;
use aro_ring::RingSource;
use tracing::info;

use crate::config::{AroConfig, SourceConfig};

/// Open the source selected by `config.source`.
pub fn open_source(config: &AroConfig) -> Result<Box<dyn WindowedRecordSource>> {
    let acquisition = config.acquisition.clone();
    let source: Box<dyn WindowedRecordSource> = match &config.source {
        SourceConfig::Ring { path, scrunch } => {
            Box::new(RingSource::open(path, acquisition, *scrunch)?)
        }
        SourceConfig::Synthetic { scrunch, synthetic } => Box::new(SyntheticSource::start(
            acquisition,
            synthetic.clone(),
            *scrunch,
        )?),
    };

    info!(
        application = %config.application.name,
        source = source_kind(&config.source),
        "Record source ready"
    );
    Ok(source)
}

fn source_kind(source: &SourceConfig) -> &'static str {
    match source {
        SourceConfig::Ring { .. } => "ring",
        SourceConfig::Synthetic { .. } => "synthetic",
    }
}
