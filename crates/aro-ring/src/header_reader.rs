//! Re-reads the producer header from the backing file.
//!
//! The header is rewritten by the producer after every frame, so nothing read
//! from it is ever cached: each [`HeaderReader::read_header`] call opens the
//! file, checks that its size still matches the geometry seen at open, and
//! reads the first twelve bytes.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use aro_core::config::HEADER_FIELDS_LEN;
use aro_core::{AcquisitionConfig, Header, PowerDataError, Result, RingGeometry};
use tracing::trace;

/// Reader for the header of one backing file.
#[derive(Debug, Clone)]
pub struct HeaderReader {
    path: PathBuf,
    geometry: RingGeometry,
}

impl HeaderReader {
    /// Open the backing file and derive its ring geometry from the file size.
    ///
    /// Fails with [`PowerDataError::MalformedHeader`] if the data region is not
    /// a whole number of frames.
    pub fn open(path: impl AsRef<Path>, config: &AcquisitionConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_size = File::open(&path)?.metadata()?.len();
        let geometry = RingGeometry::from_file_size(file_size, config)
            .map_err(|message| PowerDataError::malformed(&path, message))?;
        Ok(Self { path, geometry })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Geometry derived at open, not anchored.
    pub fn geometry(&self) -> RingGeometry {
        self.geometry
    }

    /// Read the producer's current header.
    ///
    /// Fails with [`PowerDataError::MalformedHeader`] on a short read, if the
    /// file size changed since open, or if the write index lies outside the
    /// ring.
    pub fn read_header(&self) -> Result<Header> {
        let mut file = File::open(&self.path)?;

        let file_size = file.metadata()?.len();
        if file_size != self.geometry.file_size() {
            return Err(PowerDataError::malformed(
                &self.path,
                format!(
                    "file size changed from {} to {} bytes",
                    self.geometry.file_size(),
                    file_size
                ),
            ));
        }

        let mut buf = [0u8; HEADER_FIELDS_LEN];
        file.read_exact(&mut buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => PowerDataError::malformed(&self.path, "short header read"),
            _ => PowerDataError::Io(e),
        })?;
        let header = Header::parse(&buf)
            .ok_or_else(|| PowerDataError::malformed(&self.path, "short header read"))?;

        if u64::from(header.write_index) >= self.geometry.ring_capacity() {
            return Err(PowerDataError::malformed(
                &self.path,
                format!(
                    "write index {} outside ring of {} frames",
                    header.write_index,
                    self.geometry.ring_capacity()
                ),
            ));
        }

        trace!(
            write_index = header.write_index,
            wrap_count = header.wrap_count,
            "Read ring header"
        );
        Ok(header)
    }
}
