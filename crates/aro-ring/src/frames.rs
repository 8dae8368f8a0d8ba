#![allow(unsafe_code)]
//! Read-only memory map of the frame region.
//!
//! Each record read maps the backing file afresh, so the mapping never
//! outlives the request it serves. The producer keeps writing while we read;
//! the safety window is what keeps the frames we touch out of its way.

use std::fs::File;
use std::path::{Path, PathBuf};

use aro_core::config::POWER_VALUE_LEN;
use aro_core::{FrameReader, PowerDataError, Result, RingGeometry};
use bytes::Buf;
use memmap2::{Mmap, MmapOptions};

/// Frames of one backing file, mapped for the duration of a read.
pub struct MappedFrames {
    path: PathBuf,
    mmap: Mmap,
    geometry: RingGeometry,
    npol: usize,
}

impl std::fmt::Debug for MappedFrames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFrames")
            .field("path", &self.path)
            .field("len", &self.mmap.len())
            .field("ring_capacity", &self.geometry.ring_capacity())
            .finish()
    }
}

impl MappedFrames {
    /// Map `path` read-only and check it still holds the whole ring.
    pub fn map(path: &Path, geometry: RingGeometry, npol: usize) -> Result<Self> {
        let file = File::open(path)?;

        // SAFETY: the mapping is read-only and dropped at the end of the read.
        // The producer may rewrite frames concurrently; callers only touch
        // frames inside the safety window, and a torn frame yields wrong
        // numbers, never out-of-bounds access, since every slice below is
        // bounds-checked against the mapped length.
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        if (mmap.len() as u64) < geometry.file_size() {
            return Err(PowerDataError::malformed(
                path,
                format!(
                    "mapped {} bytes, ring needs {}",
                    mmap.len(),
                    geometry.file_size()
                ),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            geometry,
            npol,
        })
    }
}

impl FrameReader for MappedFrames {
    fn accumulate(&self, absolute_frame: u64, spectrum: &mut [f64]) -> Result<()> {
        let slot = self.geometry.slot(absolute_frame);
        let grid = self
            .mmap
            .get(self.geometry.power_range(slot))
            .ok_or_else(|| {
                PowerDataError::malformed(&self.path, format!("frame slot {} out of bounds", slot))
            })?;

        // Grid is frequency-major with polarizations interleaved.
        for (power, mut channel) in spectrum
            .iter_mut()
            .zip(grid.chunks_exact(self.npol * POWER_VALUE_LEN))
        {
            let mut sum = 0u64;
            while channel.has_remaining() {
                sum += u64::from(channel.get_u32_ne());
            }
            *power += sum as f64;
        }
        Ok(())
    }
}
