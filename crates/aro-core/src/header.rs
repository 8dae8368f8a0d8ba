//! Producer header and ring geometry.
//!
//! The backing file starts with a small header the producer rewrites after
//! every frame:
//!
//! ```text
//! offset  field                    type
//! 0       write_index              u32   ring slot of the next frame
//! 4       wrap_count               u32   completed passes over the ring
//! 8       samples_per_integration  u32   FFTs integrated into one frame
//! ```
//!
//! All fields use the producer's native byte order. Frames follow the header
//! back to back until EOF; the number that fit is the ring capacity.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::config::{AcquisitionConfig, HEADER_FIELDS_LEN};

/// Snapshot of the producer's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Ring slot the producer writes next.
    pub write_index: u32,
    /// Number of times the producer has wrapped around the ring.
    pub wrap_count: u32,
    /// FFTs integrated into each raw frame.
    pub samples_per_integration: u32,
}

impl Header {
    /// Parse a header from the first bytes of the backing file.
    ///
    /// Returns `None` if fewer than the 12 header bytes are available.
    pub fn parse(mut bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_FIELDS_LEN {
            return None;
        }
        Some(Self {
            write_index: bytes.get_u32_ne(),
            wrap_count: bytes.get_u32_ne(),
            samples_per_integration: bytes.get_u32_ne(),
        })
    }

    /// Encode the header in native byte order.
    pub fn to_bytes(&self) -> [u8; HEADER_FIELDS_LEN] {
        let mut out = [0u8; HEADER_FIELDS_LEN];
        let mut buf = &mut out[..];
        buf.put_u32_ne(self.write_index);
        buf.put_u32_ne(self.wrap_count);
        buf.put_u32_ne(self.samples_per_integration);
        out
    }

    /// Total raw frames ever written, including prior wraps.
    pub fn frames_written(&self, ring_capacity: u64) -> u64 {
        u64::from(self.write_index) + u64::from(self.wrap_count) * ring_capacity
    }
}

/// Layout of the ring inside the backing file, fixed when a source opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingGeometry {
    ring_capacity: u64,
    frame_byte_size: usize,
    header_len: usize,
    frame_header_len: usize,
    record_offset: i64,
}

impl RingGeometry {
    /// Derive the geometry from the size of the backing file.
    ///
    /// Fails with a description of the inconsistency if the data region is
    /// not a whole, non-zero number of frames.
    pub fn from_file_size(
        file_size: u64,
        config: &AcquisitionConfig,
    ) -> std::result::Result<Self, String> {
        let header_len = config.header_len as u64;
        let frame_byte_size = config.frame_byte_size() as u64;
        let ring_bytes = file_size.checked_sub(header_len).ok_or_else(|| {
            format!(
                "file is {} bytes, shorter than the {} byte header",
                file_size, header_len
            )
        })?;
        if ring_bytes % frame_byte_size != 0 {
            return Err(format!(
                "odd file size: {} ring bytes is not a multiple of the {} byte frame",
                ring_bytes, frame_byte_size
            ));
        }
        let ring_capacity = ring_bytes / frame_byte_size;
        if ring_capacity == 0 {
            return Err("ring holds no frames".to_string());
        }
        Ok(Self::with_capacity(ring_capacity, config))
    }

    /// Geometry of a ring holding `ring_capacity` frames, anchored at record 0.
    pub fn with_capacity(ring_capacity: u64, config: &AcquisitionConfig) -> Self {
        Self {
            ring_capacity,
            frame_byte_size: config.frame_byte_size(),
            header_len: config.header_len,
            frame_header_len: config.frame_header_len,
            record_offset: 0,
        }
    }

    /// Return this geometry with logical record 0 anchored at `record_offset`.
    #[must_use]
    pub fn anchored(mut self, record_offset: i64) -> Self {
        self.record_offset = record_offset;
        self
    }

    /// Number of raw frames the ring holds.
    pub fn ring_capacity(&self) -> u64 {
        self.ring_capacity
    }

    /// Size in bytes of one raw frame.
    pub fn frame_byte_size(&self) -> usize {
        self.frame_byte_size
    }

    /// Absolute record index of logical record 0.
    pub fn record_offset(&self) -> i64 {
        self.record_offset
    }

    /// File size this geometry was derived from.
    pub fn file_size(&self) -> u64 {
        self.header_len as u64 + self.ring_capacity * self.frame_byte_size as u64
    }

    /// Ring slot holding the given absolute frame.
    pub fn slot(&self, absolute_frame: u64) -> u64 {
        absolute_frame % self.ring_capacity
    }

    /// Byte range of the power grid of the frame stored in `slot`.
    pub fn power_range(&self, slot: u64) -> std::ops::Range<usize> {
        let start = self.header_len + slot as usize * self.frame_byte_size;
        (start + self.frame_header_len)..(start + self.frame_byte_size)
    }
}
