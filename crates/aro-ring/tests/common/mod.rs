//! Ring-file fixture that plays the role of the producer in tests.

#![allow(dead_code)]

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use aro_core::{AcquisitionConfig, Header};
use tempfile::TempDir;

/// Samples per integration written into fixture headers.
pub const SAMPLES_PER_INTEGRATION: u32 = 390;

/// Small acquisition layout that keeps fixture files tiny.
pub fn small_config(nfreq: usize, ntime_record: usize) -> AcquisitionConfig {
    AcquisitionConfig {
        nfreq,
        npol: 2,
        ntime_record,
        ..Default::default()
    }
}

/// A ring file in a temporary directory plus a simulated producer cursor.
pub struct RingFixture {
    _dir: TempDir,
    path: PathBuf,
    config: AcquisitionConfig,
    capacity: u64,
    frames_written: u64,
}

impl RingFixture {
    /// Zero-filled ring of `capacity` frames with the producer at frame 0.
    pub fn new(config: AcquisitionConfig, capacity: u64) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("aro_power.dat");
        let size = config.header_len as u64 + capacity * config.frame_byte_size() as u64;
        let file = File::create(&path).expect("create ring file");
        file.set_len(size).expect("size ring file");

        let fixture = Self {
            _dir: dir,
            path,
            config,
            capacity,
            frames_written: 0,
        };
        fixture.write_header();
        fixture
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> AcquisitionConfig {
        self.config.clone()
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Move the producer cursor without touching frame contents.
    pub fn set_position(&mut self, frames_written: u64) {
        self.frames_written = frames_written;
        self.write_header();
    }

    /// Produce `count` frames; `value(frame, channel, pol)` gives the power.
    pub fn produce<F>(&mut self, count: u64, value: F)
    where
        F: Fn(u64, usize, usize) -> u32,
    {
        let mut file = self.open_rw();
        for _ in 0..count {
            let frame = self.frames_written;
            let slot = frame % self.capacity;
            let offset =
                self.config.header_len as u64 + slot * self.config.frame_byte_size() as u64;
            file.seek(SeekFrom::Start(offset)).expect("seek");

            let mut bytes = Vec::with_capacity(self.config.frame_byte_size());
            bytes.extend_from_slice(&(frame as u32).to_ne_bytes());
            bytes.extend_from_slice(&0u32.to_ne_bytes());
            for channel in 0..self.config.nfreq {
                for pol in 0..self.config.npol {
                    bytes.extend_from_slice(&value(frame, channel, pol).to_ne_bytes());
                }
            }
            file.write_all(&bytes).expect("write frame");
            self.frames_written += 1;
        }
        drop(file);
        self.write_header();
    }

    fn header(&self) -> Header {
        Header {
            write_index: (self.frames_written % self.capacity) as u32,
            wrap_count: (self.frames_written / self.capacity) as u32,
            samples_per_integration: SAMPLES_PER_INTEGRATION,
        }
    }

    fn write_header(&self) {
        let mut file = self.open_rw();
        file.write_all(&self.header().to_bytes()).expect("write header");
    }

    fn open_rw(&self) -> File {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .expect("open ring file")
    }
}
