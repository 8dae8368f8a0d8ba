//! Integration tests for `RingSource` against ring files on disk.

mod common;

use std::sync::Arc;
use std::thread;

use aro_core::{AcquisitionConfig, PowerDataError, WindowRequest, WindowedRecordSource};
use aro_ring::RingSource;
use common::{small_config, RingFixture, SAMPLES_PER_INTEGRATION};
use tracing_test::traced_test;

fn constant(value: u32) -> impl Fn(u64, usize, usize) -> u32 {
    move |_, _, _| value
}

// =============================================================================
// Open
// =============================================================================

#[test]
fn test_open_rejects_odd_file_size() {
    let fixture = RingFixture::new(small_config(4, 10), 100);
    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(fixture.path())
        .unwrap();
    file.set_len(12 + 100 * 40 + 3).unwrap();

    let err = RingSource::open(fixture.path(), fixture.config(), 1).unwrap_err();
    assert!(matches!(err, PowerDataError::MalformedHeader { .. }));
    assert!(err.to_string().contains("odd file size"));
}

#[test]
fn test_open_rejects_header_only_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.dat");
    std::fs::write(&path, [0u8; 6]).unwrap();

    let err = RingSource::open(&path, small_config(4, 10), 1).unwrap_err();
    assert!(matches!(err, PowerDataError::MalformedHeader { .. }));
}

#[test]
fn test_open_rejects_bad_scrunch_and_config() {
    let fixture = RingFixture::new(small_config(4, 10), 100);
    let err = RingSource::open(fixture.path(), fixture.config(), 0).unwrap_err();
    assert!(matches!(err, PowerDataError::InvalidConfig { .. }));

    let config = AcquisitionConfig {
        safety_fraction: 0.0,
        ..fixture.config()
    };
    let err = RingSource::open(fixture.path(), config, 1).unwrap_err();
    assert!(matches!(err, PowerDataError::InvalidConfig { .. }));
}

#[test]
fn test_open_missing_file() {
    let err = RingSource::open("/nonexistent/aro_power.dat", small_config(4, 10), 1).unwrap_err();
    assert!(matches!(err, PowerDataError::Io(_)));
}

// =============================================================================
// Window and clamping
// =============================================================================

#[test]
fn test_window_example_from_fresh_ring() {
    // 100 frame ring, scrunch 1, 10 samples per record.
    let mut fixture = RingFixture::new(small_config(4, 10), 100);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    assert_eq!(source.geometry().ring_capacity(), 100);
    assert_eq!(source.geometry().record_offset(), 0);

    fixture.produce(500, constant(1));
    let window = source.current_window().unwrap();
    assert_eq!(window.first_available(), 42);
    assert_eq!(window.last(), 50);

    let err = source.read_records(WindowRequest::range(40, 45)).unwrap_err();
    assert!(matches!(
        err,
        PowerDataError::DataGone {
            requested: 40,
            first_available: 42
        }
    ));

    let spectrogram = source.read_records(WindowRequest::range(45, 60)).unwrap();
    assert_eq!(spectrogram.records(), 45..50);
    assert_eq!(spectrogram.nsamples(), 50);
    assert_eq!(spectrogram.nfreq(), 4);
    // Two polarizations of power 1 per frame.
    assert!(spectrogram.data().iter().all(|&v| v == 2.0));
}

#[test]
fn test_window_tracks_producer() {
    let mut fixture = RingFixture::new(small_config(2, 5), 50);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();

    assert!(source.current_window().unwrap().is_empty());
    let err = source.read_records(WindowRequest::all()).unwrap_err();
    assert!(matches!(err, PowerDataError::InvalidRange { .. }));

    fixture.produce(12, constant(0));
    let window = source.current_window().unwrap();
    assert_eq!((window.first_available(), window.last()), (0, 2));

    fixture.produce(300, constant(0));
    let window = source.current_window().unwrap();
    // 312 frames = 62 records; 10 records fit, 8 are safe.
    assert_eq!((window.first_available(), window.last()), (54, 62));
    assert!(window.first_available() <= window.last());
}

#[test]
fn test_anchor_at_open_position() {
    let mut fixture = RingFixture::new(small_config(2, 5), 50);
    fixture.produce(123, constant(0));

    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    // 123 frames = record 24 (partially written) becomes logical record 0.
    assert_eq!(source.geometry().record_offset(), 24);
    let window = source.current_window().unwrap();
    assert_eq!(window.last(), 0);
    assert_eq!(window.first_available(), -8);

    let spectrogram = source.read_records(WindowRequest::range(-8, 0)).unwrap();
    assert_eq!(spectrogram.nsamples(), 40);
}

#[test]
fn test_defaults_read_whole_window() {
    let mut fixture = RingFixture::new(small_config(2, 5), 50);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    fixture.produce(200, constant(3));

    let spectrogram = source.read_records(WindowRequest::all()).unwrap();
    let window = source.current_window().unwrap();
    assert_eq!(spectrogram.records(), window.first_available()..window.last());
    assert_eq!(spectrogram.nsamples(), window.len() as usize * 5);
}

// =============================================================================
// Reconstruction
// =============================================================================

#[test]
fn test_polarizations_are_summed() {
    let mut fixture = RingFixture::new(small_config(3, 4), 40);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    fixture.produce(8, |_, channel, pol| match (channel, pol) {
        (1, 0) => 3,
        (1, 1) => 5,
        _ => 0,
    });

    let spectrogram = source.read_records(WindowRequest::range(0, 2)).unwrap();
    for t in 0..spectrogram.nsamples() {
        assert_eq!(spectrogram.data()[[1, t]], 8.0);
        assert_eq!(spectrogram.data()[[0, t]], 0.0);
    }
}

#[test]
fn test_wrapped_frames_in_time_order() {
    let mut fixture = RingFixture::new(small_config(2, 4), 40);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    // Pol 0 carries the absolute frame index, pol 1 the channel.
    fixture.produce(250, |frame, channel, pol| {
        if pol == 0 {
            frame as u32
        } else {
            channel as u32
        }
    });

    let window = source.current_window().unwrap();
    assert_eq!((window.first_available(), window.last()), (54, 62));

    let spectrogram = source.read_records(WindowRequest::all()).unwrap();
    for t in 0..spectrogram.nsamples() {
        let frame = (54 * 4 + t) as f64;
        assert_eq!(spectrogram.data()[[0, t]], frame);
        assert_eq!(spectrogram.data()[[1, t]], frame + 1.0);
    }
}

#[test]
fn test_full_safety_fraction_never_reads_overwritten_frames() {
    let config = AcquisitionConfig {
        safety_fraction: 1.0,
        ..small_config(2, 10)
    };
    let mut fixture = RingFixture::new(config, 100);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    // Pol 0 carries the absolute frame index.
    fixture.produce(505, |frame, _, pol| if pol == 0 { frame as u32 } else { 0 });

    let window = source.current_window().unwrap();
    assert_eq!((window.first_available(), window.last()), (41, 50));

    let spectrogram = source.read_records(WindowRequest::all()).unwrap();
    for t in 0..spectrogram.nsamples() {
        assert_eq!(spectrogram.data()[[0, t]], (410 + t) as f64);
    }

    let err = source.read_records(WindowRequest::range(40, 50)).unwrap_err();
    assert!(err.is_data_gone());
}

#[test]
fn test_scrunch_matches_summed_unscrunched_records() {
    let mut fixture = RingFixture::new(small_config(4, 4), 40);
    let fine = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    let coarse = RingSource::open(fixture.path(), fixture.config(), 2).unwrap();
    fixture.produce(32, |frame, channel, pol| {
        (frame as u32 * 7 + channel as u32 * 3 + pol as u32) % 17
    });

    let coarse_window = coarse.current_window().unwrap();
    assert_eq!((coarse_window.first_available(), coarse_window.last()), (0, 4));

    let coarse_records = coarse.read_records(WindowRequest::range(0, 2)).unwrap();
    let fine_records = fine.read_records(WindowRequest::range(0, 4)).unwrap();
    assert_eq!(coarse_records.nsamples() * 2, fine_records.nsamples());

    for f in 0..4 {
        for t in 0..coarse_records.nsamples() {
            let summed = fine_records.data()[[f, 2 * t]] + fine_records.data()[[f, 2 * t + 1]];
            assert_eq!(coarse_records.data()[[f, t]], summed);
        }
    }
}

#[test]
fn test_sample_count_for_every_valid_range() {
    let mut fixture = RingFixture::new(small_config(2, 3), 60);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    fixture.produce(300, constant(1));

    let window = source.current_window().unwrap();
    for start in window.first_available()..window.last() {
        for end in start + 1..=window.last() {
            let spectrogram = source.read_records(WindowRequest::range(start, end)).unwrap();
            assert_eq!(spectrogram.nsamples(), (end - start) as usize * 3);
        }
    }
}

// =============================================================================
// Metadata, logging, concurrency
// =============================================================================

#[test]
fn test_parameters() {
    let mut fixture = RingFixture::new(small_config(4, 10), 100);
    let source = RingSource::open(fixture.path(), fixture.config(), 2).unwrap();
    fixture.produce(500, constant(0));

    let params = source.parameters().unwrap();
    let expected_interval =
        2.0 * f64::from(SAMPLES_PER_INTEGRATION) / fixture.config().fft_rate_hz;
    assert!((params.sample_interval - expected_interval).abs() < 1e-15);
    assert_eq!(params.frequency_count, 4);
    assert_eq!(params.samples_per_record, 10);
    // 25 records written, ring holds 5, 4 are safe.
    assert_eq!(params.record_count, 4);
}

#[test]
#[traced_test]
fn test_data_gone_is_logged() {
    let mut fixture = RingFixture::new(small_config(2, 5), 50);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    fixture.produce(500, constant(0));

    let result = source.read_records(WindowRequest::range(0, 1));
    assert!(result.unwrap_err().is_data_gone());
    assert!(logs_contain("Requested records already overwritten"));
}

#[test]
fn test_errors_do_not_poison_handle() {
    let mut fixture = RingFixture::new(small_config(2, 5), 50);
    let source = RingSource::open(fixture.path(), fixture.config(), 1).unwrap();
    fixture.produce(500, constant(1));

    assert!(source.read_records(WindowRequest::range(0, 1)).is_err());
    let window = source.current_window().unwrap();
    let spectrogram = source
        .read_records(WindowRequest::from_start(window.first_available()))
        .unwrap();
    assert_eq!(spectrogram.start_record(), window.first_available());
}

#[test]
fn test_concurrent_readers() {
    let mut fixture = RingFixture::new(small_config(8, 4), 80);
    fixture.produce(40, |frame, _, _| frame as u32);
    let source = Arc::new(RingSource::open(fixture.path(), fixture.config(), 1).unwrap());
    fixture.produce(80, |frame, _, _| frame as u32);

    let expected = source.read_records(WindowRequest::range(6, 16)).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let source = Arc::clone(&source);
            thread::spawn(move || source.read_records(WindowRequest::range(6, 16)).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
