//! Seeded per-frame noise.
//!
//! Each absolute frame gets its own ChaCha stream seeded from the source seed
//! and the frame index, so a frame reads back the same on every request and
//! from every thread.

use aro_core::{FrameReader, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Odd multiplier spreading consecutive frame indices across the seed space.
const FRAME_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Frame generator: every value is `bias + uniform(0..=noise_amplitude)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseFrames {
    seed: u64,
    bias: u32,
    noise_amplitude: u32,
    npol: usize,
}

impl NoiseFrames {
    /// Generator for `npol` polarizations per channel.
    pub fn new(seed: u64, bias: u32, noise_amplitude: u32, npol: usize) -> Self {
        Self {
            seed,
            bias,
            noise_amplitude,
            npol,
        }
    }

    fn rng_for(&self, absolute_frame: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed ^ absolute_frame.wrapping_mul(FRAME_SEED_MIX))
    }

    /// Raw power values of one frame, frequency-major with polarizations
    /// interleaved, `nfreq * npol` long.
    pub fn frame(&self, absolute_frame: u64, nfreq: usize) -> Vec<u32> {
        let mut rng = self.rng_for(absolute_frame);
        (0..nfreq * self.npol)
            .map(|_| self.bias.saturating_add(rng.gen_range(0..=self.noise_amplitude)))
            .collect()
    }
}

impl FrameReader for NoiseFrames {
    fn accumulate(&self, absolute_frame: u64, spectrum: &mut [f64]) -> Result<()> {
        let values = self.frame(absolute_frame, spectrum.len());
        for (power, channel) in spectrum.iter_mut().zip(values.chunks_exact(self.npol)) {
            let sum: u64 = channel.iter().copied().map(u64::from).sum();
            *power += sum as f64;
        }
        Ok(())
    }
}
