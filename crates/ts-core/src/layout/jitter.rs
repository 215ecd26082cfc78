//! Injectable jitter sources for the temporal layout

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::state::LayoutSettings;

/// Source of bounded per-axis perturbations
pub trait Jitter {
    /// Next offset, within `[-amplitude, amplitude]`
    fn next_offset(&mut self) -> f32;
}

/// No perturbation at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn next_offset(&mut self) -> f32 {
        0.0
    }
}

/// Uniform jitter from a seedable generator
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
    amplitude: f32,
}

impl SeededJitter {
    /// Unit amplitude jitter from a fixed seed
    pub fn new(seed: u64) -> Self {
        Self::with_amplitude(seed, 1.0)
    }

    pub fn with_amplitude(seed: u64, amplitude: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            amplitude: amplitude.abs(),
        }
    }

    /// Jitter that differs between runs
    pub fn from_entropy(amplitude: f32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            amplitude: amplitude.abs(),
        }
    }

    /// Fixed seed unless the settings ask for variation
    pub fn from_settings(settings: &LayoutSettings) -> Self {
        match settings.jitter_seed {
            Some(seed) => Self::with_amplitude(seed, settings.jitter_amplitude),
            None => Self::from_entropy(settings.jitter_amplitude),
        }
    }
}

impl Jitter for SeededJitter {
    fn next_offset(&mut self) -> f32 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.amplitude..=self.amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_stay_in_bounds() {
        let mut jitter = SeededJitter::with_amplitude(7, 1.0);
        for _ in 0..1000 {
            let offset = jitter.next_offset();
            assert!((-1.0..=1.0).contains(&offset));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededJitter::new(1969);
        let mut b = SeededJitter::new(1969);
        for _ in 0..32 {
            assert_eq!(a.next_offset(), b.next_offset());
        }
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        let mut jitter = SeededJitter::with_amplitude(3, 0.0);
        assert_eq!(jitter.next_offset(), 0.0);
    }
}
