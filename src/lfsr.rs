//! Linear feedback shift registers.
//!
//! The tap table drives both the emitted `lfsr` module and the software
//! model used to build stimulus, so the two produce the same sequence for
//! the same seed. Taps are 1-based bit positions with the MSB at `width`.

/// Feedback taps by register width.
pub const TAPS: &[(u32, &[u32])] = &[
    (3, &[3, 2]),
    (4, &[4, 3]),
    (5, &[5, 3]),
    (6, &[6, 5]),
    (7, &[7, 6]),
    (8, &[8, 7, 6, 1]),
    (9, &[9, 5]),
    (10, &[10, 7]),
    (11, &[11, 9]),
    (12, &[12, 11, 10, 4]),
    (13, &[13, 12, 11, 8]),
    (14, &[14, 13, 12, 2]),
    (15, &[15, 14]),
    (16, &[16, 15, 13, 4]),
    (17, &[17, 14]),
    (18, &[18, 11]),
    (19, &[19, 18, 17, 14]),
    (20, &[20, 17]),
    (24, &[24, 23, 22, 17]),
    (32, &[32, 31, 30, 10]),
];

/// Taps used for widths missing from [`TAPS`].
pub const FALLBACK_TAPS: &[u32] = &[3, 2];

/// Look up the taps for `width`. The flag is `true` when the fallback was used.
pub fn taps_for(width: u32) -> (&'static [u32], bool) {
    match TAPS.iter().find(|(w, _)| *w == width) {
        Some((_, taps)) => (*taps, false),
        None => (FALLBACK_TAPS, true),
    }
}

/// Software model of the emitted Fibonacci LFSR.
///
/// Each step shifts left and feeds the XOR of the tap bits into bit 0.
/// With zero insertion the feedback is also XORed with "all bits below
/// the MSB are zero", which splices the all-zero state into the sequence
/// and extends the period to `2^width`.
#[derive(Clone, Debug)]
pub struct Lfsr {
    width: u32,
    taps: &'static [u32],
    state: u64,
    zero_insertion: bool,
}

impl Lfsr {
    /// `width` must be in `2..=64`; the seed is masked to `width` bits.
    pub fn new(width: u32, seed: u64) -> Self {
        let (taps, _) = taps_for(width);
        Self {
            width,
            taps,
            state: seed & mask(width),
            zero_insertion: true,
        }
    }

    pub fn with_zero_insertion(mut self, enabled: bool) -> Self {
        self.zero_insertion = enabled;
        self
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance one clock and return the new state.
    pub fn step(&mut self) -> u64 {
        let feedback = self
            .taps
            .iter()
            .filter(|&&tap| tap <= self.width)
            .fold(0, |acc, &tap| acc ^ ((self.state >> (tap - 1)) & 1));
        let low_bits = self.state & (mask(self.width) >> 1);
        let zero_detect = u64::from(self.zero_insertion && low_bits == 0);
        let shift_in = feedback ^ zero_detect;
        self.state = ((self.state << 1) | shift_in) & mask(self.width);
        self.state
    }
}

impl Iterator for Lfsr {
    type Item = u64;

    /// Yields the current state, then advances.
    fn next(&mut self) -> Option<u64> {
        let current = self.state;
        self.step();
        Some(current)
    }
}

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn period(width: u32, seed: u64, zero_insertion: bool) -> usize {
        let mut lfsr = Lfsr::new(width, seed).with_zero_insertion(zero_insertion);
        let start = lfsr.state();
        let limit = 1usize << (width + 1);
        for steps in 1..=limit {
            if lfsr.step() == start {
                return steps;
            }
        }
        panic!("no period found for width {}", width);
    }

    #[test]
    fn test_taps_lookup() {
        assert_eq!(taps_for(8), (&[8, 7, 6, 1][..], false));
        assert_eq!(taps_for(32), (&[32, 31, 30, 10][..], false));
        assert_eq!(taps_for(21), (FALLBACK_TAPS, true));
        assert_eq!(taps_for(2), (FALLBACK_TAPS, true));
    }

    #[test]
    fn test_every_tap_set_starts_at_width() {
        for (width, taps) in TAPS {
            assert_eq!(taps[0], *width);
            assert!(taps.iter().all(|&t| t >= 1 && t <= *width));
        }
    }

    #[test]
    fn test_full_period_with_zero_insertion() {
        for width in 3..=16 {
            assert_eq!(period(width, 1, true), 1 << width, "width {}", width);
        }
    }

    #[test]
    fn test_maximal_period_without_zero_insertion() {
        for width in 3..=12 {
            assert_eq!(period(width, 1, false), (1 << width) - 1, "width {}", width);
        }
    }

    #[test]
    fn test_zero_insertion_visits_every_state() {
        let seen: HashSet<u64> = Lfsr::new(7, 0x55).take(128).collect();
        assert_eq!(seen.len(), 128);
        assert!(seen.contains(&0));
    }

    #[test]
    fn test_shift_direction() {
        // width 3, taps [3, 2]: state 0b001 has both tap bits clear.
        let mut lfsr = Lfsr::new(3, 0b001).with_zero_insertion(false);
        assert_eq!(lfsr.step(), 0b010);
        assert_eq!(lfsr.step(), 0b101);
        assert_eq!(lfsr.step(), 0b011);
    }

    #[test]
    fn test_iterator_yields_seed_first() {
        let values: Vec<u64> = Lfsr::new(4, 9).take(3).collect();
        assert_eq!(values[0], 9);
        assert_ne!(values[1], 9);
    }
}
