//! Reading generator: bounded random walk over vital signs.
//!
//! Each call perturbs heart rate, SpO2 and temperature from the previous
//! snapshot by a small signed step, then clamps to hard physiological
//! limits. Blood pressure, respiratory rate and ECG are carried through
//! unchanged.

use std::time::Duration;

use wardwatch_types::{round_tenths, BloodPressure, HistoryPoint, Timestamp, VitalsSnapshot};

use crate::random::RandomSource;

/// Spacing of backfilled history points.
pub const SEED_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Per-field step bounds and clamp limits for one generator mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    /// Heart rate moves by up to this many bpm either way.
    pub heart_rate_step: i32,
    pub oxygen_saturation_step: i32,
    pub temperature_step: f64,
    pub heart_rate_min: u16,
    pub heart_rate_max: u16,
    pub oxygen_saturation_min: u8,
    pub oxygen_saturation_max: u8,
}

impl Perturbation {
    /// Per-tick drift while monitoring live.
    pub const LIVE: Perturbation = Perturbation {
        heart_rate_step: 3,
        oxygen_saturation_step: 1,
        temperature_step: 0.2,
        heart_rate_min: 40,
        heart_rate_max: 180,
        oxygen_saturation_min: 85,
        oxygen_saturation_max: 100,
    };

    /// Gentler drift used when backfilling history at 15-minute resolution.
    pub const SEEDING: Perturbation = Perturbation {
        heart_rate_step: 2,
        oxygen_saturation_step: 1,
        temperature_step: 0.1,
        heart_rate_min: 45,
        heart_rate_max: 160,
        oxygen_saturation_min: 88,
        oxygen_saturation_max: 100,
    };
}

/// Produces the next snapshot from the previous one.
///
/// # Example
///
/// ```rust
/// use wardwatch_engine::{ReadingGenerator, SeededRandom};
/// use wardwatch_types::VitalsSnapshot;
///
/// let generator = ReadingGenerator::live();
/// let mut rng = SeededRandom::from_seed(1);
///
/// let next = generator.next(&VitalsSnapshot::baseline(), &mut rng);
/// assert!((40..=180).contains(&next.heart_rate));
/// assert_eq!(next.blood_pressure, VitalsSnapshot::baseline().blood_pressure);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingGenerator {
    profile: Perturbation,
}

impl ReadingGenerator {
    pub const fn new(profile: Perturbation) -> Self {
        Self { profile }
    }

    pub const fn live() -> Self {
        Self::new(Perturbation::LIVE)
    }

    pub const fn seeding() -> Self {
        Self::new(Perturbation::SEEDING)
    }

    /// Perturb `previous` by one step.
    ///
    /// Draws three values from `rng`, in order: heart rate, SpO2, temperature.
    pub fn next(&self, previous: &VitalsSnapshot, rng: &mut dyn RandomSource) -> VitalsSnapshot {
        let p = &self.profile;

        let heart_rate = i32::from(previous.heart_rate)
            + rng.int_in(-p.heart_rate_step, p.heart_rate_step);
        let oxygen_saturation = i32::from(previous.oxygen_saturation)
            + rng.int_in(-p.oxygen_saturation_step, p.oxygen_saturation_step);
        let temperature =
            previous.temperature + rng.float_in(-p.temperature_step, p.temperature_step);

        VitalsSnapshot {
            heart_rate: heart_rate
                .clamp(i32::from(p.heart_rate_min), i32::from(p.heart_rate_max))
                as u16,
            oxygen_saturation: oxygen_saturation.clamp(
                i32::from(p.oxygen_saturation_min),
                i32::from(p.oxygen_saturation_max),
            ) as u8,
            temperature: round_tenths(temperature),
            ..*previous
        }
    }

    /// Backfill `days` of history at [`SEED_INTERVAL`] spacing, ending at `now`.
    ///
    /// Every point is one perturbation step from the one before it, starting
    /// from `start`. Timestamps are non-decreasing (they collapse onto the
    /// epoch if `now` is less than the lookback).
    pub fn seed_history(
        &self,
        start: VitalsSnapshot,
        days: u32,
        now: Timestamp,
        rng: &mut dyn RandomSource,
    ) -> Vec<HistoryPoint> {
        let points = days as usize * 24 * 4;
        let mut current = start;
        let mut history = Vec::with_capacity(points);

        for i in 0..points {
            current = self.next(&current, rng);
            let steps_back = (points - 1 - i) as u32;
            history.push(HistoryPoint::new(now - SEED_INTERVAL * steps_back, current));
        }

        history
    }
}

impl Default for ReadingGenerator {
    fn default() -> Self {
        Self::live()
    }
}

/// A plausible resting snapshot with every field drawn at random.
pub fn random_baseline(rng: &mut dyn RandomSource) -> VitalsSnapshot {
    VitalsSnapshot {
        heart_rate: rng.int_in(60, 99) as u16,
        blood_pressure: BloodPressure::new(rng.int_in(100, 139) as u16, rng.int_in(60, 89) as u16),
        respiratory_rate: rng.int_in(12, 19) as u16,
        temperature: round_tenths(rng.float_in(36.5, 37.5)),
        oxygen_saturation: rng.int_in(95, 99) as u8,
        ecg: rng.int_in(60, 99) as u16,
    }
}
