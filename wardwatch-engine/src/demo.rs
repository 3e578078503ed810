//! Demo roster for simulated wards.

use std::time::Duration;

use chrono::DateTime;
use wardwatch_types::{
    Condition, Gender, HistoryWindow, NewPatientFields, PatientId, PatientMonitoringState,
    Timestamp, TriageLevel,
};

use crate::classifier::classify;
use crate::generator::{random_baseline, ReadingGenerator};
use crate::random::RandomSource;

const FIRST_NAMES: [&str; 10] = [
    "John", "Jane", "Alex", "Emily", "Chris", "Katie", "Michael", "Sarah", "David", "Laura",
];
const LAST_NAMES: [&str; 10] = [
    "Smith", "Doe", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez",
];
const CONDITIONS: [Condition; 4] = [
    Condition::Stable,
    Condition::Observe,
    Condition::Critical,
    Condition::Discharged,
];
const SENSOR_VARIANTS: [&str; 3] = ["X", "S", "G"];
const DEFAULT_NOTE: &str =
    "Patient is resting comfortably. No immediate concerns noted during the last check-up.";

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[rng.index(items.len())]
}

/// Format a timestamp as a `YYYY-MM-DD` calendar date (UTC).
pub fn calendar_date(at: Timestamp) -> String {
    let millis = i64::try_from(at.as_millis()).unwrap_or(i64::MAX);
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Build `count` randomly generated patients with backfilled history.
///
/// Ids run from 1 to `count`. Each patient's current vitals are the last
/// history point (or a fresh random baseline when `history_days` is 0), and
/// triage is classified from them. Discharged patients are reported stable.
pub fn demo_roster(
    count: usize,
    history_days: u32,
    capacity: usize,
    now: Timestamp,
    rng: &mut dyn RandomSource,
) -> Vec<PatientMonitoringState> {
    let generator = ReadingGenerator::seeding();

    (0..count)
        .map(|i| {
            let name = format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES));
            let age = rng.int_in(20, 79) as u32;
            let gender = if rng.chance(0.5) {
                Gender::Male
            } else {
                Gender::Female
            };
            let condition = *pick(rng, &CONDITIONS);
            let sensor_model = format!("VitalSense Pro {}", pick(rng, &SENSOR_VARIANTS));
            let in_isolation = rng.chance(0.5);
            let calibrated_days_ago = rng.int_in(1, 29) as u32;

            let fields = NewPatientFields::new(name, age)
                .gender(gender)
                .condition(condition)
                .device_serial(format!("SN-WARD-{}", 1000 + i))
                .sensor_model(sensor_model)
                .in_isolation(in_isolation)
                .calibration_date(calendar_date(now - DAY * calibrated_days_ago))
                .notes(DEFAULT_NOTE);

            let baseline = random_baseline(rng);
            let points = generator.seed_history(baseline, history_days, now, rng);
            let vitals = points.last().map(|p| p.vitals).unwrap_or(baseline);

            let mut patient =
                PatientMonitoringState::admit(PatientId(i as u64 + 1), fields, now, capacity);
            // Seeded points are in non-decreasing order, so this cannot fail.
            patient.history = HistoryWindow::from_points(capacity, points)
                .unwrap_or_else(|_| HistoryWindow::new(capacity));
            patient.vitals = vitals;
            patient.triage = if patient.is_discharged() {
                TriageLevel::Stable
            } else {
                classify(&vitals)
            };
            patient
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use wardwatch_types::AlertState;

    #[test]
    fn builds_requested_patients() {
        let mut rng = SeededRandom::from_seed(15);
        let now = Timestamp::from_secs(1_700_000_000);
        let patients = demo_roster(15, 1, 672, now, &mut rng);

        assert_eq!(patients.len(), 15);
        for (i, patient) in patients.iter().enumerate() {
            assert_eq!(patient.id, PatientId(i as u64 + 1));
            assert_eq!(patient.profile.device_serial, format!("SN-WARD-{}", 1000 + i));
            assert!(patient.profile.sensor_model.starts_with("VitalSense Pro "));
            assert!((20..80).contains(&patient.profile.age));
            assert_eq!(patient.history.len(), 96);
            assert_eq!(patient.history.latest().map(|p| p.timestamp), Some(now));
            assert_eq!(patient.history.latest().map(|p| p.vitals), Some(patient.vitals));
            assert_eq!(patient.alert, AlertState::Clear);
            assert_eq!(patient.profile.calibration_date.len(), 10);
            if patient.is_discharged() {
                assert_eq!(patient.triage, TriageLevel::Stable);
            } else {
                assert_eq!(patient.triage, classify(&patient.vitals));
            }
        }
    }

    #[test]
    fn week_of_history_fits_default_capacity() {
        let mut rng = SeededRandom::from_seed(3);
        let patients = demo_roster(2, 7, 672, Timestamp::from_secs(1_700_000_000), &mut rng);
        assert!(patients.iter().all(|p| p.history.len() == 672));
    }

    #[test]
    fn same_seed_same_roster() {
        let now = Timestamp::from_secs(1_700_000_000);
        let a = demo_roster(5, 1, 96, now, &mut SeededRandom::from_seed(9));
        let b = demo_roster(5, 1, 96, now, &mut SeededRandom::from_seed(9));
        assert_eq!(a, b);
    }

    #[test]
    fn formats_calendar_dates() {
        assert_eq!(calendar_date(Timestamp::EPOCH), "1970-01-01");
        assert_eq!(calendar_date(Timestamp::from_secs(1_700_000_000)), "2023-11-14");
    }
}
