//! Triage classification from a single vitals snapshot.

use wardwatch_types::{TriageLevel, VitalsSnapshot};

/// Threshold bands for triage classification.
///
/// Critical bands are checked first, so a reading outside both bands is
/// never reported as `Observe`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriageThresholds {
    /// Heart rate above this is critical.
    pub critical_heart_rate_high: u16,
    /// Heart rate below this is critical.
    pub critical_heart_rate_low: u16,
    /// SpO2 below this is critical.
    pub critical_spo2_low: u8,
    pub observe_heart_rate_high: u16,
    pub observe_heart_rate_low: u16,
    pub observe_spo2_low: u8,
    /// Temperature above this warrants observation.
    pub observe_temperature_high: f64,
}

impl TriageThresholds {
    /// Ward defaults: critical HR >120 or <50 or SpO2 <90; observe HR >100
    /// or <60, SpO2 <94, or temperature >38.0 °C.
    pub const STANDARD: TriageThresholds = TriageThresholds {
        critical_heart_rate_high: 120,
        critical_heart_rate_low: 50,
        critical_spo2_low: 90,
        observe_heart_rate_high: 100,
        observe_heart_rate_low: 60,
        observe_spo2_low: 94,
        observe_temperature_high: 38.0,
    };

    pub fn classify(&self, v: &VitalsSnapshot) -> TriageLevel {
        if v.heart_rate > self.critical_heart_rate_high
            || v.heart_rate < self.critical_heart_rate_low
            || v.oxygen_saturation < self.critical_spo2_low
        {
            return TriageLevel::Critical;
        }

        if v.heart_rate > self.observe_heart_rate_high
            || v.heart_rate < self.observe_heart_rate_low
            || v.oxygen_saturation < self.observe_spo2_low
            || v.temperature > self.observe_temperature_high
        {
            return TriageLevel::Observe;
        }

        TriageLevel::Stable
    }
}

impl Default for TriageThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Classify with the standard ward thresholds.
///
/// ```rust
/// use wardwatch_engine::classify;
/// use wardwatch_types::{TriageLevel, VitalsSnapshot};
///
/// let v = VitalsSnapshot::baseline().with_heart_rate(130).with_oxygen_saturation(97);
/// assert_eq!(classify(&v), TriageLevel::Critical);
/// ```
pub fn classify(v: &VitalsSnapshot) -> TriageLevel {
    TriageThresholds::STANDARD.classify(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals(heart_rate: u16, spo2: u8, temperature: f64) -> VitalsSnapshot {
        VitalsSnapshot::baseline()
            .with_heart_rate(heart_rate)
            .with_oxygen_saturation(spo2)
            .with_temperature(temperature)
    }

    #[test]
    fn baseline_is_stable() {
        assert_eq!(classify(&VitalsSnapshot::baseline()), TriageLevel::Stable);
    }

    #[test]
    fn tachycardia_is_critical_regardless_of_spo2() {
        assert_eq!(classify(&vitals(130, 97, 37.0)), TriageLevel::Critical);
    }

    #[test]
    fn fever_alone_is_observe() {
        assert_eq!(classify(&vitals(90, 97, 38.5)), TriageLevel::Observe);
        assert_eq!(classify(&vitals(90, 97, 38.0)), TriageLevel::Stable);
    }

    #[test]
    fn critical_beats_observe() {
        // Fails the observe band (fever, HR > 100) and the critical band (SpO2 < 90)
        assert_eq!(classify(&vitals(110, 88, 39.0)), TriageLevel::Critical);
    }

    #[test]
    fn heart_rate_band_edges() {
        assert_eq!(classify(&vitals(121, 98, 37.0)), TriageLevel::Critical);
        assert_eq!(classify(&vitals(120, 98, 37.0)), TriageLevel::Observe);
        assert_eq!(classify(&vitals(101, 98, 37.0)), TriageLevel::Observe);
        assert_eq!(classify(&vitals(100, 98, 37.0)), TriageLevel::Stable);
        assert_eq!(classify(&vitals(60, 98, 37.0)), TriageLevel::Stable);
        assert_eq!(classify(&vitals(59, 98, 37.0)), TriageLevel::Observe);
        assert_eq!(classify(&vitals(50, 98, 37.0)), TriageLevel::Observe);
        assert_eq!(classify(&vitals(49, 98, 37.0)), TriageLevel::Critical);
    }

    #[test]
    fn spo2_band_edges() {
        assert_eq!(classify(&vitals(72, 94, 37.0)), TriageLevel::Stable);
        assert_eq!(classify(&vitals(72, 93, 37.0)), TriageLevel::Observe);
        assert_eq!(classify(&vitals(72, 90, 37.0)), TriageLevel::Observe);
        assert_eq!(classify(&vitals(72, 89, 37.0)), TriageLevel::Critical);
    }

    #[test]
    fn total_over_reachable_grid() {
        for hr in (30..=200).step_by(7) {
            for spo2 in 80..=100u8 {
                let level = classify(&vitals(hr, spo2, 37.0));
                let critical = hr > 120 || hr < 50 || spo2 < 90;
                assert_eq!(level == TriageLevel::Critical, critical, "hr {hr} spo2 {spo2}");
            }
        }
    }
}
