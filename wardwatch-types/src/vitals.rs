//! Vital-sign snapshots reported by bedside sensors.

/// Arterial blood pressure in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    pub const fn new(systolic: u16, diastolic: u16) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }
}

impl core::fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// A single set of vital-sign readings for one patient.
///
/// Fields are independent of each other; range limits are applied by
/// whatever produces the snapshot, not by this type.
///
/// # Example
///
/// ```rust
/// use wardwatch_types::VitalsSnapshot;
///
/// let vitals = VitalsSnapshot::baseline()
///     .with_heart_rate(130)
///     .with_oxygen_saturation(97);
///
/// assert_eq!(vitals.heart_rate, 130);
/// assert_eq!(vitals.respiratory_rate, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VitalsSnapshot {
    /// Heart rate in beats per minute.
    pub heart_rate: u16,

    pub blood_pressure: BloodPressure,

    /// Respiratory rate in breaths per minute.
    pub respiratory_rate: u16,

    /// Body temperature in °C, kept to one decimal place.
    pub temperature: f64,

    /// Peripheral oxygen saturation (SpO2) in percent.
    pub oxygen_saturation: u8,

    /// Auxiliary ECG scalar reported by the sensor.
    pub ecg: u16,
}

impl VitalsSnapshot {
    /// The resting baseline assigned to newly admitted patients.
    ///
    /// HR 72, BP 120/80, RR 16, 37.0 °C, SpO2 98%, ECG 72.
    pub const fn baseline() -> Self {
        Self {
            heart_rate: 72,
            blood_pressure: BloodPressure::new(120, 80),
            respiratory_rate: 16,
            temperature: 37.0,
            oxygen_saturation: 98,
            ecg: 72,
        }
    }

    pub fn with_heart_rate(mut self, heart_rate: u16) -> Self {
        self.heart_rate = heart_rate;
        self
    }

    pub fn with_blood_pressure(mut self, systolic: u16, diastolic: u16) -> Self {
        self.blood_pressure = BloodPressure::new(systolic, diastolic);
        self
    }

    pub fn with_respiratory_rate(mut self, respiratory_rate: u16) -> Self {
        self.respiratory_rate = respiratory_rate;
        self
    }

    /// Set the temperature, rounded to one decimal place.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = round_tenths(temperature);
        self
    }

    pub fn with_oxygen_saturation(mut self, oxygen_saturation: u8) -> Self {
        self.oxygen_saturation = oxygen_saturation;
        self
    }

    pub fn with_ecg(mut self, ecg: u16) -> Self {
        self.ecg = ecg;
        self
    }
}

impl Default for VitalsSnapshot {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Round a temperature to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
