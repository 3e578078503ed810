//! Triage acuity levels.

/// Acuity classification derived from a patient's current vitals.
///
/// Variants are declared in increasing severity, so the derived ordering
/// sorts `Critical > Observe > Stable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriageLevel {
    #[default]
    Stable,
    Observe,
    Critical,
}

impl TriageLevel {
    /// Position in a critical-first listing (0 = most severe).
    pub fn display_rank(&self) -> u8 {
        match self {
            TriageLevel::Critical => 0,
            TriageLevel::Observe => 1,
            TriageLevel::Stable => 2,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, TriageLevel::Critical)
    }
}

impl core::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TriageLevel::Stable => write!(f, "Stable"),
            TriageLevel::Observe => write!(f, "Observe"),
            TriageLevel::Critical => write!(f, "Critical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(TriageLevel::Critical > TriageLevel::Observe);
        assert!(TriageLevel::Observe > TriageLevel::Stable);

        let mut levels = vec![TriageLevel::Observe, TriageLevel::Critical, TriageLevel::Stable];
        levels.sort_by_key(|l| l.display_rank());
        assert_eq!(
            levels,
            vec![TriageLevel::Critical, TriageLevel::Observe, TriageLevel::Stable]
        );
    }
}
