use anyhow::{ensure, Result};

use crate::domains::requests::Urgency;

/// Urgency radius policy
///
/// Maximum distance, in kilometers, a volunteer may be from the request to be
/// considered at all. Urgent requests only pull from close by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusPolicy {
    pub high_km: f64,
    pub medium_km: f64,
    pub low_km: f64,
}

impl RadiusPolicy {
    pub const DEFAULT: RadiusPolicy = RadiusPolicy {
        high_km: 5.0,
        medium_km: 10.0,
        low_km: 20.0,
    };

    pub fn max_radius_for(&self, urgency: Urgency) -> f64 {
        match urgency {
            Urgency::High => self.high_km,
            Urgency::Medium => self.medium_km,
            Urgency::Low => self.low_km,
        }
    }

    /// Radius for a free-text urgency label; unknown labels get the medium radius.
    pub fn max_radius_for_label(&self, label: &str) -> f64 {
        self.max_radius_for(Urgency::from_label(label))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, km) in [
            ("high", self.high_km),
            ("medium", self.medium_km),
            ("low", self.low_km),
        ] {
            ensure!(
                km.is_finite() && km > 0.0,
                "{name} urgency radius must be a positive number of km, got {km}"
            );
        }
        Ok(())
    }
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        let policy = RadiusPolicy::default();
        assert_eq!(policy.max_radius_for(Urgency::High), 5.0);
        assert_eq!(policy.max_radius_for(Urgency::Medium), 10.0);
        assert_eq!(policy.max_radius_for(Urgency::Low), 20.0);
    }

    #[test]
    fn unknown_label_uses_medium_radius() {
        let policy = RadiusPolicy::default();
        assert_eq!(policy.max_radius_for_label("critical"), 10.0);
        assert_eq!(policy.max_radius_for_label("High"), 5.0);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let policy = RadiusPolicy {
            medium_km: 0.0,
            ..RadiusPolicy::default()
        };
        assert!(policy.validate().is_err());
        assert!(RadiusPolicy::default().validate().is_ok());
    }
}
