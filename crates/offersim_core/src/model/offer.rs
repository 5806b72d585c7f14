//! The decision variable: a priced bundle of data, voice, and validity.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A single telecom offer. Immutable once constructed for a given replicate
/// or tier evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferSpec {
    /// Included data allowance in GB (0 = no data component).
    pub data_gb: f64,
    /// Included voice minutes (0 = no voice component).
    pub voice_min: f64,
    /// Validity length in days.
    pub validity_days: u32,
    /// One-time price.
    pub price: f64,
    /// Free-text label.
    pub label: String,
}

impl Default for OfferSpec {
    fn default() -> Self {
        Self {
            data_gb: 1.0,
            voice_min: 0.0,
            validity_days: 7,
            price: 100.0,
            label: "Standard".to_string(),
        }
    }
}

impl OfferSpec {
    pub fn validate(&self) -> SimResult<()> {
        if self.validity_days < 1 {
            return Err(SimError::InvalidOffer(
                "validity must be at least one day".to_string(),
            ));
        }
        if !self.data_gb.is_finite() || self.data_gb < 0.0 {
            return Err(SimError::InvalidOffer(
                "data allowance must be finite and non-negative".to_string(),
            ));
        }
        if !self.voice_min.is_finite() || self.voice_min < 0.0 {
            return Err(SimError::InvalidOffer(
                "voice allowance must be finite and non-negative".to_string(),
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(SimError::InvalidOffer(
                "price must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offer_validates() {
        assert!(OfferSpec::default().validate().is_ok());
    }

    #[test]
    fn zero_validity_is_rejected() {
        let offer = OfferSpec {
            validity_days: 0,
            ..Default::default()
        };
        assert!(matches!(offer.validate(), Err(SimError::InvalidOffer(_))));
    }

    #[test]
    fn negative_allowance_is_rejected() {
        let offer = OfferSpec {
            voice_min: -5.0,
            ..Default::default()
        };
        assert!(offer.validate().is_err());
    }
}
