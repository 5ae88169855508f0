//! Carbon impact value object (kg CO2e).

use serde::{Deserialize, Deserializer, Serialize};

use crate::value_object::ValueObject;

/// Carbon footprint in kg CO2e.
///
/// Always non-negative: negative or NaN inputs are clamped to `0.0`
/// on construction (including when deserialized), so every downstream
/// classification and sum operates on `[0, ∞)`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct CarbonImpact(f64);

impl CarbonImpact {
    pub const ZERO: CarbonImpact = CarbonImpact(0.0);

    pub fn new(kg: f64) -> Self {
        if kg.is_nan() || kg < 0.0 {
            Self(0.0)
        } else {
            Self(kg)
        }
    }

    pub fn kg(self) -> f64 {
        self.0
    }

    /// Carbon for `quantity` units.
    pub fn times(self, quantity: u32) -> f64 {
        self.0 * f64::from(quantity)
    }
}

impl ValueObject for CarbonImpact {}

impl From<f64> for CarbonImpact {
    fn from(kg: f64) -> Self {
        Self::new(kg)
    }
}

impl<'de> Deserialize<'de> for CarbonImpact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}

impl core::fmt::Display for CarbonImpact {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2} kg CO₂e", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        assert_eq!(CarbonImpact::new(-3.5).kg(), 0.0);
        assert_eq!(CarbonImpact::new(f64::NAN).kg(), 0.0);
        assert_eq!(CarbonImpact::new(4.25).kg(), 4.25);
    }

    #[test]
    fn deserialization_applies_the_clamp() {
        let c: CarbonImpact = serde_json::from_str("-1.0").unwrap();
        assert_eq!(c, CarbonImpact::ZERO);
    }

    #[test]
    fn times_scales_by_quantity() {
        assert_eq!(CarbonImpact::new(1.5).times(4), 6.0);
    }

    #[test]
    fn displays_with_unit() {
        assert_eq!(CarbonImpact::new(2.0).to_string(), "2.00 kg CO₂e");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: construction never yields a negative value.
            #[test]
            fn never_negative(kg in proptest::num::f64::ANY) {
                prop_assert!(CarbonImpact::new(kg).kg() >= 0.0);
            }
        }
    }
}
