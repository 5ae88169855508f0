//! Eco-rating classification.
//!
//! The rating is never stored: every caller derives it from a carbon impact
//! through [`classify`], so a rating can never go stale when the impact changes.

use serde::{Deserialize, Deserializer, Serialize};

use ecobazaar_core::{CarbonImpact, ValueObject};

/// Impacts strictly below this are eco-friendly (kg CO2e).
pub const ECO_FRIENDLY_THRESHOLD: f64 = 2.0;

/// Impacts up to and including this are moderate (kg CO2e).
pub const MODERATE_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EcoRating {
    EcoFriendly,
    Moderate,
    HighImpact,
    /// No carbon impact known, or an unrecognised rating code.
    Unrated,
}

impl EcoRating {
    /// The three tiers `classify` can produce, best first.
    pub const TIERS: [EcoRating; 3] = [EcoRating::EcoFriendly, EcoRating::Moderate, EcoRating::HighImpact];

    /// Parse a wire code; anything unrecognised is `Unrated`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "ECO_FRIENDLY" => EcoRating::EcoFriendly,
            "MODERATE" => EcoRating::Moderate,
            "HIGH_IMPACT" => EcoRating::HighImpact,
            _ => EcoRating::Unrated,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            EcoRating::EcoFriendly => "ECO_FRIENDLY",
            EcoRating::Moderate => "MODERATE",
            EcoRating::HighImpact => "HIGH_IMPACT",
            EcoRating::Unrated => "UNRATED",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EcoRating::EcoFriendly => "Eco-Friendly",
            EcoRating::Moderate => "Moderate",
            EcoRating::HighImpact => "High Impact",
            EcoRating::Unrated => "Unrated",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EcoRating::EcoFriendly => "Low carbon footprint (< 2 kg CO₂e)",
            EcoRating::Moderate => "Moderate carbon footprint (2-10 kg CO₂e)",
            EcoRating::HighImpact => "High carbon footprint (> 10 kg CO₂e)",
            EcoRating::Unrated => "Not yet rated",
        }
    }

    /// Per-unit points used by the order eco-score. `Unrated` sits in the middle.
    pub fn score_points(self) -> u32 {
        match self {
            EcoRating::EcoFriendly => 5,
            EcoRating::Moderate => 3,
            EcoRating::HighImpact => 1,
            EcoRating::Unrated => 2,
        }
    }
}

impl ValueObject for EcoRating {}

impl<'de> Deserialize<'de> for EcoRating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(EcoRating::from_code(&code))
    }
}

impl core::fmt::Display for EcoRating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Classify a carbon impact into one of the three tiers.
///
/// `< 2.0` eco-friendly, `2.0..=10.0` moderate, `> 10.0` high impact.
/// Negative and NaN inputs are clamped to 0 by [`CarbonImpact`].
pub fn classify(carbon_impact: impl Into<CarbonImpact>) -> EcoRating {
    let kg = carbon_impact.into().kg();
    if kg < ECO_FRIENDLY_THRESHOLD {
        EcoRating::EcoFriendly
    } else if kg <= MODERATE_THRESHOLD {
        EcoRating::Moderate
    } else {
        EcoRating::HighImpact
    }
}

/// Like [`classify`], but a missing impact is `Unrated`.
pub fn classify_optional(carbon_impact: Option<CarbonImpact>) -> EcoRating {
    match carbon_impact {
        Some(impact) => classify(impact),
        None => EcoRating::Unrated,
    }
}

/// Whether the impact is low enough to qualify for eco-certification.
pub fn qualifies_for_eco_certification(carbon_impact: impl Into<CarbonImpact>) -> bool {
    carbon_impact.into().kg() < ECO_FRIENDLY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(classify(0.0), EcoRating::EcoFriendly);
        assert_eq!(classify(1.99), EcoRating::EcoFriendly);
        assert_eq!(classify(2.0), EcoRating::Moderate);
        assert_eq!(classify(10.0), EcoRating::Moderate);
        assert_eq!(classify(10.01), EcoRating::HighImpact);
        assert_eq!(classify(f64::INFINITY), EcoRating::HighImpact);
    }

    #[test]
    fn negative_input_is_treated_as_zero() {
        assert_eq!(classify(-5.0), EcoRating::EcoFriendly);
        assert_eq!(classify(f64::NAN), EcoRating::EcoFriendly);
    }

    #[test]
    fn missing_impact_is_unrated() {
        assert_eq!(classify_optional(None), EcoRating::Unrated);
        assert_eq!(classify_optional(Some(CarbonImpact::new(12.0))), EcoRating::HighImpact);
    }

    #[test]
    fn score_points_table() {
        assert_eq!(EcoRating::EcoFriendly.score_points(), 5);
        assert_eq!(EcoRating::Moderate.score_points(), 3);
        assert_eq!(EcoRating::HighImpact.score_points(), 1);
        assert_eq!(EcoRating::Unrated.score_points(), 2);
    }

    #[test]
    fn certification_threshold_matches_eco_friendly_tier() {
        assert!(qualifies_for_eco_certification(1.5));
        assert!(!qualifies_for_eco_certification(2.0));
    }

    #[test]
    fn unknown_codes_deserialize_as_unrated() {
        let r: EcoRating = serde_json::from_str("\"SUPER_GREEN\"").unwrap();
        assert_eq!(r, EcoRating::Unrated);

        let r: EcoRating = serde_json::from_str("\"MODERATE\"").unwrap();
        assert_eq!(r, EcoRating::Moderate);
        assert_eq!(serde_json::to_string(&EcoRating::HighImpact).unwrap(), "\"HIGH_IMPACT\"");
    }

    #[test]
    fn labels() {
        assert_eq!(EcoRating::EcoFriendly.display_name(), "Eco-Friendly");
        assert_eq!(EcoRating::Unrated.description(), "Not yet rated");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: exactly one tier accepts each non-negative value.
            #[test]
            fn tiers_partition_non_negative_reals(kg in 0.0f64..1.0e6) {
                let accepted: Vec<EcoRating> = EcoRating::TIERS
                    .into_iter()
                    .filter(|tier| match tier {
                        EcoRating::EcoFriendly => kg < ECO_FRIENDLY_THRESHOLD,
                        EcoRating::Moderate => (ECO_FRIENDLY_THRESHOLD..=MODERATE_THRESHOLD).contains(&kg),
                        EcoRating::HighImpact => kg > MODERATE_THRESHOLD,
                        EcoRating::Unrated => false,
                    })
                    .collect();
                prop_assert_eq!(accepted.len(), 1);
                prop_assert_eq!(accepted[0], classify(kg));
            }

            /// Property: classification is idempotent.
            #[test]
            fn classify_is_idempotent(kg in proptest::num::f64::ANY) {
                prop_assert_eq!(classify(kg), classify(kg));
            }

            /// Property: the rating never decreases in severity as impact grows.
            #[test]
            fn classify_is_monotonic(a in 0.0f64..100.0, b in 0.0f64..100.0) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(classify(lo).score_points() >= classify(hi).score_points());
            }
        }
    }
}
