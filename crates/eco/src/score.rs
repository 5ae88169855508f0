//! Order eco-score.
//!
//! Points awarded to a buyer for one delivered order:
//! - a flat base award,
//! - a rating bonus from the quantity-weighted average rating points,
//! - a flat bonus when the average carbon per unit is low,
//! - a bonus per eco-certified unit.
//!
//! The components are exposed separately so callers can show a breakdown.

use serde::{Deserialize, Serialize};

use ecobazaar_sales::{Order, OrderItem, OrderStatus};

use crate::rating::classify;

pub const BASE_POINTS: u32 = 10;
/// Multiplier applied to the average rating points before flooring.
pub const RATING_MULTIPLIER: f64 = 5.0;
/// Average kg CO2e per unit below which the low-carbon bonus applies.
pub const LOW_CARBON_AVERAGE_KG: f64 = 5.0;
pub const LOW_CARBON_BONUS: u32 = 20;
pub const CERTIFIED_UNIT_POINTS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoScoreBreakdown {
    pub base: u32,
    pub rating_bonus: u32,
    pub carbon_bonus: u32,
    pub certification_bonus: u32,
}

impl EcoScoreBreakdown {
    /// Score for `order`, or `None` when the order is not DELIVERED.
    ///
    /// `None` means "not applicable": callers must neither display nor
    /// accumulate it.
    pub fn for_order(order: &Order) -> Option<Self> {
        if order.status != OrderStatus::Delivered {
            return None;
        }
        Some(Self::from_items(&order.items, order.total_items))
    }

    /// Breakdown from the lines and the order's recorded unit count.
    ///
    /// With `total_items == 0` both average-based bonuses are 0.
    pub fn from_items(items: &[OrderItem], total_items: u32) -> Self {
        let mut weighted_rating_points: u64 = 0;
        let mut carbon_sum = 0.0;
        let mut certified_units: u32 = 0;

        for item in items {
            let points = classify(item.carbon_impact).score_points();
            weighted_rating_points += u64::from(points) * u64::from(item.quantity);
            carbon_sum += item.total_carbon;
            if item.eco_certified {
                certified_units = certified_units.saturating_add(item.quantity);
            }
        }

        let (rating_bonus, carbon_bonus) = if total_items == 0 {
            (0, 0)
        } else {
            let units = f64::from(total_items);
            let avg_rating = weighted_rating_points as f64 / units;
            let avg_carbon = carbon_sum / units;
            let rating_bonus = (avg_rating * RATING_MULTIPLIER).floor() as u32;
            let carbon_bonus = if avg_carbon < LOW_CARBON_AVERAGE_KG { LOW_CARBON_BONUS } else { 0 };
            (rating_bonus, carbon_bonus)
        };

        Self {
            base: BASE_POINTS,
            rating_bonus,
            carbon_bonus,
            certification_bonus: certified_units.saturating_mul(CERTIFIED_UNIT_POINTS),
        }
    }

    pub fn total(&self) -> u32 {
        self.base
            .saturating_add(self.rating_bonus)
            .saturating_add(self.carbon_bonus)
            .saturating_add(self.certification_bonus)
    }
}
