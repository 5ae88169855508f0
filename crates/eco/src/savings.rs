//! Carbon savings against category averages and lower-carbon alternatives.

use serde::{Deserialize, Serialize};

use ecobazaar_catalog::{Category, Product};
use ecobazaar_core::{CarbonImpact, Entity};

/// kg CO2e emitted per km by an average car.
const KM_PER_KG_DRIVEN: f64 = 4.5;
/// kg CO2e absorbed by one tree per year.
const KG_ABSORBED_PER_TREE: f64 = 21.0;

/// kg saved by choosing `carbon_impact` over the category average. Never negative.
pub fn carbon_savings(carbon_impact: CarbonImpact, category_average: f64) -> f64 {
    (category_average - carbon_impact.kg()).max(0.0)
}

/// Reduction against the category average in percent.
///
/// The ratio is rounded to 4 decimals before scaling, so results carry at
/// most two decimals. Impacts above the average yield 0, as does a zero
/// average.
pub fn percentage_reduction(carbon_impact: CarbonImpact, category_average: f64) -> f64 {
    if category_average <= 0.0 {
        return 0.0;
    }
    let ratio = (category_average - carbon_impact.kg()) / category_average;
    let rounded = (ratio * 10_000.0).round() / 10_000.0;
    (rounded * 100.0).max(0.0)
}

/// Mean carbon impact of the products in `category`, `None` if there are none.
pub fn category_average<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    category: &Category,
) -> Option<f64> {
    let (sum, count) = products
        .into_iter()
        .filter(|p| &p.category == category)
        .fold((0.0, 0u32), |(sum, count), p| (sum + p.carbon_impact.kg(), count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonComparison {
    pub quantity: u32,
    pub current_carbon: f64,
    pub alternative_carbon: f64,
    pub carbon_savings: f64,
    pub savings_percentage: f64,
}

/// Compare buying `quantity` of `current` against the same quantity of `alternative`.
pub fn compare_alternative(current: &Product, alternative: &Product, quantity: u32) -> CarbonComparison {
    let current_carbon = current.carbon_impact.times(quantity);
    let alternative_carbon = alternative.carbon_impact.times(quantity);

    CarbonComparison {
        quantity,
        current_carbon,
        alternative_carbon,
        carbon_savings: carbon_savings(CarbonImpact::new(alternative_carbon), current_carbon),
        savings_percentage: percentage_reduction(CarbonImpact::new(alternative_carbon), current_carbon),
    }
}

/// Same-category products with strictly lower carbon than `product`,
/// lowest first, at most `limit`.
pub fn lower_carbon_alternatives<'a>(
    product: &Product,
    candidates: impl IntoIterator<Item = &'a Product>,
    limit: usize,
) -> Vec<&'a Product> {
    let mut out: Vec<&Product> = candidates
        .into_iter()
        .filter(|c| !c.same_identity(product) && c.category == product.category)
        .filter(|c| c.carbon_impact.kg() < product.carbon_impact.kg())
        .collect();
    out.sort_by(|a, b| a.carbon_impact.kg().total_cmp(&b.carbon_impact.kg()));
    out.truncate(limit);
    out
}

/// Lower is better: one point per 1000 currency units plus one per kg CO2e.
pub fn eco_value_score(product: &Product) -> f64 {
    product.price / 1000.0 + product.carbon_impact.kg()
}

/// The `limit` products with the lowest [`eco_value_score`].
pub fn best_eco_value<'a>(products: impl IntoIterator<Item = &'a Product>, limit: usize) -> Vec<&'a Product> {
    let mut out: Vec<&Product> = products.into_iter().collect();
    out.sort_by(|a, b| eco_value_score(a).total_cmp(&eco_value_score(b)));
    out.truncate(limit);
    out
}

/// Everyday equivalents of an amount of CO2e.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonEquivalents {
    pub kg: f64,
    pub driving_km: f64,
    pub trees_to_offset: u64,
}

impl CarbonEquivalents {
    pub fn from_kg(kg: f64) -> Self {
        let kg = CarbonImpact::new(kg).kg();
        Self {
            kg,
            driving_km: kg * KM_PER_KG_DRIVEN,
            trees_to_offset: (kg / KG_ABSORBED_PER_TREE).ceil() as u64,
        }
    }
}
