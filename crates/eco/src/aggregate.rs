//! Category and carbon aggregation over report lines.
//!
//! Accumulation is a commutative fold: permuting the input lines yields the
//! same summary.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use ecobazaar_catalog::Category;
use ecobazaar_core::{CarbonImpact, OrderId};
use ecobazaar_sales::OrderItem;

use crate::rating::{EcoRating, classify};

/// One line item fed to the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    /// Source order, used for distinct order counts per category.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub category: Category,
    pub quantity: u32,
    pub unit_price: f64,
    pub unit_carbon: CarbonImpact,
}

impl ReportLine {
    pub fn from_order_item(order_id: OrderId, item: &OrderItem) -> Self {
        Self {
            order_id: Some(order_id),
            category: item.category.clone(),
            quantity: item.quantity,
            unit_price: item.price_per_unit,
            unit_carbon: item.carbon_impact,
        }
    }

    pub fn amount(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    pub fn carbon(&self) -> f64 {
        self.unit_carbon.times(self.quantity)
    }
}

/// Totals for one category. `total_amount` is money spent (buyer reports)
/// or revenue (seller reports).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub category: Category,
    pub item_count: u64,
    pub total_amount: f64,
    pub total_carbon_emitted: f64,
    pub order_count: usize,
}

/// Units bought/sold per eco-rating tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingCounts {
    pub eco_friendly: u64,
    pub moderate: u64,
    pub high_impact: u64,
}

impl RatingCounts {
    pub fn record(&mut self, rating: EcoRating, quantity: u32) {
        let quantity = u64::from(quantity);
        match rating {
            EcoRating::EcoFriendly => self.eco_friendly += quantity,
            EcoRating::Moderate => self.moderate += quantity,
            EcoRating::HighImpact => self.high_impact += quantity,
            EcoRating::Unrated => {}
        }
    }

    pub fn get(&self, rating: EcoRating) -> u64 {
        match rating {
            EcoRating::EcoFriendly => self.eco_friendly,
            EcoRating::Moderate => self.moderate,
            EcoRating::HighImpact => self.high_impact,
            EcoRating::Unrated => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.eco_friendly + self.moderate + self.high_impact
    }
}

/// Aggregated carbon/spending figures for a set of report lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonSummary {
    pub categories: HashMap<Category, CategoryAggregate>,
    pub rating_counts: RatingCounts,
    pub total_item_count: u64,
    pub total_amount: f64,
    pub total_carbon_emitted: f64,
    /// Supplied by the recommendation service; passed through untouched.
    pub estimated_carbon_saved: Option<f64>,
    /// 0 when there are no items.
    pub average_carbon_per_item: f64,
}

impl CarbonSummary {
    /// Categories ordered by amount, largest first (ties by category code).
    pub fn by_amount_desc(&self) -> Vec<&CategoryAggregate> {
        let mut out: Vec<&CategoryAggregate> = self.categories.values().collect();
        out.sort_by(|a, b| {
            b.total_amount
                .total_cmp(&a.total_amount)
                .then_with(|| a.category.code().cmp(b.category.code()))
        });
        out
    }

    pub fn category(&self, category: &Category) -> Option<&CategoryAggregate> {
        self.categories.get(category)
    }
}

#[derive(Debug, Default)]
struct CategoryAccumulator {
    item_count: u64,
    total_amount: f64,
    total_carbon: f64,
    order_ids: HashSet<OrderId>,
}

/// Streaming accumulator behind [`CarbonSummary`].
#[derive(Debug, Default)]
pub struct CarbonAggregator {
    groups: HashMap<Category, CategoryAccumulator>,
    rating_counts: RatingCounts,
    total_items: u64,
    total_amount: f64,
    total_carbon: f64,
}

impl CarbonAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &ReportLine) {
        let amount = line.amount();
        let carbon = line.carbon();

        let group = self.groups.entry(line.category.clone()).or_default();
        group.item_count += u64::from(line.quantity);
        group.total_amount += amount;
        group.total_carbon += carbon;
        if let Some(order_id) = line.order_id {
            group.order_ids.insert(order_id);
        }

        self.rating_counts.record(classify(line.unit_carbon), line.quantity);
        self.total_items += u64::from(line.quantity);
        self.total_amount += amount;
        self.total_carbon += carbon;
    }

    pub fn finish(self, estimated_carbon_saved: Option<f64>) -> CarbonSummary {
        let average_carbon_per_item = if self.total_items == 0 {
            0.0
        } else {
            self.total_carbon / self.total_items as f64
        };

        let categories = self
            .groups
            .into_iter()
            .map(|(category, acc)| {
                let aggregate = CategoryAggregate {
                    category: category.clone(),
                    item_count: acc.item_count,
                    total_amount: acc.total_amount,
                    total_carbon_emitted: acc.total_carbon,
                    order_count: acc.order_ids.len(),
                };
                (category, aggregate)
            })
            .collect();

        CarbonSummary {
            categories,
            rating_counts: self.rating_counts,
            total_item_count: self.total_items,
            total_amount: self.total_amount,
            total_carbon_emitted: self.total_carbon,
            estimated_carbon_saved,
            average_carbon_per_item,
        }
    }
}

impl<'a> Extend<&'a ReportLine> for CarbonAggregator {
    fn extend<I: IntoIterator<Item = &'a ReportLine>>(&mut self, iter: I) {
        for line in iter {
            self.push(line);
        }
    }
}

/// Aggregate `lines` in one pass.
pub fn aggregate<'a>(
    lines: impl IntoIterator<Item = &'a ReportLine>,
    estimated_carbon_saved: Option<f64>,
) -> CarbonSummary {
    let mut aggregator = CarbonAggregator::new();
    aggregator.extend(lines);
    aggregator.finish(estimated_carbon_saved)
}
