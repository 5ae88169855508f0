//! `ecobazaar-eco`: the eco-impact engine.
//!
//! Deterministic rules that turn product and order data into eco-ratings,
//! carbon summaries and eco-score points:
//! - [`rating`]: carbon impact → eco-rating tier.
//! - [`score`]: eco-score breakdown for a delivered order.
//! - [`account`]: a user's cumulative eco score (credits on delivery, debits on returns).
//! - [`aggregate`]: per-category and whole-report carbon/spending totals.
//! - [`report`]: monthly purchase (buyer) and sales (seller) reports.
//! - [`savings`]: carbon savings against category averages and alternatives.
//!
//! Everything here is pure: inputs are passed explicitly, nothing is cached,
//! and every function can be called concurrently without synchronisation.

pub mod account;
pub mod aggregate;
pub mod rating;
pub mod report;
pub mod savings;
pub mod score;

pub use account::EcoScoreAccount;
pub use aggregate::{CarbonAggregator, CarbonSummary, CategoryAggregate, RatingCounts, ReportLine};
pub use rating::{EcoRating, classify, classify_optional, qualifies_for_eco_certification};
pub use report::{DailySales, PurchaseReport, ReportItem, ReportPeriod, SalesReport};
pub use savings::{
    CarbonComparison, CarbonEquivalents, best_eco_value, carbon_savings, category_average,
    compare_alternative, eco_value_score, lower_carbon_alternatives, percentage_reduction,
};
pub use score::EcoScoreBreakdown;
