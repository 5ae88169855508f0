//! Monthly purchase (buyer) and sales (seller) reports.
//!
//! Reports are read models built from a slice of orders: filter by owner and
//! period, flatten to [`ReportLine`]s, aggregate. Orders of every status are
//! included; callers that want delivered-only figures filter beforehand.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ecobazaar_catalog::Category;
use ecobazaar_core::{CarbonImpact, DomainError, DomainResult, OrderId, UserId};
use ecobazaar_sales::{Order, OrderItem};

use crate::aggregate::{CarbonAggregator, CarbonSummary, ReportLine};
use crate::rating::{EcoRating, classify};

/// A calendar month in UTC, written `YYYY-MM`.
///
/// Covers the half-open range `[first instant of the month, first instant of
/// the next month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportPeriod {
    start: NaiveDate,
}

impl ReportPeriod {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|start| Self { start })
            .ok_or_else(|| DomainError::validation(format!("invalid report month: {year}-{month:02}")))
    }

    /// Parse `YYYY-MM`. Anything else is a validation error.
    pub fn parse(value: &str) -> DomainResult<Self> {
        let invalid = || DomainError::validation(format!("report month must be YYYY-MM, got {value:?}"));

        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// First instant after the period, `None` only at the end of chrono's range.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.start
            .checked_add_months(Months::new(1))
            .map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start() && self.end().is_none_or(|end| at < end)
    }
}

impl core::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl core::str::FromStr for ReportPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReportPeriod {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReportPeriod> for String {
    fn from(value: ReportPeriod) -> Self {
        value.to_string()
    }
}

/// One purchased or sold line in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub order_id: OrderId,
    pub product_name: String,
    pub category: Category,
    pub eco_rating: EcoRating,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub subtotal: f64,
    pub carbon_impact: CarbonImpact,
    pub total_carbon: f64,
    pub ordered_at: DateTime<Utc>,
    /// Seller for purchase reports, buyer for sales reports.
    pub counterparty_id: Option<UserId>,
}

impl ReportItem {
    fn new(order: &Order, item: &OrderItem, counterparty_id: Option<UserId>) -> Self {
        Self {
            order_id: order.id,
            product_name: item.product_name.clone(),
            category: item.category.clone(),
            eco_rating: classify(item.carbon_impact),
            quantity: item.quantity,
            price_per_unit: item.price_per_unit,
            subtotal: item.subtotal,
            carbon_impact: item.carbon_impact,
            total_carbon: item.total_carbon,
            ordered_at: order.placed_at,
            counterparty_id,
        }
    }
}

/// A buyer's monthly purchase report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReport {
    pub user_id: UserId,
    pub period: ReportPeriod,
    pub order_count: usize,
    pub items: Vec<ReportItem>,
    pub summary: CarbonSummary,
}

impl PurchaseReport {
    pub fn build(
        user_id: UserId,
        period: ReportPeriod,
        orders: &[Order],
        estimated_carbon_saved: Option<f64>,
    ) -> Self {
        let mut aggregator = CarbonAggregator::new();
        let mut items = Vec::new();
        let mut order_ids = HashSet::new();

        for order in orders
            .iter()
            .filter(|o| o.user_id == user_id && period.contains(o.placed_at))
        {
            order_ids.insert(order.id);
            for item in &order.items {
                aggregator.push(&ReportLine::from_order_item(order.id, item));
                items.push(ReportItem::new(order, item, item.seller_id));
            }
        }

        let summary = aggregator.finish(estimated_carbon_saved);
        tracing::info!(
            %user_id,
            %period,
            orders = order_ids.len(),
            items = summary.total_item_count,
            "purchase report built"
        );

        Self {
            user_id,
            period,
            order_count: order_ids.len(),
            items,
            summary,
        }
    }
}

/// Sales on one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub items_sold: u64,
    pub revenue: f64,
    pub order_count: usize,
}

/// A seller's monthly sales report. Only the seller's own lines are counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub seller_id: UserId,
    pub period: ReportPeriod,
    pub order_count: usize,
    pub items: Vec<ReportItem>,
    pub summary: CarbonSummary,
    pub daily_sales: BTreeMap<NaiveDate, DailySales>,
}

impl SalesReport {
    pub fn build(
        seller_id: UserId,
        period: ReportPeriod,
        orders: &[Order],
        estimated_carbon_saved: Option<f64>,
    ) -> Self {
        let mut aggregator = CarbonAggregator::new();
        let mut items = Vec::new();
        let mut order_ids = HashSet::new();
        let mut daily: BTreeMap<NaiveDate, (DailySales, HashSet<OrderId>)> = BTreeMap::new();

        for order in orders.iter().filter(|o| period.contains(o.placed_at)) {
            let date = order.placed_at.date_naive();
            for item in order.items.iter().filter(|i| i.is_sold_by(seller_id)) {
                order_ids.insert(order.id);
                aggregator.push(&ReportLine::from_order_item(order.id, item));
                items.push(ReportItem::new(order, item, Some(order.user_id)));

                let (day, day_orders) = daily.entry(date).or_insert_with(|| {
                    let day = DailySales {
                        date,
                        items_sold: 0,
                        revenue: 0.0,
                        order_count: 0,
                    };
                    (day, HashSet::new())
                });
                day.items_sold += u64::from(item.quantity);
                day.revenue += item.subtotal;
                day_orders.insert(order.id);
            }
        }

        let daily_sales = daily
            .into_iter()
            .map(|(date, (mut day, day_orders))| {
                day.order_count = day_orders.len();
                (date, day)
            })
            .collect();

        let summary = aggregator.finish(estimated_carbon_saved);
        tracing::info!(
            %seller_id,
            %period,
            orders = order_ids.len(),
            items = summary.total_item_count,
            "sales report built"
        );

        Self {
            seller_id,
            period,
            order_count: order_ids.len(),
            items,
            summary,
            daily_sales,
        }
    }

    pub fn total_revenue(&self) -> f64 {
        self.summary.total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ecobazaar_catalog::Product;
    use ecobazaar_core::ProductId;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn product(name: &str, category: Category, price: f64, carbon: f64, seller: UserId) -> Product {
        Product::new(ProductId::new(), name, category, price, carbon).with_seller(seller)
    }

    #[test]
    fn period_parses_strictly() {
        let period = ReportPeriod::parse("2025-02").unwrap();
        assert_eq!(period.year(), 2025);
        assert_eq!(period.month(), 2);
        assert_eq!(period.to_string(), "2025-02");

        for bad in ["2025-13", "2025-2", "25-02", "2025/02", "2025-02-01", "", "abcd-ef", "+202-01"] {
            assert!(
                matches!(ReportPeriod::parse(bad), Err(DomainError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn period_is_half_open() {
        let period = ReportPeriod::parse("2024-02").unwrap();
        assert!(period.contains(at(2024, 2, 1, 0)));
        assert!(period.contains(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(!period.contains(at(2024, 3, 1, 0)));
        assert!(!period.contains(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let period = ReportPeriod::parse("2024-12").unwrap();
        assert_eq!(period.end(), Some(at(2025, 1, 1, 0)));
    }

    #[test]
    fn period_serializes_as_string() {
        let period = ReportPeriod::parse("2025-07").unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2025-07\"");
        let back: ReportPeriod = serde_json::from_str("\"2025-07\"").unwrap();
        assert_eq!(back, period);
        assert!(serde_json::from_str::<ReportPeriod>("\"July\"").is_err());
    }

    #[test]
    fn purchase_report_filters_by_user_and_month() {
        let buyer = UserId::new();
        let seller = UserId::new();
        let tote = product("Tote", Category::Clothing, 200.0, 1.0, seller);
        let kettle = product("Kettle", Category::Electronics, 1500.0, 12.0, seller);

        let in_month = Order::new(
            OrderId::new(),
            buyer,
            vec![OrderItem::new(&tote, 2), OrderItem::new(&kettle, 1)],
            at(2025, 3, 10, 12),
        );
        let other_month = Order::new(OrderId::new(), buyer, vec![OrderItem::new(&tote, 5)], at(2025, 4, 1, 0));
        let other_user = Order::new(OrderId::new(), UserId::new(), vec![OrderItem::new(&tote, 5)], at(2025, 3, 11, 0));

        let period = ReportPeriod::parse("2025-03").unwrap();
        let report = PurchaseReport::build(buyer, period, &[in_month, other_month, other_user], Some(4.0));

        assert_eq!(report.order_count, 1);
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.summary.total_item_count, 3);
        assert_eq!(report.summary.total_amount, 1900.0);
        assert_eq!(report.summary.total_carbon_emitted, 14.0);
        assert_eq!(report.summary.rating_counts.eco_friendly, 2);
        assert_eq!(report.summary.rating_counts.high_impact, 1);
        assert_eq!(report.summary.estimated_carbon_saved, Some(4.0));
        assert_eq!(report.items[0].counterparty_id, Some(seller));
        assert_eq!(report.items[1].eco_rating, EcoRating::HighImpact);
    }

    #[test]
    fn empty_month_produces_empty_report() {
        let report = PurchaseReport::build(UserId::new(), ReportPeriod::parse("2025-01").unwrap(), &[], None);
        assert_eq!(report.order_count, 0);
        assert!(report.items.is_empty());
        assert_eq!(report.summary.average_carbon_per_item, 0.0);
    }

    #[test]
    fn sales_report_counts_only_the_sellers_lines() {
        let seller = UserId::new();
        let rival = UserId::new();
        let buyer = UserId::new();
        let ours = product("Bamboo brush", Category::Beauty, 50.0, 0.5, seller);
        let theirs = product("Plastic brush", Category::Beauty, 30.0, 3.0, rival);

        let mixed = Order::new(
            OrderId::new(),
            buyer,
            vec![OrderItem::new(&ours, 3), OrderItem::new(&theirs, 1)],
            at(2025, 5, 2, 8),
        );
        let same_day = Order::new(OrderId::new(), buyer, vec![OrderItem::new(&ours, 1)], at(2025, 5, 2, 20));
        let later = Order::new(OrderId::new(), buyer, vec![OrderItem::new(&ours, 2)], at(2025, 5, 9, 8));
        let rival_only = Order::new(OrderId::new(), buyer, vec![OrderItem::new(&theirs, 4)], at(2025, 5, 9, 9));

        let period = ReportPeriod::parse("2025-05").unwrap();
        let report = SalesReport::build(seller, period, &[mixed, same_day, later, rival_only], None);

        assert_eq!(report.order_count, 3);
        assert_eq!(report.items.len(), 3);
        assert!(report.items.iter().all(|i| i.counterparty_id == Some(buyer)));
        assert_eq!(report.summary.total_item_count, 6);
        assert_eq!(report.total_revenue(), 300.0);
        assert_eq!(report.summary.rating_counts.moderate, 0);

        let may_2 = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
        let day = &report.daily_sales[&may_2];
        assert_eq!(day.items_sold, 4);
        assert_eq!(day.revenue, 200.0);
        assert_eq!(day.order_count, 2);
        assert_eq!(report.daily_sales.len(), 2);
    }
}
