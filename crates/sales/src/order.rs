//! Placed orders: status lifecycle, cancellation and seller-approved returns.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use ecobazaar_catalog::{Category, Product};
use ecobazaar_core::{CarbonImpact, DomainError, DomainResult, Entity, OrderId, ProductId, UserId};

use crate::cart::{Cart, CartItem};

/// Returns may be requested up to this many days after delivery.
pub const RETURN_WINDOW_DAYS: i64 = 7;

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
}

/// Order line, with product price and carbon impact captured at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: Category,
    #[serde(default)]
    pub seller_id: Option<UserId>,
    #[serde(default)]
    pub eco_certified: bool,
    pub quantity: u32,
    pub price_per_unit: f64,
    /// kg CO2e per unit; the line's eco-rating is derived from this.
    pub carbon_impact: CarbonImpact,
    pub subtotal: f64,
    pub total_carbon: f64,
}

impl OrderItem {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self::from_cart_item(&CartItem::from_product(product, quantity))
    }

    pub fn from_cart_item(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            category: item.category.clone(),
            seller_id: item.seller_id,
            eco_certified: item.eco_certified,
            quantity: item.quantity,
            price_per_unit: item.price,
            carbon_impact: item.carbon_impact,
            subtotal: item.subtotal(),
            total_carbon: item.total_carbon(),
        }
    }

    pub fn is_sold_by(&self, seller_id: UserId) -> bool {
        self.seller_id == Some(seller_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub reason: String,
    pub requested_at: DateTime<Utc>,
    pub status: ReturnStatus,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A placed order.
///
/// `total_items`, `total_carbon` and `total_price` are the totals recorded at
/// placement; `Order::new` and `Order::place` keep them equal to the sums over
/// `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_items: u32,
    pub total_carbon: f64,
    pub total_price: f64,
    pub placed_at: DateTime<Utc>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub return_request: Option<ReturnRequest>,
}

impl Order {
    /// Build a PENDING order with totals derived from `items`.
    pub fn new(id: OrderId, user_id: UserId, items: Vec<OrderItem>, placed_at: DateTime<Utc>) -> Self {
        let total_items = items.iter().fold(0u32, |acc, i| acc.saturating_add(i.quantity));
        let total_carbon = items.iter().map(|i| i.total_carbon).sum();
        let total_price = items.iter().map(|i| i.subtotal).sum();
        Self {
            id,
            user_id,
            status: OrderStatus::Pending,
            items,
            total_items,
            total_carbon,
            total_price,
            placed_at,
            delivered_at: None,
            return_request: None,
        }
    }

    /// Place an order from the cart contents.
    pub fn place(id: OrderId, user_id: UserId, cart: &Cart, placed_at: DateTime<Utc>) -> DomainResult<Self> {
        if cart.is_empty() {
            return Err(DomainError::validation("cannot place an order from an empty cart"));
        }
        let items = cart.items().iter().map(OrderItem::from_cart_item).collect();
        let order = Self::new(id, user_id, items, placed_at);
        tracing::debug!(
            order_id = %order.id,
            user_id = %order.user_id,
            total_items = order.total_items,
            total_carbon = order.total_carbon,
            "order placed"
        );
        Ok(order)
    }

    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    /// True if at least one line belongs to `seller_id`.
    pub fn contains_seller(&self, seller_id: UserId) -> bool {
        self.items.iter().any(|i| i.is_sold_by(seller_id))
    }

    pub fn return_status(&self) -> Option<ReturnStatus> {
        self.return_request.as_ref().map(|r| r.status)
    }

    /// Move the order to `status`. Reaching DELIVERED records `at` as the
    /// delivery time.
    pub fn advance(&mut self, status: OrderStatus, at: DateTime<Utc>) -> DomainResult<()> {
        if status == OrderStatus::Cancelled {
            return self.cancel();
        }
        if self.status == status {
            return Err(DomainError::conflict(format!("order is already {status:?}")));
        }
        match self.status {
            OrderStatus::Cancelled => {
                return Err(DomainError::invariant("cancelled orders cannot change status"));
            }
            OrderStatus::Delivered => {
                return Err(DomainError::invariant("delivered orders cannot change status"));
            }
            _ => {}
        }

        self.status = status;
        if status == OrderStatus::Delivered {
            self.delivered_at = Some(at);
        }
        tracing::debug!(order_id = %self.id, status = ?status, "order status changed");
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        match self.status {
            OrderStatus::Delivered => Err(DomainError::invariant("cannot cancel a delivered order")),
            OrderStatus::Cancelled => Err(DomainError::conflict("order is already cancelled")),
            _ => {
                self.status = OrderStatus::Cancelled;
                tracing::debug!(order_id = %self.id, "order cancelled");
                Ok(())
            }
        }
    }

    pub fn request_return(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Delivered {
            return Err(DomainError::invariant("only delivered orders can be returned"));
        }
        if self.return_request.is_some() {
            return Err(DomainError::conflict("return already requested for this order"));
        }
        let delivered_at = self
            .delivered_at
            .ok_or_else(|| DomainError::invariant("delivered order has no delivery date"))?;
        if delivered_at < now - Duration::days(RETURN_WINDOW_DAYS) {
            return Err(DomainError::invariant(format!(
                "return window has expired; returns are only allowed within {RETURN_WINDOW_DAYS} days of delivery"
            )));
        }

        self.return_request = Some(ReturnRequest {
            reason: reason.into(),
            requested_at: now,
            status: ReturnStatus::Pending,
            resolved_at: None,
        });
        tracing::debug!(order_id = %self.id, "return requested");
        Ok(())
    }

    pub fn approve_return(&mut self, seller_id: UserId, at: DateTime<Utc>) -> DomainResult<()> {
        self.resolve_return(seller_id, ReturnStatus::Approved, at)
    }

    pub fn reject_return(&mut self, seller_id: UserId, at: DateTime<Utc>) -> DomainResult<()> {
        self.resolve_return(seller_id, ReturnStatus::Rejected, at)
    }

    fn resolve_return(&mut self, seller_id: UserId, outcome: ReturnStatus, at: DateTime<Utc>) -> DomainResult<()> {
        if !self.contains_seller(seller_id) {
            return Err(DomainError::invariant("order does not contain the seller's products"));
        }
        let order_id = self.id;
        let request = self
            .return_request
            .as_mut()
            .ok_or_else(|| DomainError::not_found("no return request for this order"))?;
        if request.status != ReturnStatus::Pending {
            return Err(DomainError::conflict("return request already processed"));
        }

        request.status = outcome;
        request.resolved_at = Some(at);
        tracing::debug!(order_id = %order_id, outcome = ?outcome, "return resolved");
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Total carbon (kg CO2e) across every order of `user_id`.
pub fn total_carbon_for_user(orders: &[Order], user_id: UserId) -> f64 {
    orders
        .iter()
        .filter(|o| o.user_id == user_id)
        .map(|o| o.total_carbon)
        .sum()
}
