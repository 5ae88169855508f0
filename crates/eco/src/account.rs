use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use ecobazaar_core::{DomainError, DomainResult, OrderId, UserId};
use ecobazaar_sales::{Order, ReturnStatus};

use crate::score::EcoScoreBreakdown;

/// A user's cumulative eco score.
///
/// Credited when one of the user's orders is delivered, debited (never below
/// zero) when a return on a delivered order is approved. Each order is
/// credited at most once and debited at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoScoreAccount {
    pub user_id: UserId,
    pub balance: u32,
    #[serde(default)]
    credited_orders: BTreeSet<OrderId>,
    #[serde(default)]
    debited_orders: BTreeSet<OrderId>,
}

impl EcoScoreAccount {
    pub fn new(user_id: UserId) -> Self {
        Self::with_balance(user_id, 0)
    }

    pub fn with_balance(user_id: UserId, balance: u32) -> Self {
        Self {
            user_id,
            balance,
            credited_orders: BTreeSet::new(),
            debited_orders: BTreeSet::new(),
        }
    }

    pub fn is_credited(&self, order_id: OrderId) -> bool {
        self.credited_orders.contains(&order_id)
    }

    pub fn is_debited(&self, order_id: OrderId) -> bool {
        self.debited_orders.contains(&order_id)
    }

    /// Credit the score of a delivered order.
    ///
    /// Returns the points awarded, or `None` when the order is not delivered.
    /// Crediting the same order twice is a `Conflict`.
    pub fn credit_delivery(&mut self, order: &Order) -> DomainResult<Option<u32>> {
        self.ensure_owner(order)?;
        if self.is_credited(order.id) {
            return Err(DomainError::conflict(format!("order {} already credited", order.id)));
        }

        let Some(score) = EcoScoreBreakdown::for_order(order) else {
            return Ok(None);
        };
        let points = score.total();
        self.balance = self.balance.saturating_add(points);
        self.credited_orders.insert(order.id);

        tracing::info!(
            user_id = %self.user_id,
            order_id = %order.id,
            points,
            balance = self.balance,
            "eco score credited"
        );
        Ok(Some(points))
    }

    /// Take back the score of a delivered order whose return was approved.
    ///
    /// Returns the points actually removed (the balance is clamped at zero),
    /// or `None` when the order is not delivered. Debiting the same return
    /// twice is a `Conflict`.
    pub fn debit_return(&mut self, order: &Order) -> DomainResult<Option<u32>> {
        self.ensure_owner(order)?;
        if self.is_debited(order.id) {
            return Err(DomainError::conflict(format!("return on order {} already debited", order.id)));
        }

        if order.return_status() != Some(ReturnStatus::Approved) {
            return Err(DomainError::invariant("return has not been approved"));
        }
        let Some(score) = EcoScoreBreakdown::for_order(order) else {
            return Ok(None);
        };
        let removed = score.total().min(self.balance);
        self.balance -= removed;
        self.debited_orders.insert(order.id);

        tracing::info!(
            user_id = %self.user_id,
            order_id = %order.id,
            points = removed,
            balance = self.balance,
            "eco score debited"
        );
        Ok(Some(removed))
    }

    fn ensure_owner(&self, order: &Order) -> DomainResult<()> {
        if order.user_id != self.user_id {
            return Err(DomainError::invariant("order belongs to a different user"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ecobazaar_catalog::{Category, Product};
    use ecobazaar_core::{OrderId, ProductId};
    use ecobazaar_sales::{OrderItem, OrderStatus};

    fn order_for(user: UserId, seller: UserId) -> Order {
        let product = Product::new(ProductId::new(), "Mug", Category::HomeGarden, 100.0, 6.0).with_seller(seller);
        Order::new(
            OrderId::new(),
            user,
            vec![OrderItem::new(&product, 1)],
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn credits_only_delivered_orders() {
        let user = UserId::new();
        let mut account = EcoScoreAccount::new(user);
        let mut order = order_for(user, UserId::new());

        assert_eq!(account.credit_delivery(&order).unwrap(), None);
        assert_eq!(account.balance, 0);

        order
            .advance(OrderStatus::Delivered, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap())
            .unwrap();
        assert_eq!(account.credit_delivery(&order).unwrap(), Some(25));
        assert_eq!(account.balance, 25);
    }

    #[test]
    fn rejects_other_users_orders() {
        let mut account = EcoScoreAccount::new(UserId::new());
        let order = order_for(UserId::new(), UserId::new());
        assert!(matches!(
            account.credit_delivery(&order),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn approved_return_debits_and_clamps_at_zero() {
        let user = UserId::new();
        let seller = UserId::new();
        let delivered_at = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let mut order = order_for(user, seller);
        order.advance(OrderStatus::Delivered, delivered_at).unwrap();

        let mut account = EcoScoreAccount::with_balance(user, 10);

        order.request_return("broken", delivered_at).unwrap();
        assert!(matches!(
            account.debit_return(&order),
            Err(DomainError::InvariantViolation(_))
        ));

        order.approve_return(seller, delivered_at).unwrap();
        assert_eq!(account.debit_return(&order).unwrap(), Some(10));
        assert_eq!(account.balance, 0);
    }

    #[test]
    fn same_order_is_credited_once() {
        let user = UserId::new();
        let mut order = order_for(user, UserId::new());
        order
            .advance(OrderStatus::Delivered, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap())
            .unwrap();

        let mut account = EcoScoreAccount::with_balance(user, 100);
        assert_eq!(account.credit_delivery(&order).unwrap(), Some(25));
        assert!(matches!(account.credit_delivery(&order), Err(DomainError::Conflict(_))));
        assert_eq!(account.balance, 125);
        assert!(account.is_credited(order.id));
    }

    #[test]
    fn same_return_is_debited_once() {
        let user = UserId::new();
        let seller = UserId::new();
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let mut order = order_for(user, seller);
        order.advance(OrderStatus::Delivered, at).unwrap();
        order.request_return("scratched", at).unwrap();
        order.approve_return(seller, at).unwrap();

        let mut account = EcoScoreAccount::with_balance(user, 100);
        assert_eq!(account.debit_return(&order).unwrap(), Some(25));
        for _ in 0..2 {
            assert!(matches!(account.debit_return(&order), Err(DomainError::Conflict(_))));
        }
        assert_eq!(account.balance, 75);
        assert!(account.is_debited(order.id));
    }

    #[test]
    fn pending_order_can_be_credited_after_delivery() {
        let user = UserId::new();
        let mut order = order_for(user, UserId::new());
        let mut account = EcoScoreAccount::new(user);

        assert_eq!(account.credit_delivery(&order).unwrap(), None);
        assert!(!account.is_credited(order.id));
        order
            .advance(OrderStatus::Delivered, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap())
            .unwrap();
        assert_eq!(account.credit_delivery(&order).unwrap(), Some(25));
    }

    #[test]
    fn credit_then_debit_restores_balance() {
        let user = UserId::new();
        let seller = UserId::new();
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let mut order = order_for(user, seller);
        order.advance(OrderStatus::Delivered, at).unwrap();

        let mut account = EcoScoreAccount::with_balance(user, 40);
        account.credit_delivery(&order).unwrap();
        order.request_return("gift duplicate", at).unwrap();
        order.approve_return(seller, at).unwrap();
        account.debit_return(&order).unwrap();

        assert_eq!(account.balance, 40);
    }
}
