//! Sales domain module.
//!
//! Cart and checkout totals, and the order lifecycle (placement, delivery,
//! cancellation, returns), implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod cart;
pub mod order;

pub use cart::{Cart, CartItem, CartTotals, CheckoutSummary, ShippingConfig};
pub use order::{
    Order, OrderItem, OrderStatus, ReturnRequest, ReturnStatus, RETURN_WINDOW_DAYS,
    total_carbon_for_user,
};
