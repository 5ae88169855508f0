//! Shopping cart and checkout totals.
//!
//! Lines snapshot the product's price and carbon impact when added; the
//! checkout summary applies the shipping rules on top of the cart totals.

use serde::{Deserialize, Serialize};

use ecobazaar_catalog::{Category, Product};
use ecobazaar_core::{CarbonImpact, DomainError, DomainResult, ProductId, UserId};

/// Cart line: a snapshot of the product's price and carbon impact at the time
/// it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: Category,
    #[serde(default)]
    pub seller_id: Option<UserId>,
    #[serde(default)]
    pub eco_certified: bool,
    pub quantity: u32,
    pub price: f64,
    pub carbon_impact: CarbonImpact,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            category: product.category.clone(),
            seller_id: product.seller_id,
            eco_certified: product.eco_certified,
            quantity,
            price: product.price,
            carbon_impact: product.carbon_impact,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    pub fn total_carbon(&self) -> f64 {
        self.carbon_impact.times(self.quantity)
    }
}

/// Running totals of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_price: f64,
    pub total_carbon: f64,
    pub total_items: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of a product. Adding a product already in the cart
    /// increases its quantity and keeps the original price/carbon snapshot.
    pub fn add(&mut self, product: &Product, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
            }
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
        Ok(())
    }

    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation(
                "quantity must be positive (remove the item instead)",
            ));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id} is not in the cart")))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, product_id: ProductId) -> DomainResult<CartItem> {
        let pos = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id} is not in the cart")))?;
        Ok(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn totals(&self) -> CartTotals {
        self.items.iter().fold(CartTotals::default(), |acc, item| CartTotals {
            total_price: acc.total_price + item.subtotal(),
            total_carbon: acc.total_carbon + item.total_carbon(),
            total_items: acc.total_items.saturating_add(item.quantity),
        })
    }
}

/// Shipping rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingConfig {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: f64,
    pub shipping_charge: f64,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: 499.0,
            shipping_charge: 79.0,
        }
    }
}

impl ShippingConfig {
    pub fn shipping_for(&self, subtotal: f64) -> f64 {
        if subtotal >= self.free_shipping_threshold {
            0.0
        } else {
            self.shipping_charge
        }
    }
}

/// Checkout price/carbon summary for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
    pub total_carbon: f64,
    pub total_items: u32,
    /// How much more must be spent to qualify for free shipping (0 once it applies).
    pub amount_to_free_shipping: f64,
}

impl CheckoutSummary {
    pub fn for_cart(cart: &Cart, shipping: &ShippingConfig) -> Self {
        let totals = cart.totals();
        let charge = shipping.shipping_for(totals.total_price);
        Self {
            subtotal: totals.total_price,
            shipping: charge,
            total: totals.total_price + charge,
            total_carbon: totals.total_carbon,
            total_items: totals.total_items,
            amount_to_free_shipping: (shipping.free_shipping_threshold - totals.total_price).max(0.0),
        }
    }

    pub fn ships_free(&self) -> bool {
        self.shipping == 0.0
    }
}
