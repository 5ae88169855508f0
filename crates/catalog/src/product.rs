use serde::{Deserialize, Serialize};

use ecobazaar_core::{CarbonImpact, Entity, ProductId, UserId};

use crate::category::Category;

/// Catalog product as delivered by the storefront API.
///
/// There is no eco-rating field: the rating is always derived
/// from `carbon_impact`, so a rating sent alongside the record is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Unit price in the storefront currency (INR).
    pub price: f64,
    /// kg CO2e per unit.
    pub carbon_impact: CarbonImpact,
    #[serde(default)]
    pub eco_certified: bool,
    #[serde(default)]
    pub seller_id: Option<UserId>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: Category,
        price: f64,
        carbon_impact: impl Into<CarbonImpact>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            price,
            carbon_impact: carbon_impact.into(),
            eco_certified: false,
            seller_id: None,
        }
    }

    pub fn with_eco_certified(mut self, eco_certified: bool) -> Self {
        self.eco_certified = eco_certified;
        self
    }

    pub fn with_seller(mut self, seller_id: UserId) -> Self {
        self.seller_id = Some(seller_id);
        self
    }

    pub fn is_sold_by(&self, seller_id: UserId) -> bool {
        self.seller_id == Some(seller_id)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
