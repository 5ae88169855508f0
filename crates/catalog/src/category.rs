use serde::{Deserialize, Serialize};

use ecobazaar_core::ValueObject;

/// Product category.
///
/// Known codes map to dedicated variants. Any other code is kept verbatim in
/// `Unrecognized` so grouping stays total and the raw value round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Electronics,
    Clothing,
    Food,
    HomeGarden,
    Beauty,
    Sports,
    Toys,
    Books,
    Automotive,
    Health,
    Furniture,
    Other,
    Unrecognized(String),
}

impl Category {
    pub const KNOWN: [Category; 12] = [
        Category::Electronics,
        Category::Clothing,
        Category::Food,
        Category::HomeGarden,
        Category::Beauty,
        Category::Sports,
        Category::Toys,
        Category::Books,
        Category::Automotive,
        Category::Health,
        Category::Furniture,
        Category::Other,
    ];

    /// Parse a wire code (exact match, case-sensitive).
    pub fn from_code(code: &str) -> Self {
        match code {
            "ELECTRONICS" => Category::Electronics,
            "CLOTHING" => Category::Clothing,
            "FOOD" => Category::Food,
            "HOME_GARDEN" => Category::HomeGarden,
            "BEAUTY" => Category::Beauty,
            "SPORTS" => Category::Sports,
            "TOYS" => Category::Toys,
            "BOOKS" => Category::Books,
            "AUTOMOTIVE" => Category::Automotive,
            "HEALTH" => Category::Health,
            "FURNITURE" => Category::Furniture,
            "OTHER" => Category::Other,
            other => Category::Unrecognized(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Category::Electronics => "ELECTRONICS",
            Category::Clothing => "CLOTHING",
            Category::Food => "FOOD",
            Category::HomeGarden => "HOME_GARDEN",
            Category::Beauty => "BEAUTY",
            Category::Sports => "SPORTS",
            Category::Toys => "TOYS",
            Category::Books => "BOOKS",
            Category::Automotive => "AUTOMOTIVE",
            Category::Health => "HEALTH",
            Category::Furniture => "FURNITURE",
            Category::Other => "OTHER",
            Category::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable label; unrecognized codes are shown as-is.
    pub fn display_name(&self) -> &str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Food => "Food & Beverages",
            Category::HomeGarden => "Home & Garden",
            Category::Beauty => "Beauty & Personal Care",
            Category::Sports => "Sports & Outdoors",
            Category::Toys => "Toys & Games",
            Category::Books => "Books & Stationery",
            Category::Automotive => "Automotive",
            Category::Health => "Health & Wellness",
            Category::Furniture => "Furniture",
            Category::Other => "Other",
            Category::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }
}

impl ValueObject for Category {}

impl From<String> for Category {
    fn from(code: String) -> Self {
        match Category::from_code(&code) {
            Category::Unrecognized(_) => Category::Unrecognized(code),
            known => known,
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unrecognized(raw) => raw,
            known => known.code().to_string(),
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}
