//! Catalog product models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crescendo_core::{Money, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: Money,
    pub description: String,
    pub specifications: String,
    pub image_url: String,
    pub rating: f64,
    /// May go negative under the permissive stock policy.
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating or replacing a product (admin).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: Money,
    pub description: String,
    #[serde(default)]
    pub specifications: String,
    pub image_url: String,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default = "default_stock")]
    pub stock: i64,
}

const fn default_rating() -> f64 {
    5.0
}

const fn default_stock() -> i64 {
    10
}

/// Catalog listing filter; all supplied predicates are ANDed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Exact category match. `all` (or absent) matches everything.
    pub category: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    /// Case-insensitive substring over name OR brand.
    pub search: Option<String>,
}

impl ProductFilter {
    /// Whether the category predicate should be applied.
    #[must_use]
    pub fn category_predicate(&self) -> Option<&str> {
        match self.category.as_deref() {
            None | Some("all") => None,
            Some(category) => Some(category),
        }
    }

    /// Whether the search predicate should be applied.
    #[must_use]
    pub fn search_predicate(&self) -> Option<&str> {
        match self.search.as_deref() {
            None | Some("") => None,
            Some(search) => Some(search),
        }
    }
}
