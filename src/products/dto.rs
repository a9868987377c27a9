use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::repo_types::Product;
use crate::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct AddProductRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,
    pub image: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
    #[validate(custom(function = "validate_not_blank"))]
    pub brand: String,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub stock: i32,
    pub brand: String,
    pub rating: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            category: p.category,
            image: p.image,
            stock: p.stock,
            brand: p.brand,
            rating: p.rating,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub id: Uuid,
}

/// Catalog-wide price and rating summary.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductInsight {
    pub total_products: i64,
    pub max_rating_products: i64,
    pub max_price: f64,
    pub min_price: f64,
    pub avg_price: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PriceInsightRequest {
    #[validate(range(min = 0.0, message = "maxPrice must not be negative"))]
    pub max_price: f64,
}

/// Counts plus the products priced strictly below the requested threshold.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceInsight {
    pub total_products: i64,
    pub max_rating_products: i64,
    pub products_below_price: Vec<ProductResponse>,
}
