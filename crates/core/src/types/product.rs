//! Product data as supplied by the content backend.
//!
//! The storefront never owns catalog data. Product records are fetched by
//! presentational code and handed to the cart/wishlist store as snapshots
//! when a shopper adds something.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// An image reference on a product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
}

/// A product record as returned by the content backend's product query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Content backend document ID.
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Primary image reference used for cart and wishlist thumbnails.
    #[serde(default)]
    pub image_path: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub is_featured_product: bool,
    /// Stock ceiling: the most units a single cart entry may hold.
    pub stock_level: u32,
    #[serde(default)]
    pub category: String,
}

/// A product plus the shopper's choices at add-to-cart time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    #[serde(flatten)]
    pub product: ProductRecord,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    /// Requested quantity.
    pub quantity: u32,
}

impl ProductSnapshot {
    /// Snapshot a product with the chosen variant and quantity.
    #[must_use]
    pub fn new(
        product: ProductRecord,
        color: impl Into<String>,
        size: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            product,
            color: color.into(),
            size: size.into(),
            quantity,
        }
    }
}

/// The subset of product data needed to save a wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListRequest {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image_path: String,
    pub price: Decimal,
}

impl From<&ProductRecord> for WishListRequest {
    fn from(product: &ProductRecord) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image_path: product.image_path.clone(),
            price: product.price,
        }
    }
}
