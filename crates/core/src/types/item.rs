//! Cart and wishlist entries.
//!
//! Both entry kinds reference a product by ID and copy the display fields
//! they need at add time. Field names serialize in camelCase, which is the
//! layout written to durable per-user storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartItemId, ProductId, UserId, WishListItemId};
use super::product::{ProductSnapshot, WishListRequest};

/// One product and requested quantity in a shopper's cart.
///
/// `quantity` stays within `1..=product_stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product_title: String,
    pub product_image: String,
    pub product_price: Decimal,
    /// Stock ceiling captured from the most recent product snapshot.
    pub product_stock: u32,
    pub quantity: u32,
    pub product_color: String,
    pub product_size: String,
}

impl CartItem {
    /// Build a new cart entry from a product snapshot.
    #[must_use]
    pub fn from_snapshot(id: CartItemId, user_id: UserId, snapshot: &ProductSnapshot) -> Self {
        Self {
            id,
            user_id,
            product_id: snapshot.product.id.clone(),
            product_title: snapshot.product.name.clone(),
            product_image: snapshot.product.image_path.clone(),
            product_price: snapshot.product.price,
            product_stock: snapshot.product.stock_level,
            quantity: snapshot.quantity,
            product_color: snapshot.color.clone(),
            product_size: snapshot.size.clone(),
        }
    }

    /// Unit price times quantity, or `None` if the product is out of range.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product_price.checked_mul(Decimal::from(self.quantity))
    }

    /// Whether one more unit fits under the stock ceiling.
    #[must_use]
    pub const fn can_increment(&self) -> bool {
        self.quantity < self.product_stock
    }

    /// Whether the quantity is above the floor of 1.
    #[must_use]
    pub const fn can_decrement(&self) -> bool {
        self.quantity > 1
    }
}

/// Sum of line totals and total units over a cart.
///
/// Returns `None` if any line total, the amount, or the unit count overflows.
#[must_use]
pub fn cart_totals(items: &[CartItem]) -> Option<(Decimal, u32)> {
    items
        .iter()
        .try_fold((Decimal::ZERO, 0_u32), |(amount, units), item| {
            Some((
                amount.checked_add(item.line_total()?)?,
                units.checked_add(item.quantity)?,
            ))
        })
}

/// A saved-for-later product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListItem {
    pub id: WishListItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product_title: String,
    pub product_image: String,
    pub product_price: Decimal,
}

impl WishListItem {
    /// Build a new wishlist entry.
    #[must_use]
    pub fn from_request(id: WishListItemId, user_id: UserId, request: &WishListRequest) -> Self {
        Self {
            id,
            user_id,
            product_id: request.id.clone(),
            product_title: request.name.clone(),
            product_image: request.image_path.clone(),
            product_price: request.price,
        }
    }
}
