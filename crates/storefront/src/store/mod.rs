//! Per-session cart and wishlist store.
//!
//! A [`CartStore`] owns one shopper's cart and wishlist for the lifetime of a
//! session. It is opened when the session starts (loading the persisted cart
//! for a known user), mutated by the cart/wishlist routes, and mirrors both
//! collections to [`UserStorage`] after every successful change.
//!
//! # Rules
//!
//! - Cart quantities stay within `1..=stock`. Adding a product that is already
//!   in the cart merges the quantities, unless the merged quantity would reach
//!   or exceed the stock ceiling, in which case nothing changes.
//! - A product appears at most once in a wishlist.
//! - Without a signed-in user every mutating operation is refused with a
//!   sign-in redirect and nothing is written.
//! - No operation fails outwards. Storage errors and out-of-range totals are
//!   logged and reported as a generic failure toast, and the store keeps its
//!   previous collections.

pub mod outcome;
pub mod registry;

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use hearth_core::{
    CartItem, CartItemId, ProductSnapshot, UserId, WishListItem, WishListItemId, WishListRequest,
    cart_totals,
};

use crate::storage::{StorageError, StorageKey, UserStorage, load_collection, save_collection};

pub use outcome::{Notification, NotificationLevel, Outcome};
pub use registry::StoreRegistry;

/// Default path shoppers are sent to when they need to sign in.
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

/// Behavior switches for a store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Where unauthenticated shoppers are redirected.
    pub sign_in_path: String,
    /// Also reload the persisted wishlist at session start.
    ///
    /// Off by default: historically only the cart was restored, and the
    /// wishlist started empty for every session.
    pub reload_wishlist: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_owned(),
            reload_wishlist: false,
        }
    }
}

/// Why a change could not be applied. The store is left as it was.
#[derive(Debug, Error)]
enum CommitError {
    #[error("cart total out of range")]
    OutOfRange,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The cart and wishlist of a single session.
pub struct CartStore {
    user_id: Option<UserId>,
    cart: Vec<CartItem>,
    wish_list: Vec<WishListItem>,
    total_amount: Decimal,
    item_count: u32,
    storage: Arc<dyn UserStorage>,
    options: StoreOptions,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("user_id", &self.user_id)
            .field("cart", &self.cart)
            .field("wish_list", &self.wish_list)
            .field("total_amount", &self.total_amount)
            .field("item_count", &self.item_count)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open a store at session start.
    ///
    /// For a signed-in user the persisted cart is loaded (and the wishlist,
    /// when [`StoreOptions::reload_wishlist`] is set). Unreadable or
    /// out-of-range persisted data is logged and the collection starts empty.
    #[instrument(skip_all, fields(user_id = user_id.as_ref().map(UserId::as_str)))]
    pub async fn open(
        user_id: Option<UserId>,
        storage: Arc<dyn UserStorage>,
        options: StoreOptions,
    ) -> Self {
        let mut store = Self {
            user_id,
            cart: Vec::new(),
            wish_list: Vec::new(),
            total_amount: Decimal::ZERO,
            item_count: 0,
            storage,
            options,
        };

        if let Some(user_id) = store.user_id.clone() {
            match load_collection::<CartItem>(store.storage.as_ref(), &StorageKey::cart(&user_id))
                .await
            {
                Ok(Some(cart)) => match cart_totals(&cart) {
                    Some((total_amount, item_count)) => {
                        store.cart = cart;
                        store.total_amount = total_amount;
                        store.item_count = item_count;
                    }
                    None => tracing::error!("Persisted cart total is out of range"),
                },
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "Failed to load persisted cart"),
            }

            if store.options.reload_wishlist {
                match load_collection::<WishListItem>(
                    store.storage.as_ref(),
                    &StorageKey::wish_list(&user_id),
                )
                .await
                {
                    Ok(Some(wish_list)) => store.wish_list = wish_list,
                    Ok(None) => {}
                    Err(e) => tracing::error!(error = %e, "Failed to load persisted wishlist"),
                }
            }
        }

        tracing::debug!(items = store.cart.len(), "Cart store opened");
        store
    }

    /// The signed-in user this store belongs to.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Cart entries in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    /// Wishlist entries in insertion order.
    #[must_use]
    pub fn wish_list(&self) -> &[WishListItem] {
        &self.wish_list
    }

    /// Sum of unit price times quantity over the cart.
    #[must_use]
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Total number of units in the cart.
    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Add a product to the cart, or raise the quantity of its existing entry.
    ///
    /// A merge must stay strictly below the stock ceiling; a new entry may
    /// take the whole stock.
    #[instrument(skip_all, fields(product_id = %snapshot.product.id, quantity = snapshot.quantity))]
    pub async fn add_to_cart(&mut self, snapshot: &ProductSnapshot) -> Outcome {
        let Some(user_id) = self.user_id.clone() else {
            return self.sign_in_required("Please login to add items to cart");
        };

        if snapshot.quantity == 0 {
            return Outcome::rejected("Quantity must be at least 1");
        }

        let stock = snapshot.product.stock_level;
        let mut cart = self.cart.clone();
        let existing = cart
            .iter_mut()
            .find(|item| item.product_id == snapshot.product.id);

        let message = if let Some(item) = existing {
            match item.quantity.checked_add(snapshot.quantity) {
                Some(merged) if merged < stock => {
                    item.quantity = merged;
                    item.product_stock = stock;
                }
                _ => return Outcome::rejected("Product is out of stock"),
            }
            "Item quantity updated in cart"
        } else {
            if snapshot.quantity > stock {
                return Outcome::rejected("Product is out of stock");
            }
            cart.push(CartItem::from_snapshot(
                CartItemId::generate(),
                user_id,
                snapshot,
            ));
            "Item added to cart"
        };

        match self.commit_cart(cart).await {
            Ok(()) => Outcome::success(message),
            Err(e) => {
                tracing::error!(error = %e, "Error adding to cart");
                Outcome::rejected("Failed to add item to cart")
            }
        }
    }

    /// Remove a cart entry. Unknown IDs are ignored.
    #[instrument(skip_all, fields(item_id = %item_id))]
    pub async fn remove_from_cart(&mut self, item_id: &CartItemId) -> Outcome {
        if self.user_id.is_none() {
            return self.sign_in_required("Please login to remove items from cart");
        }

        let cart = self
            .cart
            .iter()
            .filter(|item| &item.id != item_id)
            .cloned()
            .collect();

        match self.commit_cart(cart).await {
            Ok(()) => Outcome::success("Item removed from cart"),
            Err(e) => {
                tracing::error!(error = %e, "Error removing from cart");
                Outcome::rejected("Failed to remove item from cart")
            }
        }
    }

    /// Raise an entry's quantity by one, up to the stock ceiling.
    ///
    /// An unknown ID is logged and produces no toast.
    #[instrument(skip_all, fields(item_id = %item_id))]
    pub async fn handle_cart_increment(&mut self, item_id: &CartItemId) -> Outcome {
        let mut cart = self.cart.clone();
        let Some(item) = cart.iter_mut().find(|item| &item.id == item_id) else {
            tracing::error!("Cart item not found");
            return Outcome::silent();
        };

        if !item.can_increment() {
            return Outcome::rejected("Product is out of stock");
        }
        item.quantity += 1;

        match self.commit_cart(cart).await {
            Ok(()) => Outcome::success("Item quantity increased"),
            Err(e) => {
                tracing::error!(error = %e, "Error increasing cart quantity");
                Outcome::rejected("Failed to update item quantity")
            }
        }
    }

    /// Lower an entry's quantity by one, never below 1.
    ///
    /// An unknown ID is logged and produces no toast.
    #[instrument(skip_all, fields(item_id = %item_id))]
    pub async fn handle_cart_decrement(&mut self, item_id: &CartItemId) -> Outcome {
        let mut cart = self.cart.clone();
        let Some(item) = cart.iter_mut().find(|item| &item.id == item_id) else {
            tracing::error!("Cart item not found");
            return Outcome::silent();
        };

        if !item.can_decrement() {
            return Outcome::rejected("Minimum quantity reached");
        }
        item.quantity -= 1;

        match self.commit_cart(cart).await {
            Ok(()) => Outcome::success("Item quantity decreased"),
            Err(e) => {
                tracing::error!(error = %e, "Error decreasing cart quantity");
                Outcome::rejected("Failed to update item quantity")
            }
        }
    }

    /// Save a product to the wishlist. Adding a saved product again is a no-op.
    #[instrument(skip_all, fields(product_id = %request.id))]
    pub async fn add_to_wish_list(&mut self, request: &WishListRequest) -> Outcome {
        let Some(user_id) = self.user_id.clone() else {
            return self.sign_in_required("Please login to add items to wishlist");
        };

        if self
            .wish_list
            .iter()
            .any(|item| item.product_id == request.id)
        {
            return Outcome::success("Item Already in wishlist");
        }

        let mut wish_list = self.wish_list.clone();
        wish_list.push(WishListItem::from_request(
            WishListItemId::generate(),
            user_id,
            request,
        ));

        match self.commit_wish_list(wish_list).await {
            Ok(()) => Outcome::success("Item added to Wishlist"),
            Err(e) => {
                tracing::error!(error = %e, "Error adding to wishlist");
                Outcome::rejected("Failed to add item to Wishlist")
            }
        }
    }

    /// Remove a wishlist entry. Unknown IDs are ignored.
    #[instrument(skip_all, fields(item_id = %item_id))]
    pub async fn remove_from_wish_list(&mut self, item_id: &WishListItemId) -> Outcome {
        if self.user_id.is_none() {
            return self.sign_in_required("Please login to remove items from Wishlist");
        }

        let wish_list = self
            .wish_list
            .iter()
            .filter(|item| &item.id != item_id)
            .cloned()
            .collect();

        match self.commit_wish_list(wish_list).await {
            Ok(()) => Outcome::success("Item removed from Wishlist"),
            Err(e) => {
                tracing::error!(error = %e, "Error removing from wishlist");
                Outcome::rejected("Failed to remove item from WishList")
            }
        }
    }

    fn sign_in_required(&self, message: &str) -> Outcome {
        tracing::info!("Rejected cart operation without a signed-in user");
        Outcome::sign_in_required(message, &self.options.sign_in_path)
    }

    /// Mirror `cart` to storage, then adopt it with its derived totals.
    async fn commit_cart(&mut self, cart: Vec<CartItem>) -> Result<(), CommitError> {
        let (total_amount, item_count) = cart_totals(&cart).ok_or(CommitError::OutOfRange)?;
        self.persist(&cart, &self.wish_list).await?;

        self.cart = cart;
        self.total_amount = total_amount;
        self.item_count = item_count;
        Ok(())
    }

    /// Mirror `wish_list` to storage, then adopt it.
    async fn commit_wish_list(&mut self, wish_list: Vec<WishListItem>) -> Result<(), CommitError> {
        self.persist(&self.cart, &wish_list).await?;
        self.wish_list = wish_list;
        Ok(())
    }

    /// Write both collections for the signed-in user.
    async fn persist(
        &self,
        cart: &[CartItem],
        wish_list: &[WishListItem],
    ) -> Result<(), StorageError> {
        let Some(user_id) = &self.user_id else {
            return Ok(());
        };

        let storage = self.storage.as_ref();
        save_collection(storage, &StorageKey::cart(user_id), cart).await?;
        save_collection(storage, &StorageKey::wish_list(user_id), wish_list).await?;
        Ok(())
    }
}
