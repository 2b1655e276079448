//! Stored cart and wishlist maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Print a user's persisted cart and wishlist
//! hearth-cli storage show user_123
//!
//! # Delete a user's persisted cart and wishlist
//! hearth-cli storage clear user_123
//! ```
//!
//! Clearing only touches durable storage. A session that is still open for
//! the user keeps its in-memory copy and writes it back on its next change.

use hearth_core::{CartItem, UserId, WishListItem, cart_totals};
use hearth_storefront::db::{self, PgUserStorage};
use hearth_storefront::storage::{StorageKey, UserStorage, load_collection};

use super::{CommandError, storefront_database_url};

async fn connect() -> Result<PgUserStorage, CommandError> {
    let database_url = storefront_database_url()?;
    let pool = db::create_pool(&database_url).await?;
    Ok(PgUserStorage::new(pool))
}

/// Print a user's persisted collections.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a value does not decode.
pub async fn show(user: &str) -> Result<(), CommandError> {
    let storage = connect().await?;
    let user_id = UserId::new(user);

    let cart: Vec<CartItem> = load_collection(&storage, &StorageKey::cart(&user_id))
        .await?
        .unwrap_or_default();
    let wish_list: Vec<WishListItem> =
        load_collection(&storage, &StorageKey::wish_list(&user_id))
            .await?
            .unwrap_or_default();

    let total = cart_totals(&cart)
        .map_or_else(|| "out of range".to_string(), |(amount, _)| format!("{amount:.2}"));

    #[allow(clippy::print_stdout)]
    {
        println!("Cart for {user_id} ({} entries, total {total}):", cart.len());
        for item in &cart {
            println!(
                "  {}  {} x{} [{} / {}] @ {}",
                item.id,
                item.product_title,
                item.quantity,
                item.product_color,
                item.product_size,
                item.product_price
            );
        }

        println!("Wishlist for {user_id} ({} entries):", wish_list.len());
        for item in &wish_list {
            println!("  {}  {} @ {}", item.id, item.product_title, item.product_price);
        }
    }

    Ok(())
}

/// Delete a user's persisted collections.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn clear(user: &str) -> Result<(), CommandError> {
    let storage = connect().await?;
    let user_id = UserId::new(user);

    storage.remove(&StorageKey::cart(&user_id)).await?;
    storage.remove(&StorageKey::wish_list(&user_id)).await?;

    tracing::info!("Cleared stored cart and wishlist for {user_id}");
    Ok(())
}
