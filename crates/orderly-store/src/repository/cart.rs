//! # Cart Repository
//!
//! Persists [`Cart`] lines and the cart's owner. `save` rewrites both inside
//! one transaction, so a crash mid-save leaves the previous cart intact.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use orderly_core::{Cart, CartItem, Money};

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: i64,
    name: String,
    unit_price_cents: i64,
    quantity: i64,
    added_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        CartItem {
            product_id: row.product_id,
            name: row.name,
            unit_price: Money::from_cents(row.unit_price_cents),
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads the cart in the order lines were added.
    pub async fn load(&self) -> StoreResult<Cart> {
        let rows: Vec<CartItemRow> = sqlx::query_as(
            r#"
            SELECT product_id, name, unit_price_cents, quantity, added_at
            FROM cart_items
            ORDER BY added_at, product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let owner: Option<String> =
            sqlx::query_scalar("SELECT username FROM cart_owner WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        debug!(lines = rows.len(), has_owner = owner.is_some(), "Loaded cart");
        let mut cart = Cart::from_items(rows.into_iter().map(CartItem::from).collect());
        cart.owner = owner;
        Ok(cart)
    }

    /// Replaces the stored cart with `cart`.
    pub async fn save(&self, cart: &Cart) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items")
            .execute(&mut *tx)
            .await?;

        for item in &cart.items {
            sqlx::query(
                r#"
                INSERT INTO cart_items (product_id, name, unit_price_cents, quantity, added_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.unit_price.cents())
            .bind(item.quantity)
            .bind(item.added_at)
            .execute(&mut *tx)
            .await?;
        }

        match &cart.owner {
            Some(owner) => {
                sqlx::query(
                    r#"
                    INSERT INTO cart_owner (id, username) VALUES (1, ?1)
                    ON CONFLICT(id) DO UPDATE SET username = excluded.username
                    "#,
                )
                .bind(owner)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM cart_owner")
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        debug!(lines = cart.item_count(), "Saved cart");
        Ok(())
    }

    /// Removes the lines and the owner.
    pub async fn clear(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM cart_items")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM cart_owner")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!("Cleared cart");
        Ok(())
    }
}
