//! # Cart
//!
//! The client-side shopping cart. The backend has no cart: an order carries
//! exactly one product, so checkout turns each line into its own order.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Command                  Cart Method             Cart State Change     │
//! │  ───────                  ───────────             ─────────────────     │
//! │                                                                         │
//! │  cart add 7 2 ──────────► add_item() ───────────► push or qty += 2     │
//! │                                                                         │
//! │  cart set 7 5 ──────────► update_quantity() ────► items[i].qty = 5     │
//! │                                                                         │
//! │  cart set 7 0 ──────────► update_quantity() ────► items.remove(i)      │
//! │                                                                         │
//! │  cart remove 7 ─────────► remove_item() ────────► items.remove(i)      │
//! │                                                                         │
//! │  cart checkout ─────────► remove_items(ok ids) ─► failed lines stay    │
//! │                                                                         │
//! │  login bob ─────────────► claim("bob") ─────────► ana's lines dropped   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An item in the shopping cart.
///
/// Name and price are frozen when the product is added, so the cart reads
/// the same even if the menu changes before checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.product_id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding same product increases quantity)
/// - Quantity is within 1..=[`MAX_ITEM_QUANTITY`]; setting 0 removes the line
/// - At most [`MAX_CART_ITEMS`] lines
/// - Lines belong to `owner`; a cart with lines and no owner belongs to nobody
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,

    /// Username of whoever built the cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines, keeping the first of any duplicates.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if !cart.contains(item.product_id) {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Adds a product to the cart or increases quantity if already present.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        check_quantity(quantity)?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.product_id)
        {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        check_quantity(quantity)?;

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart(product_id)),
        }
    }

    pub fn remove_item(&mut self, product_id: i64) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id))
        } else {
            Ok(())
        }
    }

    /// Drops every line whose product is in `product_ids`; others stay.
    pub fn remove_items(&mut self, product_ids: &[i64]) {
        self.items.retain(|i| !product_ids.contains(&i.product_id));
    }

    /// Empties the lines. The owner stays.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Hands the cart to `username`, dropping lines anyone else built.
    ///
    /// Returns `true` if lines were dropped.
    pub fn claim(&mut self, username: &str) -> bool {
        let foreign = !self.items.is_empty() && self.owner.as_deref() != Some(username);
        if foreign {
            self.items.clear();
        }
        self.owner = Some(username.to_string());
        foreign
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

fn check_quantity(quantity: i64) -> CoreResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    if quantity < 1 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        }
        .into());
    }
    Ok(())
}

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_price: cart.total_price(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: i64, price_cents: i64) -> Product {
        Product {
            product_id: id,
            name: format!("Dish {}", id),
            description: None,
            price: Money::from_cents(price_cents),
            product_image_uri: None,
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let product = test_product(1, 999);

        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total_price().cents(), 1998);
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let product = test_product(1, 999);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_totals_are_exact() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 10), 3).unwrap();
        cart.add_item(&test_product(2, 20), 1).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 4);
        assert_eq!(totals.total_price.to_decimal_string(), "0.50");
    }

    #[test]
    fn test_quantity_limits() {
        let mut cart = Cart::new();
        let product = test_product(1, 100);

        assert!(cart.add_item(&product, 0).is_err());
        assert!(cart.add_item(&product, -1).is_err());
        assert!(cart.add_item(&product, 100).is_err());

        cart.add_item(&product, 98).unwrap();
        let err = cart.add_item(&product, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::QuantityTooLarge { requested: 100, max: 99 }
        ));
        assert_eq!(cart.total_quantity(), 98);
    }

    #[test]
    fn test_max_lines() {
        let mut cart = Cart::new();
        for id in 0..MAX_CART_ITEMS as i64 {
            cart.add_item(&test_product(id, 100), 1).unwrap();
        }
        let err = cart.add_item(&test_product(999, 100), 1).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));

        cart.add_item(&test_product(0, 100), 1).unwrap();
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 100), 2).unwrap();

        cart.update_quantity(1, 5).unwrap();
        assert_eq!(cart.total_quantity(), 5);

        cart.update_quantity(1, 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.update_quantity(1, 3),
            Err(CoreError::NotInCart(1))
        ));
    }

    #[test]
    fn test_remove_items_keeps_the_rest() {
        let mut cart = Cart::new();
        for id in 1..=3 {
            cart.add_item(&test_product(id, 100), 1).unwrap();
        }

        cart.remove_items(&[1, 3]);
        assert_eq!(cart.item_count(), 1);
        assert!(cart.contains(2));
    }

    #[test]
    fn test_claim_drops_other_users_lines() {
        let mut cart = Cart::new();
        assert!(!cart.claim("ana"));
        cart.add_item(&test_product(1, 100), 3).unwrap();

        assert!(!cart.claim("ana"));
        assert_eq!(cart.total_quantity(), 3);

        assert!(cart.claim("bob"));
        assert!(cart.is_empty());
        assert_eq!(cart.owner.as_deref(), Some("bob"));
    }

    #[test]
    fn test_claim_drops_unowned_lines() {
        let mut cart = Cart::from_items(vec![CartItem::from_product(&test_product(1, 100), 1)]);
        assert!(cart.claim("ana"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_items_dedupes() {
        let item = CartItem::from_product(&test_product(1, 100), 1);
        let cart = Cart::from_items(vec![item.clone(), item]);
        assert_eq!(cart.item_count(), 1);
    }
}
