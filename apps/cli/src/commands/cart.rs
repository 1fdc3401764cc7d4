//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  cart add   ┌──────────┐  cart checkout  ┌────────────┐  │
//! │  │  Empty   │────────────►│ In Cart  │────────────────►│  Orders    │  │
//! │  │  Cart    │             │          │  one per line   │  placed    │  │
//! │  └──────────┘             └──────────┘                 └─────┬──────┘  │
//! │       ▲                     │  cart set / remove             │         │
//! │       │                     │                                │         │
//! │       └──── cart clear ─────┘◄── failed lines stay ──────────┘         │
//! │       └──── logout                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The price shown in the cart is the one read when the line was added.

use clap::Subcommand;
use tracing::warn;

use super::truncate;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::AppState;
use orderly_core::validation::{validate_id, validate_quantity};
use orderly_core::{Cart, CreateOrderRequest};

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart and totals
    Show,

    /// Add a product (merges with an existing line)
    Add {
        product_id: i64,
        #[arg(default_value_t = 1)]
        quantity: i64,
    },

    /// Set a line's quantity (0 removes it)
    Set { product_id: i64, quantity: i64 },

    /// Remove a line
    Remove { product_id: i64 },

    /// Empty the cart
    Clear,

    /// Place one order per line
    Checkout,
}

pub async fn run(state: &AppState, command: CartCommand) -> CliResult<()> {
    match command {
        CartCommand::Show => {
            print!("{}", state.cart.with_cart(render_cart).await);
        }
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            validate_id("product id", product_id)?;
            validate_quantity(quantity)?;
            let product = state.api().products().get(product_id).await?;
            let owner = state
                .auth
                .tokens()
                .username()
                .await
                .ok_or_else(CliError::not_logged_in)?;

            state
                .cart
                .update(|cart| {
                    cart.claim(&owner);
                    cart.add_item(&product, quantity)
                })
                .await?;
            println!("Added {} × {}", quantity, product.name);
        }
        CartCommand::Set {
            product_id,
            quantity,
        } => {
            state
                .cart
                .update(|cart| cart.update_quantity(product_id, quantity))
                .await?;
            if quantity == 0 {
                println!("Removed product #{product_id}");
            } else {
                println!("Set product #{product_id} to {quantity}");
            }
        }
        CartCommand::Remove { product_id } => {
            state
                .cart
                .update(|cart| cart.remove_item(product_id))
                .await?;
            println!("Removed product #{product_id}");
        }
        CartCommand::Clear => {
            state
                .cart
                .update(|cart| {
                    cart.clear();
                    Ok(())
                })
                .await?;
            println!("Cart cleared");
        }
        CartCommand::Checkout => checkout(state).await?,
    }
    Ok(())
}

/// Orders every line. Lines that went through leave the cart; the rest stay.
async fn checkout(state: &AppState) -> CliResult<()> {
    let lines = state.cart.with_cart(|cart| cart.items.clone()).await;
    if lines.is_empty() {
        return Err(CliError::validation("Cart is empty"));
    }

    let orders = state.api().orders();
    let mut ordered = Vec::new();
    let mut failed = 0usize;

    for line in &lines {
        let request = CreateOrderRequest {
            product_id: line.product_id,
            quantity: line.quantity,
        };
        match orders.create(&request).await {
            Ok(order) => {
                println!(
                    "Order #{} placed: {} × {} ({})",
                    order.order_id, order.quantity, line.name, order.total_amount
                );
                ordered.push(line.product_id);
            }
            Err(e) => {
                warn!(product_id = line.product_id, error = %e, "Order failed");
                println!("Could not order {}: {}", line.name, e);
                failed += 1;
                if e.is_auth_error() {
                    break;
                }
            }
        }
    }

    state
        .cart
        .update(|cart| {
            cart.remove_items(&ordered);
            Ok(())
        })
        .await?;

    let not_ordered = lines.len() - ordered.len();
    if failed > 0 {
        return Err(CliError::new(
            ErrorCode::PartialCheckout,
            format!(
                "{} of {} lines were not ordered and remain in the cart",
                not_ordered,
                lines.len()
            ),
        ));
    }
    Ok(())
}

pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in &cart.items {
        out.push_str(&format!(
            "#{:<5} {:<28} {:>3} × {:>9} = {:>10}\n",
            item.product_id,
            truncate(&item.name, 28),
            item.quantity,
            item.unit_price.to_string(),
            item.line_total().to_string(),
        ));
    }

    let totals = cart.totals();
    out.push_str(&format!(
        "{} lines, {} items, total {}\n",
        totals.item_count, totals.total_quantity, totals.total_price
    ));
    out
}
