//! # Order Commands

use clap::Subcommand;

use super::{format_timestamp, require_admin};
use crate::error::{CliError, CliResult};
use crate::state::AppState;
use orderly_core::validation::validate_id;
use orderly_core::{Order, OrderStatus};

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Your orders
    Mine,

    /// One order
    Show { id: i64 },

    /// Every order (admin)
    All,

    /// Move an order to a new status (admin)
    SetStatus {
        id: i64,
        /// pending, processing, completed or cancelled
        status: OrderStatus,
    },
}

pub async fn run(state: &AppState, command: OrderCommand) -> CliResult<()> {
    let orders = state.api().orders();

    match command {
        OrderCommand::Mine => {
            let username = state
                .auth
                .tokens()
                .username()
                .await
                .ok_or_else(CliError::not_logged_in)?;
            let mine = orders.of_user(&username).await?;
            print!("{}", render_orders(&mine));
        }
        OrderCommand::Show { id } => {
            validate_id("order id", id)?;
            let order = orders.get(id).await?;
            print!("{}", render_orders(std::slice::from_ref(&order)));
        }
        OrderCommand::All => {
            require_admin(state).await?;
            let all = orders.all().await?;
            print!("{}", render_orders(&all));
        }
        OrderCommand::SetStatus { id, status } => {
            require_admin(state).await?;
            validate_id("order id", id)?;
            let order = orders.update_status(id, status).await?;
            println!("Order #{} is now {}", order.order_id, order.status);
        }
    }
    Ok(())
}

pub fn render_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders yet\n".to_string();
    }

    let mut out = String::new();
    for o in orders {
        out.push_str(&format!(
            "#{:<5} product #{:<5} × {:<3} {:>10}  {:<10}  {}\n",
            o.order_id,
            o.product_id,
            o.quantity,
            o.total_amount.to_string(),
            o.status.as_str(),
            format_timestamp(o.created_at),
        ));
    }
    out
}
