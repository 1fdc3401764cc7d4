//! # Product Commands
//!
//! ```text
//! products list [--search TEXT]     everyone
//! products show ID                  everyone
//! products create --name --price    admin
//! products update ID [--name …]     admin
//! products delete ID                admin
//! ```
//!
//! Input is checked locally before any request goes out.

use clap::{Args, Subcommand};

use super::{require_admin, truncate};
use crate::error::{CliError, CliResult};
use crate::state::AppState;
use orderly_core::validation::{product_input, validate_id, validate_search_query};
use orderly_core::Product;

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List the menu
    List {
        /// Only products whose name or description contains TEXT
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show one product
    Show { id: i64 },

    /// Add a product (admin)
    Create(NewProduct),

    /// Change a product (admin)
    Update {
        id: i64,
        #[command(flatten)]
        changes: ProductChanges,
    },

    /// Remove a product (admin)
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct NewProduct {
    #[arg(long)]
    pub name: String,

    /// Decimal price, e.g. 12.50
    #[arg(long)]
    pub price: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image: Option<String>,
}

/// Fields left out keep their current value. An empty string clears the
/// description or image.
#[derive(Debug, Args)]
pub struct ProductChanges {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image: Option<String>,
}

impl ProductChanges {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }
}

pub async fn run(state: &AppState, command: ProductCommand) -> CliResult<()> {
    let products = state.api().products();

    match command {
        ProductCommand::List { search } => {
            let query = validate_search_query(search.as_deref().unwrap_or(""))?;
            let found = products.search(&query).await?;
            print!("{}", render_products(&found));
        }
        ProductCommand::Show { id } => {
            validate_id("product id", id)?;
            let product = products.get(id).await?;
            print!("{}", render_product(&product));
        }
        ProductCommand::Create(new) => {
            require_admin(state).await?;
            let input = product_input(
                &new.name,
                new.description.as_deref(),
                &new.price,
                new.image.as_deref(),
            )?;
            let created = products.create(&input).await?;
            println!("Created product #{} {}", created.product_id, created.name);
        }
        ProductCommand::Update { id, changes } => {
            require_admin(state).await?;
            validate_id("product id", id)?;
            if changes.is_empty() {
                return Err(CliError::validation("Nothing to update"));
            }

            let current = products.get(id).await?;
            let name = changes.name.unwrap_or(current.name);
            let price = changes
                .price
                .unwrap_or_else(|| current.price.to_decimal_string());
            let description = changes.description.or(current.description);
            let image = changes.image.or(current.product_image_uri);

            let input = product_input(&name, description.as_deref(), &price, image.as_deref())?;
            let updated = products.update(id, &input).await?;
            println!("Updated product #{} {}", updated.product_id, updated.name);
        }
        ProductCommand::Delete { id } => {
            require_admin(state).await?;
            validate_id("product id", id)?;
            products.delete(id).await?;
            println!("Deleted product #{id}");
        }
    }
    Ok(())
}

pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found\n".to_string();
    }

    let mut out = String::new();
    for p in products {
        out.push_str(&format!(
            "#{:<5} {:<28} {:>10}  {}\n",
            p.product_id,
            truncate(&p.name, 28),
            p.price.to_string(),
            truncate(p.description.as_deref().unwrap_or(""), 40),
        ));
    }
    out
}

pub fn render_product(p: &Product) -> String {
    let mut out = format!("#{} {}\n", p.product_id, p.name);
    out.push_str(&format!("Price:       {}\n", p.price));
    if let Some(description) = &p.description {
        out.push_str(&format!("Description: {description}\n"));
    }
    if let Some(image) = &p.product_image_uri {
        out.push_str(&format!("Image:       {image}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::Money;

    fn ramen() -> Product {
        Product {
            product_id: 1,
            name: "Ramen".to_string(),
            description: Some("Pork broth".to_string()),
            price: Money::from_cents(1250),
            product_image_uri: None,
        }
    }

    #[test]
    fn test_render_products() {
        assert_eq!(render_products(&[]), "No products found\n");

        let out = render_products(&[ramen()]);
        assert!(out.starts_with("#1"));
        assert!(out.contains("Ramen"));
        assert!(out.contains("$12.50"));
        assert!(out.contains("Pork broth"));
    }

    #[test]
    fn test_render_product_skips_missing_fields() {
        let out = render_product(&ramen());
        assert!(out.contains("Price:       $12.50"));
        assert!(!out.contains("Image:"));
    }
}
