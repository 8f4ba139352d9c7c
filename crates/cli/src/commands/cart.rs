//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! sg-cli cart add -p 7 -t "Box Logo Tee" --price 100.00 -s M -c red
//! sg-cli cart list
//! sg-cli cart set-qty 7-M-red 5
//! sg-cli cart remove 7-M-red
//! sg-cli cart clear
//! sg-cli cart total
//! ```

use rust_decimal::Decimal;

use seagrape_core::{CartLineItem, LineItemId, NewCartItem, ProductId, format_amount};

use super::CliError;

/// List cart lines with the derived count and total.
pub async fn list() -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    let cart = ctx.cart();
    print_cart(&cart.items(), cart.count(), cart.total());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(items: &[CartLineItem], count: u32, total: Decimal) {
    if items.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in items {
        println!(
            "{:<16} {:<32} x{:<4} {:>10}",
            line.id,
            line.title,
            line.quantity,
            format_amount(line.line_total())
        );
    }
    println!("{count} item(s), total {}", format_amount(total));
}

/// Add one unit of a product variant to the cart.
pub async fn add(
    product_id: i32,
    title: String,
    price: Decimal,
    image: Option<String>,
    size: Option<String>,
    color: Option<String>,
) -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    let item = NewCartItem {
        product_id: ProductId::new(product_id),
        title,
        price,
        image,
        size,
        color,
    };
    let id = item.line_item_id();
    ctx.cart().add_to_cart(item).await;
    tracing::info!("Added line {id}; cart now holds {} item(s)", ctx.cart().count());
    Ok(())
}

/// Remove a line by id.
pub async fn remove(id: String) -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    ctx.cart().remove_from_cart(&LineItemId::from(id)).await;
    tracing::info!("Cart now holds {} item(s)", ctx.cart().count());
    Ok(())
}

/// Set a line's quantity; 0 removes the line.
pub async fn set_quantity(id: String, quantity: u32) -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    ctx.cart()
        .update_quantity(&LineItemId::from(id), quantity)
        .await;
    tracing::info!("Cart now holds {} item(s)", ctx.cart().count());
    Ok(())
}

/// Empty the cart.
pub async fn clear() -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    ctx.cart().clear().await;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Print the cart total.
#[allow(clippy::print_stdout)]
pub async fn total() -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    println!("{}", format_amount(ctx.cart().total()));
    Ok(())
}
