//! Wishlist commands.
//!
//! # Usage
//!
//! ```bash
//! sg-cli wishlist add -p 12 -t "Wool Socks" --price 12.00
//! sg-cli wishlist list
//! sg-cli wishlist remove 12
//! ```

use rust_decimal::Decimal;

use seagrape_core::{ProductId, SavedProduct, format_amount};

use super::CliError;

/// List saved products.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    let items = ctx.wishlist().items();
    if items.is_empty() {
        println!("Wishlist is empty");
        return Ok(());
    }
    for saved in &items {
        println!(
            "{:<8} {:<32} {:>10}  saved {}",
            saved.id,
            saved.title,
            format_amount(saved.price),
            saved.added_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

/// Save a product. Already-saved ids are a no-op.
pub async fn add(
    product_id: i32,
    title: String,
    price: Decimal,
    image: Option<String>,
) -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    let product = SavedProduct::new(ProductId::new(product_id), title, price, image);
    ctx.wishlist().add(product).await;
    tracing::info!(
        "Wishlist now holds {} product(s)",
        ctx.wishlist().items().len()
    );
    Ok(())
}

/// Remove a saved product by catalog id.
pub async fn remove(product_id: i32) -> Result<(), CliError> {
    let ctx = super::open_context().await?;
    ctx.wishlist().remove(ProductId::new(product_id)).await;
    tracing::info!(
        "Wishlist now holds {} product(s)",
        ctx.wishlist().items().len()
    );
    Ok(())
}
