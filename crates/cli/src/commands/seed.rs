//! `mesa-cli seed` - insert sample catalog data for local development.

use super::{CliError, connect};

const CATEGORIES: &[&str] = &["Starters", "Mains", "Drinks"];

const ITEMS: &[(&str, &str, &str, &str)] = &[
    ("Garlic Bread", "Toasted sourdough, confit garlic butter", "4.50", "Starters"),
    ("Soup of the Day", "Ask your server", "5.00", "Starters"),
    ("Margherita Pizza", "Tomato, mozzarella, basil", "11.00", "Mains"),
    ("Pad Thai", "Rice noodles, tamarind, peanuts", "12.50", "Mains"),
    ("Lemonade", "House-made, lightly sparkling", "3.25", "Drinks"),
];

/// Seed categories and items, skipping anything already present.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    for name in CATEGORIES {
        sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&pool)
            .await?;
    }

    for (name, description, price, category) in ITEMS {
        sqlx::query(
            r"
            INSERT INTO items (name, description, price, category_id)
            SELECT $1, $2, $3::numeric, c.id
            FROM categories c
            WHERE c.name = $4
              AND NOT EXISTS (SELECT 1 FROM items i WHERE i.name = $1)
            ",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .execute(&pool)
        .await?;
    }

    tracing::info!("seed complete");
    Ok(())
}
