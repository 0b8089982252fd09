//! First-start seed data
//!
//! - The `admin` account always exists, is active and is an administrator
//! - Sample menu and floor plan, only when those tables are empty

use super::repository::{RepoResult, dining_table, product, user};
use shared::models::{DiningTableCreate, ProductCreate, Role};
use sqlx::SqlitePool;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_DISPLAY_NAME: &str = "System Administrator";

/// (name, price, category, description)
const SAMPLE_PRODUCTS: &[(&str, f64, &str, &str)] = &[
    ("Classic Burger", 2500.0, "Burgers", "Beef, lettuce, tomato, onion"),
    ("Margherita Pizza", 3000.0, "Pizzas", "Tomato sauce, mozzarella, basil"),
    ("French Fries", 800.0, "Sides", "Potato sticks"),
    ("Cola 500ml", 600.0, "Drinks", "Soft drink"),
    ("Breaded Steak with Mash", 2800.0, "Main Courses", "Breaded beef with mashed potatoes"),
    ("Caesar Salad", 1800.0, "Salads", "Lettuce, chicken, croutons, caesar dressing"),
    ("Espresso", 400.0, "Coffee", "Traditional espresso"),
    ("Mineral Water", 300.0, "Drinks", "Still water 500ml"),
];

/// (name, capacity, zone)
const SAMPLE_TABLES: &[(&str, i32, &str)] = &[
    ("Table 1", 4, "Main Room"),
    ("Table 2", 4, "Main Room"),
    ("Table 3", 6, "Main Room"),
    ("Table 4", 2, "Window"),
    ("Table 5", 8, "VIP"),
    ("Bar 1", 1, "Bar"),
    ("Bar 2", 1, "Bar"),
    ("Terrace 1", 4, "Terrace"),
    ("Terrace 2", 6, "Terrace"),
    ("Private 1", 10, "Private Room"),
];

/// What a seed run inserted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub products: usize,
    pub tables: usize,
}

/// Make sure the built-in administrator exists with its fixed role
pub async fn ensure_admin(pool: &SqlitePool) -> RepoResult<bool> {
    match user::find_by_username(pool, ADMIN_USERNAME).await? {
        Some(existing) => {
            sqlx::query(
                "UPDATE users SET role = 'administrator', display_name = ?, is_active = 1 WHERE id = ?",
            )
            .bind(ADMIN_DISPLAY_NAME)
            .bind(existing.id)
            .execute(pool)
            .await?;
            Ok(false)
        }
        None => {
            user::create(
                pool,
                ADMIN_USERNAME,
                ADMIN_PASSWORD,
                ADMIN_DISPLAY_NAME,
                Role::Administrator,
            )
            .await?;
            tracing::info!(username = ADMIN_USERNAME, "Created default administrator");
            Ok(true)
        }
    }
}

/// Seed the admin account plus sample products and tables
pub async fn run(pool: &SqlitePool) -> RepoResult<SeedReport> {
    let mut report = SeedReport {
        admin_created: ensure_admin(pool).await?,
        ..Default::default()
    };

    if product::count(pool).await? == 0 {
        for (name, price, category, description) in SAMPLE_PRODUCTS {
            product::create(
                pool,
                ProductCreate {
                    name: (*name).to_string(),
                    price: *price,
                    category: Some((*category).to_string()),
                    description: Some((*description).to_string()),
                    is_available: Some(true),
                },
            )
            .await?;
        }
        report.products = SAMPLE_PRODUCTS.len();
    }

    if dining_table::find_all(pool).await?.is_empty() {
        for (name, capacity, zone) in SAMPLE_TABLES {
            dining_table::create(
                pool,
                DiningTableCreate {
                    name: (*name).to_string(),
                    capacity: *capacity,
                    zone: (*zone).to_string(),
                    status: None,
                },
            )
            .await?;
        }
        report.tables = SAMPLE_TABLES.len();
    }

    if report != SeedReport::default() {
        tracing::info!(
            admin_created = report.admin_created,
            products = report.products,
            tables = report.tables,
            "Seed data inserted"
        );
    }
    Ok(report)
}
