//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{DEFAULT_CATEGORY, Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

/// All products, grouped by category
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, price, category, is_available, description FROM products ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Products offered on the menu
pub async fn find_available(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, price, category, is_available, description FROM products WHERE is_available = 1 ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, price, category, is_available, description FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Distinct category labels in display order
pub async fn find_categories(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let categories =
        sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM products ORDER BY category")
            .fetch_all(pool)
            .await?;
    Ok(categories)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let category = data
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let is_available = data.is_available.unwrap_or(true);
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, price, category, is_available, description) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(category)
    .bind(is_available)
    .bind(data.description)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), price = COALESCE(?2, price), category = COALESCE(?3, category), description = COALESCE(?4, description), is_available = COALESCE(?5, is_available) WHERE id = ?6",
    )
    .bind(data.name)
    .bind(data.price)
    .bind(data.category)
    .bind(data.description)
    .bind(data.is_available)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
