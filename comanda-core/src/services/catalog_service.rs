//! Catalog Service - product management
//!
//! Products are referenced by name-copy from order items, so edits and
//! deletions never touch historical orders.

use crate::auth::{CurrentUser, permissions};
use crate::db::repository::product as product_repo;
use crate::orders::money::round_price;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, normalize_optional, validate_optional_text, validate_price,
    validate_required_text,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DEFAULT_CATEGORY, Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All products ordered by category, then name
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        Ok(product_repo::find_all(&self.pool).await?)
    }

    /// Menu: available products only
    pub async fn list_available(&self) -> AppResult<Vec<Product>> {
        Ok(product_repo::find_available(&self.pool).await?)
    }

    pub async fn categories(&self) -> AppResult<Vec<String>> {
        Ok(product_repo::find_categories(&self.pool).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        product_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn create(&self, actor: &CurrentUser, mut data: ProductCreate) -> AppResult<Product> {
        actor.require_permission(permissions::MENU_MANAGE)?;

        data.name = data.name.trim().to_string();
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_price(data.price)?;
        data.price = round_price(data.price);
        data.category = Some(normalize_category(data.category));
        data.description = normalize_optional(data.description);
        validate_optional_text(&data.category, "category", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;

        let product = product_repo::create(&self.pool, data).await?;
        crate::audit_log!(actor.username, "product.create", format!("product:{}", product.id), product.name);
        Ok(product)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i64,
        mut data: ProductUpdate,
    ) -> AppResult<Product> {
        actor.require_permission(permissions::MENU_MANAGE)?;

        if let Some(name) = &mut data.name {
            *name = name.trim().to_string();
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(price) = &mut data.price {
            validate_price(*price)?;
            *price = round_price(*price);
        }
        if data.category.is_some() {
            data.category = Some(normalize_category(data.category));
        }
        validate_optional_text(&data.category, "category", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;

        let product = product_repo::update(&self.pool, id, data)
            .await
            .map_err(|e| match e {
                crate::db::repository::RepoError::NotFound(_) => product_not_found(id),
                other => other.into(),
            })?;
        crate::audit_log!(actor.username, "product.update", format!("product:{id}"), product.name);
        Ok(product)
    }

    pub async fn delete(&self, actor: &CurrentUser, id: i64) -> AppResult<()> {
        actor.require_permission(permissions::MENU_MANAGE)?;

        if !product_repo::delete(&self.pool, id).await? {
            return Err(product_not_found(id));
        }
        crate::audit_log!(actor.username, "product.delete", format!("product:{id}"));
        Ok(())
    }
}

fn normalize_category(category: Option<String>) -> String {
    normalize_optional(category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("product_id", id)
}
