//! # Product Repository
//!
//! Database operations for products. Every statement is scoped to the
//! owning user; a row owned by someone else behaves exactly like a row
//! that does not exist.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use venta_core::{NewProduct, Product, ProductUpdate};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists a user's products, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, user_id, name, price_cents, stock, category,
                   low_stock_alert, created_at, updated_at
            FROM products
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by ID, scoped to the owning user.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found and owned by the user
    /// * `Ok(None)` - Absent, or owned by a different user
    pub async fn get_owned(&self, id: &str, user_id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, user_id, name, price_cents, stock, category,
                   low_stock_alert, created_at, updated_at
            FROM products
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product for the given user and returns it.
    pub async fn insert(&self, user_id: &str, payload: NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            user_id: user_id.to_string(),
            name: payload.name,
            price_cents: payload.price_cents,
            stock: payload.stock,
            category: payload.category,
            low_stock_alert: payload.low_stock_alert,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, user_id, name, price_cents, stock, category,
                low_stock_alert, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.user_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.low_stock_alert)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a partial update to an owned product and returns the result.
    ///
    /// The ownership-scoped read doubles as the authorization gate: absent
    /// or foreign rows yield NotFound before anything is written. Only the
    /// provided fields change; `updated_at` is always bumped.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        changes: ProductUpdate,
    ) -> DbResult<Product> {
        let mut product = self
            .get_owned(id, user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(price_cents) = changes.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(category) = changes.category {
            product.category = category;
        }
        if let Some(low_stock_alert) = changes.low_stock_alert {
            product.low_stock_alert = low_stock_alert;
        }
        product.updated_at = Utc::now();

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?3,
                price_cents = ?4,
                stock = ?5,
                category = ?6,
                low_stock_alert = ?7,
                updated_at = ?8
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.low_stock_alert)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(product)
    }

    /// Deletes an owned product.
    ///
    /// A single ownership-scoped DELETE: zero rows affected means absent
    /// or foreign, and surfaces as NotFound. Past sale items keep their
    /// price snapshot; their product reference goes NULL.
    pub async fn delete(&self, id: &str, user_id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price_cents,
            stock,
            category: String::new(),
            low_stock_alert: 5,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = db().await;
        let repo = db.products();

        repo.insert("user-a", new_product("Coffee", 1200, 10))
            .await
            .unwrap();
        repo.insert("user-a", new_product("Tea", 900, 3))
            .await
            .unwrap();

        let products = repo.list_for_user("user-a").await.unwrap();
        assert_eq!(products.len(), 2);
        assert!(repo.list_for_user("user-b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ownership_isolation() {
        let db = db().await;
        let repo = db.products();

        let p = repo
            .insert("user-a", new_product("Coffee", 1200, 10))
            .await
            .unwrap();

        // Another user sees nothing and can mutate nothing.
        assert!(repo.get_owned(&p.id, "user-b").await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&p.id, "user-b").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update(&p.id, "user-b", ProductUpdate::default()).await,
            Err(DbError::NotFound { .. })
        ));

        // The owner still has it.
        assert!(repo.get_owned(&p.id, "user-a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = db().await;
        let repo = db.products();

        let p = repo
            .insert("user-a", new_product("Coffee", 1200, 10))
            .await
            .unwrap();

        let updated = repo
            .update(
                &p.id,
                "user-a",
                ProductUpdate {
                    price_cents: Some(1500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Only the provided field changed.
        assert_eq!(updated.price_cents, 1500);
        assert_eq!(updated.name, "Coffee");
        assert_eq!(updated.stock, 10);
        assert!(updated.updated_at >= p.updated_at);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let repo = db.products();

        let p = repo
            .insert("user-a", new_product("Coffee", 1200, 10))
            .await
            .unwrap();

        repo.delete(&p.id, "user-a").await.unwrap();
        assert!(repo.get_owned(&p.id, "user-a").await.unwrap().is_none());

        // Second delete is NotFound.
        assert!(matches!(
            repo.delete(&p.id, "user-a").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
