//! # Sale Repository
//!
//! Transactional sale creation plus sale listings.
//!
//! ## Creation Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ create_sale(user_id, payload)                                    │
//! │                                                                  │
//! │  validate payload ──► BEGIN                                      │
//! │                        │                                         │
//! │     phase 1 ──► read every product (owner-scoped)                │
//! │                 snapshot price, accumulate total                 │
//! │                        │                                         │
//! │     phase 2 ──► INSERT sale ──► INSERT items                     │
//! │                 UPDATE stock = stock - qty WHERE stock >= qty    │
//! │                        │                                         │
//! │                      COMMIT                                      │
//! │                                                                  │
//! │  any error before COMMIT drops the transaction ──► ROLLBACK      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decrement is conditional (`stock >= qty`), so a concurrent writer
//! can never drive stock negative; zero rows affected means the stock
//! moved underneath us and the whole sale rolls back.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use venta_core::{
    validate_new_sale, CoreError, Customer, Money, NewSale, Product, Sale, SaleDetail, SaleItem,
    SaleItemDetail,
};

/// Error from sale creation. Domain failures (missing product, not enough
/// stock, bad payload) are separated from infrastructure failures so the
/// API layer can map them to distinct status codes.
#[derive(Debug, thiserror::Error)]
pub enum CreateSaleError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for CreateSaleError {
    fn from(err: sqlx::Error) -> Self {
        CreateSaleError::Db(DbError::from(err))
    }
}

/// One priced line, resolved during phase 1.
struct PricedItem {
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price: Money,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale atomically: validates the payload, snapshots prices,
    /// computes the total server-side, writes the sale and its items, and
    /// decrements stock. Any failure leaves nothing persisted and no stock
    /// changed.
    pub async fn create_sale(
        &self,
        user_id: &str,
        payload: NewSale,
    ) -> Result<Sale, CreateSaleError> {
        validate_new_sale(&payload).map_err(CoreError::from)?;

        // Empty string from a client means "no customer".
        let customer_id = payload
            .customer_id
            .filter(|id| !id.trim().is_empty());

        let mut tx = self.pool.begin().await?;

        if let Some(ref cid) = customer_id {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM customers WHERE id = ?1 AND user_id = ?2",
            )
            .bind(cid)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

            if exists == 0 {
                return Err(CoreError::CustomerNotFound(cid.clone()).into());
            }
        }

        // Phase 1: resolve every line against the catalog before writing
        // anything. Price overrides win; otherwise the current catalog
        // price is snapshotted.
        let mut total = Money::zero();
        let mut priced = Vec::with_capacity(payload.items.len());
        let mut requested_per_product: HashMap<String, i64> = HashMap::new();

        for item in &payload.items {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, user_id, name, price_cents, stock, category,
                       low_stock_alert, created_at, updated_at
                FROM products
                WHERE id = ?1 AND user_id = ?2
                "#,
            )
            .bind(&item.product_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;

            // Duplicate lines for the same product are checked against
            // their combined quantity, not each line in isolation.
            let requested = requested_per_product
                .entry(product.id.clone())
                .and_modify(|q| *q += item.quantity)
                .or_insert(item.quantity);

            if !product.can_sell(*requested) {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.stock,
                    requested: *requested,
                }
                .into());
            }

            let unit_price = match item.unit_price_cents {
                Some(cents) => Money::from_cents(cents),
                None => product.price(),
            };
            total += unit_price.multiply_quantity(item.quantity);

            priced.push(PricedItem {
                product_id: product.id,
                product_name: product.name,
                quantity: item.quantity,
                unit_price,
            });
        }

        // Phase 2: write the sale header, its items, and the stock
        // decrements, all on the same transaction.
        let now = Utc::now();
        let sale = Sale {
            id: generate_id(),
            user_id: user_id.to_string(),
            customer_id,
            total_cents: total.cents(),
            sale_date: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (id, user_id, customer_id, total_cents, sale_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.user_id)
        .bind(&sale.customer_id)
        .bind(sale.total_cents)
        .bind(sale.sale_date)
        .execute(&mut *tx)
        .await?;

        for line in &priced {
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, quantity, unit_price_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(generate_id())
            .bind(&sale.id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price.cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;

            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?3, updated_at = ?4
                WHERE id = ?1 AND user_id = ?2 AND stock >= ?3
                "#,
            )
            .bind(&line.product_id)
            .bind(user_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Stock moved since phase 1. Re-read it so the error names
                // what is actually available; dropping tx rolls back.
                let available: i64 = sqlx::query_scalar(
                    "SELECT stock FROM products WHERE id = ?1 AND user_id = ?2",
                )
                .bind(&line.product_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .unwrap_or(0);

                debug!(product_id = %line.product_id, "Stock changed mid-sale, rolling back");
                return Err(CoreError::InsufficientStock {
                    name: line.product_name.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }
        }

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            items = priced.len(),
            total_cents = sale.total_cents,
            "Recorded sale"
        );

        Ok(sale)
    }

    /// Lists a user's sales (bare rows, no items), newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, user_id, customer_id, total_cents, sale_date
            FROM sales
            WHERE user_id = ?1
            ORDER BY sale_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists a user's sales with nested items, product detail, and customer
    /// detail, newest first. Assembled from three scoped reads.
    pub async fn list_detailed(&self, user_id: &str) -> DbResult<Vec<SaleDetail>> {
        let sales = self.list_for_user(user_id).await?;
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT si.id, si.sale_id, si.product_id, si.quantity,
                   si.unit_price_cents, si.created_at
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            WHERE s.user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, user_id, name, price_cents, stock, category,
                   low_stock_alert, created_at, updated_at
            FROM products
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, user_id, name, email, phone, created_at FROM customers WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let product_by_id: HashMap<&str, &Product> =
            products.iter().map(|p| (p.id.as_str(), p)).collect();
        let customer_by_id: HashMap<&str, &Customer> =
            customers.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut items_by_sale: HashMap<String, Vec<SaleItemDetail>> = HashMap::new();
        for item in items {
            let product = item
                .product_id
                .as_deref()
                .and_then(|pid| product_by_id.get(pid))
                .map(|p| (*p).clone());
            items_by_sale
                .entry(item.sale_id.clone())
                .or_default()
                .push(SaleItemDetail { item, product });
        }

        let details = sales
            .into_iter()
            .map(|sale| {
                let items = items_by_sale.remove(&sale.id).unwrap_or_default();
                let customer = sale
                    .customer_id
                    .as_deref()
                    .and_then(|cid| customer_by_id.get(cid))
                    .map(|c| (*c).clone());
                SaleDetail {
                    sale,
                    items,
                    customer,
                }
            })
            .collect();

        Ok(details)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
