//! Reporting queries: daily sales and top products. Read-only; both are
//! computed from the sale history at request time, nothing is cached.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use venta_core::{Sale, SaleItem, SaleWithItems, TopProduct};

/// Name shown for aggregated lines whose product has been deleted.
const UNKNOWN_PRODUCT: &str = "Unknown product";

/// How many products the top-products report returns.
const TOP_PRODUCTS_LIMIT: usize = 10;

/// Row shape for the top-products aggregation query.
#[derive(sqlx::FromRow)]
struct SoldLine {
    product_name: Option<String>,
    quantity: i64,
    unit_price_cents: i64,
}

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Returns a user's sales that fall on the given calendar day (UTC),
    /// with their line items.
    pub async fn daily_sales(&self, user_id: &str, date: NaiveDate) -> DbResult<Vec<SaleWithItems>> {
        let day_start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());
        let day_end = day_start + TimeDelta::days(1);

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, user_id, customer_id, total_cents, sale_date
            FROM sales
            WHERE user_id = ?1 AND sale_date >= ?2 AND sale_date < ?3
            ORDER BY sale_date DESC
            "#,
        )
        .bind(user_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, date = %date, count = sales.len(), "Daily sales");

        let mut result = Vec::with_capacity(sales.len());
        for sale in sales {
            let items = sqlx::query_as::<_, SaleItem>(
                r#"
                SELECT id, sale_id, product_id, quantity, unit_price_cents, created_at
                FROM sale_items
                WHERE sale_id = ?1
                "#,
            )
            .bind(&sale.id)
            .fetch_all(&self.pool)
            .await?;

            result.push(SaleWithItems { sale, items });
        }

        Ok(result)
    }

    /// Aggregates a user's entire sale history by product name and returns
    /// the ten best sellers, ordered by quantity sold (name breaks ties).
    /// Items whose product has been deleted are grouped under a placeholder
    /// name.
    pub async fn top_products(&self, user_id: &str) -> DbResult<Vec<TopProduct>> {
        let lines = sqlx::query_as::<_, SoldLine>(
            r#"
            SELECT p.name AS product_name, si.quantity, si.unit_price_cents
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            LEFT JOIN products p ON p.id = si.product_id
            WHERE s.user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_name: HashMap<String, (i64, i64)> = HashMap::new();
        for line in lines {
            let name = line
                .product_name
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
            let entry = by_name.entry(name).or_insert((0, 0));
            entry.0 += line.quantity;
            entry.1 += line.unit_price_cents * line.quantity;
        }

        let mut top: Vec<TopProduct> = by_name
            .into_iter()
            .map(|(name, (quantity, revenue_cents))| TopProduct {
                name,
                quantity,
                revenue_cents,
            })
            .collect();

        top.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
        top.truncate(TOP_PRODUCTS_LIMIT);

        Ok(top)
    }
}
