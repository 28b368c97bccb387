//! # Domain Types
//!
//! Core domain types used throughout Venta.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Product      │   │      Sale       │   │    Customer     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │   │
//! │  │  user_id        │   │  user_id        │   │  user_id        │   │
//! │  │  price_cents    │   │  total_cents    │   │  name/email     │   │
//! │  │  stock          │   │  customer_id?   │   │  phone          │   │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘   │
//! │                                 │ 1..n                             │
//! │                        ┌────────▼────────┐                         │
//! │                        │    SaleItem     │                         │
//! │                        │  quantity       │                         │
//! │                        │  unit_price_*   │ ← price snapshot        │
//! │                        └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Model
//! Every entity is scoped to exactly one user (`user_id`). No row is
//! visible or mutable by a different user; this is the sole authorization
//! model (no roles, no sharing).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::DEFAULT_LOW_STOCK_ALERT;

// =============================================================================
// Product
// =============================================================================

/// A product in a user's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user. All reads and writes are scoped to this.
    pub user_id: String,

    /// Display name.
    pub name: String,

    /// Catalog price in cents.
    pub price_cents: i64,

    /// Current stock level. Never negative at any observable time.
    pub stock: i64,

    /// Free-text category.
    pub category: String,

    /// Threshold below which the product is flagged as low on stock.
    pub low_stock_alert: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the catalog price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Derived low-stock flag, computed at read time and never persisted.
    ///
    /// ## Example
    /// stock=10, low_stock_alert=5 → false; after selling 6, stock=4 → true.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_alert
    }

    /// Checks whether the requested quantity can be sold from current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Payload for creating a product. `name` and `price_cents` are required;
/// the rest default like the catalog expects.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_low_stock_alert")]
    pub low_stock_alert: i64,
}

fn default_low_stock_alert() -> i64 {
    DEFAULT_LOW_STOCK_ALERT
}

/// Partial update for a product. Each field is independently omittable;
/// only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub low_stock_alert: Option<i64>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer in a user's address book. Independent lifecycle; referenced
/// optionally by sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a customer. Only `name` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Partial update for a customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Created atomically with its line items; the total is
/// always the server-computed sum of the items, never a client value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub user_id: String,
    pub customer_id: Option<String>,
    pub total_cents: i64,
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as a Money value.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sale.
/// Uses the snapshot pattern: `unit_price_cents` is frozen at sale time so
/// later catalog price changes never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    /// Nullable: deleting a product keeps the item, reference goes NULL.
    pub product_id: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// One requested line in a sale-creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSaleItem {
    pub product_id: String,
    pub quantity: i64,
    /// Price override. When absent, the product's current catalog price is
    /// snapshotted instead.
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
}

/// Payload for recording a sale. Any client-supplied total is ignored
/// (unknown fields are dropped at deserialization).
#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub items: Vec<NewSaleItem>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

// =============================================================================
// Composites (read models)
// =============================================================================

/// A sale item together with its product detail, for the sales listing.
#[derive(Debug, Clone, Serialize)]
pub struct SaleItemDetail {
    #[serde(flatten)]
    pub item: SaleItem,
    /// None when the product has since been deleted.
    pub product: Option<Product>,
}

/// A sale with nested items and customer detail, newest first in listings.
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItemDetail>,
    pub customer: Option<Customer>,
}

/// A sale with bare items, as returned by the daily-sales report.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

// =============================================================================
// Reports
// =============================================================================

/// Aggregated sales figures for one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProduct {
    pub name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, alert: i64) -> Product {
        Product {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            name: "Coffee".to_string(),
            price_cents: 1000,
            stock,
            category: String::new(),
            low_stock_alert: alert,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock_threshold() {
        assert!(!product(10, 5).is_low_stock());
        assert!(product(5, 5).is_low_stock());
        assert!(product(4, 5).is_low_stock());
    }

    #[test]
    fn test_can_sell() {
        let p = product(3, 5);
        assert!(p.can_sell(3));
        assert!(!p.can_sell(4));
    }

    #[test]
    fn test_line_total() {
        let item = SaleItem {
            id: "i1".to_string(),
            sale_id: "s1".to_string(),
            product_id: Some("p1".to_string()),
            quantity: 3,
            unit_price_cents: 299,
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total().cents(), 897);
    }

    #[test]
    fn test_new_sale_ignores_unknown_fields() {
        // A client-supplied total must never reach the domain.
        let payload = r#"{"items":[{"product_id":"p1","quantity":2}],"total":1}"#;
        let sale: NewSale = serde_json::from_str(payload).unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].quantity, 2);
        assert!(sale.items[0].unit_price_cents.is_none());
        assert!(sale.customer_id.is_none());
    }

    #[test]
    fn test_new_product_defaults() {
        let payload = r#"{"name":"Tea","price_cents":450}"#;
        let p: NewProduct = serde_json::from_str(payload).unwrap();
        assert_eq!(p.stock, 0);
        assert_eq!(p.category, "");
        assert_eq!(p.low_stock_alert, DEFAULT_LOW_STOCK_ALERT);
    }
}
