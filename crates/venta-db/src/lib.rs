//! # venta-db: Database Layer for Venta
//!
//! SQLite storage via sqlx, with a per-entity repository on top of a shared
//! connection pool.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, customer, sale, report)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use venta_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/venta.db")).await?;
//! let products = db.products().list_for_user(user_id).await?;
//! let sale = db.sales().create_sale(user_id, request).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::{CreateSaleError, SaleRepository};
