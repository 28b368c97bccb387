//! # venta-core: Pure Business Logic for Venta
//!
//! This crate is the **heart** of Venta. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Venta Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                     apps/api (Axum)                           │ │
//! │  │   auth middleware ──► route handlers ──► JSON responses       │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │               ★ venta-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌────────────┐   │ │
//! │  │   │   types   │ │   money   │ │   error   │ │ validation │   │ │
//! │  │   │  Product  │ │   Money   │ │ CoreError │ │   rules    │   │ │
//! │  │   │   Sale    │ │  (cents)  │ │           │ │   checks   │   │ │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └────────────┘   │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │                  venta-db (Database Layer)                    │ │
//! │  │          SQLite queries, migrations, repositories             │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64), no floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{
    validate_name, validate_new_customer, validate_new_product, validate_new_sale,
    validate_price_cents, validate_quantity, validate_stock,
};

/// Default low-stock alert threshold for new products.
///
/// A product with `stock <= low_stock_alert` is flagged `low_stock` at
/// read time; the flag itself is never persisted.
pub const DEFAULT_LOW_STOCK_ALERT: i64 = 5;
