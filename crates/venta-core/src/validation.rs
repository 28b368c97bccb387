//! # Validation Module
//!
//! Input validation for Venta.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: HTTP handler (Rust)                                       │
//! │  ├── Type validation (serde deserialization)                        │
//! │  └── THIS MODULE: business rule validation                          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Database (SQLite)                                         │
//! │  ├── NOT NULL / CHECK constraints (stock >= 0, quantity > 0)        │
//! │  └── Foreign key constraints                                        │
//! │                                                                     │
//! │  Multiple layers catch different errors.                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs **before** any mutation; a request that fails
//! validation must leave the store untouched.

use crate::error::ValidationError;
use crate::types::{NewCustomer, NewProduct, NewSale};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an entity name (product or customer).
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed; negatives never are.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity. Must be strictly positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a product-creation payload.
pub fn validate_new_product(payload: &NewProduct) -> ValidationResult<()> {
    validate_name(&payload.name)?;
    validate_price_cents(payload.price_cents)?;
    validate_stock(payload.stock)?;
    Ok(())
}

/// Validates a customer-creation payload.
pub fn validate_new_customer(payload: &NewCustomer) -> ValidationResult<()> {
    validate_name(&payload.name)
}

/// Validates a sale-creation payload.
///
/// ## Rules (all checked before any mutation)
/// 1. `items` must be non-empty.
/// 2. Each item needs a product reference and a strictly positive quantity.
/// 3. A caller-supplied unit price override must not be negative.
///
/// Existence, ownership and stock checks need the store and happen in the
/// sale repository; this function covers everything that is decidable from
/// the payload alone.
pub fn validate_new_sale(payload: &NewSale) -> ValidationResult<()> {
    if payload.items.is_empty() {
        return Err(ValidationError::EmptySale);
    }

    for item in &payload.items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }

        validate_quantity(item.quantity)?;

        if let Some(price) = item.unit_price_cents {
            validate_price_cents(price)?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
