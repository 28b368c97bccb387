//! # Repository Module
//!
//! Database repository implementations for Venta.
//!
//! The repository pattern keeps all SQL in one place behind a clean API:
//! handlers call `db.products().list_for_user(...)`, the repository runs
//! the query, and ownership scoping (`user_id`) is enforced in every
//! statement rather than trusted to callers.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD
//! - [`customer::CustomerRepository`] - Customer CRUD
//! - [`sale::SaleRepository`] - Sale creation (transactional) and listing
//! - [`report::ReportRepository`] - Daily-sales and top-products reports

pub mod customer;
pub mod product;
pub mod report;
pub mod sale;

/// Generates a fresh entity ID.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
