//! Route handlers, one module per resource.

pub mod backup;
pub mod customer;
pub mod health;
pub mod product;
pub mod report;
pub mod sale;
