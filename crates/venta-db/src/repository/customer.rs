//! Customer repository. Same ownership-scoped shape as the product
//! repository; customers have an independent lifecycle and are referenced
//! optionally by sales.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use venta_core::{Customer, CustomerUpdate, NewCustomer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists a user's customers, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, user_id, name, email, phone, created_at
            FROM customers
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Gets a customer by ID, scoped to the owning user.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, user_id, name, email, phone, created_at
            FROM customers
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer for the given user and returns it.
    pub async fn insert(&self, user_id: &str, payload: NewCustomer) -> DbResult<Customer> {
        let customer = Customer {
            id: generate_id(),
            user_id: user_id.to_string(),
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            created_at: Utc::now(),
        };

        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, user_id, name, email, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.user_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Applies a partial update to an owned customer and returns the result.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        changes: CustomerUpdate,
    ) -> DbResult<Customer> {
        let mut customer = self
            .get_owned(id, user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;

        if let Some(name) = changes.name {
            customer.name = name;
        }
        if let Some(email) = changes.email {
            customer.email = email;
        }
        if let Some(phone) = changes.phone {
            customer.phone = phone;
        }

        let result = sqlx::query(
            r#"
            UPDATE customers SET name = ?3, email = ?4, phone = ?5
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(customer)
    }

    /// Deletes an owned customer. Past sales keep their data; the customer
    /// reference on them goes NULL.
    pub async fn delete(&self, id: &str, user_id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}
