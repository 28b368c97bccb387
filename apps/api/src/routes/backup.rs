//! Backup route: a full export of the caller's data in one response.

use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use venta_core::{Customer, Product, Sale};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Backup {
    pub exported_at: DateTime<Utc>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub sales: Vec<Sale>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/backup", get(backup))
}

/// GET /api/backup - everything the user owns, suitable for re-import.
async fn backup(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Backup>> {
    let products = state.db.products().list_for_user(&user.id).await?;
    let customers = state.db.customers().list_for_user(&user.id).await?;
    let sales = state.db.sales().list_for_user(&user.id).await?;

    Ok(Json(Backup {
        exported_at: Utc::now(),
        products,
        customers,
        sales,
    }))
}
