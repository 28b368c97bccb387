//! Customer CRUD routes, same shape as the product routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use venta_core::{validate_new_customer, Customer, CustomerUpdate, NewCustomer};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list).post(create))
        .route(
            "/api/customers/:id",
            get(get_one).put(update).delete(delete_one),
        )
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().list_for_user(&user.id).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    let customer = state
        .db
        .customers()
        .get_owned(&id, &user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer not found: {id}")))?;
    Ok(Json(customer))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<NewCustomer>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    validate_new_customer(&payload).map_err(|e| ApiError::Validation(e.to_string()))?;
    let customer = state.db.customers().insert(&user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(changes): AppJson<CustomerUpdate>,
) -> ApiResult<Json<Customer>> {
    if let Some(ref name) = changes.name {
        venta_core::validate_name(name).map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    let customer = state.db.customers().update(&id, &user.id, changes).await?;
    Ok(Json(customer))
}

async fn delete_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.customers().delete(&id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
