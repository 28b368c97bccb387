//! Product CRUD routes. Every handler reads the authenticated user from
//! the request extension and scopes its queries to that user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;

use venta_core::{validate_new_product, NewProduct, Product, ProductUpdate};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::AppState;

/// A product as the API presents it: the stored row plus the derived
/// low-stock flag, which is computed at read time and never persisted.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub low_stock: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let low_stock = product.is_low_stock();
        ProductResponse { product, low_stock }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route(
            "/api/products/:id",
            get(get_one).put(update).delete(delete_one),
        )
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    let products = state.db.products().list_for_user(&user.id).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state
        .db
        .products()
        .get_owned(&id, &user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))?;
    Ok(Json(product.into()))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    validate_new_product(&payload).map_err(|e| ApiError::Validation(e.to_string()))?;
    let product = state.db.products().insert(&user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(changes): AppJson<ProductUpdate>,
) -> ApiResult<Json<ProductResponse>> {
    if let Some(ref name) = changes.name {
        venta_core::validate_name(name).map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    if let Some(price_cents) = changes.price_cents {
        venta_core::validate_price_cents(price_cents)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    if let Some(stock) = changes.stock {
        venta_core::validate_stock(stock).map_err(|e| ApiError::Validation(e.to_string()))?;
    }

    let product = state.db.products().update(&id, &user.id, changes).await?;
    Ok(Json(product.into()))
}

async fn delete_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.products().delete(&id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
