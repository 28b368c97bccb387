//! Sale routes. Creation is fully delegated to the transactional
//! repository; the handler only maps errors to status codes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use venta_core::{NewSale, Sale, SaleDetail};

use crate::auth::AuthUser;
use crate::error::{ApiResult, AppJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sales", get(list).post(create))
}

/// GET /api/sales - the user's sales with nested items, product detail,
/// and customer detail, newest first.
async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<SaleDetail>>> {
    Ok(Json(state.db.sales().list_detailed(&user.id).await?))
}

/// POST /api/sales - records a sale. The total is computed server-side;
/// any total in the payload is ignored.
async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<NewSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let sale = state.db.sales().create_sale(&user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}
