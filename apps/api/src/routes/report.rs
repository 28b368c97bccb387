//! Reporting routes: daily sales and top products.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use venta_core::{SaleWithItems, TopProduct, ValidationError};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reports/daily-sales", get(daily_sales))
        .route("/api/reports/top-products", get(top_products))
}

#[derive(Debug, Deserialize)]
struct DailySalesQuery {
    /// ISO date (YYYY-MM-DD). Defaults to today (UTC) when omitted.
    date: Option<String>,
}

/// GET /api/reports/daily-sales?date=YYYY-MM-DD
async fn daily_sales(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DailySalesQuery>,
) -> ApiResult<Json<Vec<SaleWithItems>>> {
    let date = match query.date {
        Some(raw) => raw.parse::<NaiveDate>().map_err(|_| {
            ApiError::from(ValidationError::InvalidFormat {
                field: "date".to_string(),
                reason: format!("expected YYYY-MM-DD, got {raw}"),
            })
        })?,
        None => chrono::Utc::now().date_naive(),
    };

    Ok(Json(state.db.reports().daily_sales(&user.id, date).await?))
}

/// GET /api/reports/top-products - ten best sellers by quantity.
async fn top_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<TopProduct>>> {
    Ok(Json(state.db.reports().top_products(&user.id).await?))
}
