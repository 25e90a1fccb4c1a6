//! Return acceptance and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use common::Id;
use serde::Deserialize;
use service::{AcceptReturnRequest, GetReturnedRequest};

use crate::error::ApiError;
use crate::routes::orders::{AppState, OrderResponse, to_responses};

#[derive(Debug, Deserialize)]
pub struct AcceptReturnBody {
    pub client_id: Id,
    pub order_id: Id,
}

/// `page` is an offset into the returned orders, `per_page` a limit.
#[derive(Debug, Deserialize)]
pub struct ReturnedQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub per_page: i64,
}

/// POST /returns — take an issued order back from its client.
#[tracing::instrument(skip(state, body), fields(order_id = %body.order_id))]
pub async fn accept(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AcceptReturnBody>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .service
        .accept_return(AcceptReturnRequest::new(body.client_id, body.order_id))
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /returns — returned orders, paged.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReturnedQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .service
        .get_returned(GetReturnedRequest::new(query.page, query.per_page))
        .await?;
    Ok(Json(to_responses(&orders)))
}
