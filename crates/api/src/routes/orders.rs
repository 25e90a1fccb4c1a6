//! Order acceptance, cancellation, issue and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::Id;
use domain::{Order, PackagingKind, Status};
use serde::{Deserialize, Serialize};
use service::{
    AcceptOrderRequest, CancelOrderRequest, GetOrdersRequest, IssueOrdersRequest, OrderService,
};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub service: OrderService,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct AcceptOrderBody {
    pub id: Id,
    pub client_id: Id,
    pub weight: u32,
    pub cost: u32,
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub add_film: bool,
}

#[derive(Debug, Deserialize)]
pub struct IssueOrdersBody {
    pub ids: Vec<Id>,
}

#[derive(Debug, Deserialize)]
pub struct ClientOrdersQuery {
    #[serde(default)]
    pub local_only: bool,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Id,
    pub client_id: Id,
    pub pickup_point_id: Id,
    pub status: Status,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub weight: u32,
    pub cost: u32,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            client_id: order.client_id(),
            pickup_point_id: order.pickup_point_id(),
            status: order.status(),
            status_updated_at: order.status_updated_at(),
            weight: order.weight(),
            cost: order.cost(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub issued: Vec<OrderResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

pub(crate) fn to_responses(orders: &[Order]) -> Vec<OrderResponse> {
    orders.iter().map(OrderResponse::from).collect()
}

// -- Handlers --

/// POST /orders — accept an order from a courier.
#[tracing::instrument(skip(state, body), fields(order_id = %body.id))]
pub async fn accept(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AcceptOrderBody>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let packaging = body
        .packaging
        .as_deref()
        .map(str::parse::<PackagingKind>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut req = AcceptOrderRequest::new(body.id, body.client_id, body.weight, body.cost);
    req.packaging = packaging;
    req.add_film = body.add_film;

    let order = state.service.accept_order(req).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// POST /orders/{id}/cancel — return an order to the courier.
#[tracing::instrument(skip(state))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Id>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .service
        .cancel_order(CancelOrderRequest::new(id))
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/issue — hand orders to their client.
///
/// Responds 200 whenever the call itself succeeds; orders that could not be
/// issued are listed next to the issued ones.
#[tracing::instrument(skip(state, body), fields(requested = body.ids.len()))]
pub async fn issue(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IssueOrdersBody>,
) -> Result<Json<IssueResponse>, ApiError> {
    let response = state
        .service
        .issue_orders(IssueOrdersRequest::new(body.ids))
        .await?;

    let (rejected, errors) = match &response.rejected {
        Some(rejected) => (
            rejected.ids(),
            rejected.errors().iter().map(ToString::to_string).collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(Json(IssueResponse {
        issued: to_responses(&response.orders),
        rejected,
        errors,
    }))
}

/// GET /clients/{client_id}/orders — a client's orders waiting in storage.
#[tracing::instrument(skip(state))]
pub async fn list_for_client(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<Id>,
    Query(query): Query<ClientOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let mut req = GetOrdersRequest::new(client_id);
    req.local_only = query.local_only;

    let orders = state.service.get_orders(req).await?;
    Ok(Json(to_responses(&orders)))
}
