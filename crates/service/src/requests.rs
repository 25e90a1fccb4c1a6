//! Request and response types for the lifecycle use cases.

use common::Id;
use domain::{Order, PackagingKind};

use crate::error::IssueErrors;

/// Accept an order from a courier.
#[derive(Debug, Clone)]
pub struct AcceptOrderRequest {
    pub id: Id,
    pub client_id: Id,
    pub weight: u32,
    pub cost: u32,
    /// Primary packaging, if any.
    pub packaging: Option<PackagingKind>,
    /// Wrap the primary packaging in film.
    pub add_film: bool,
}

impl AcceptOrderRequest {
    /// Creates a request with no packaging.
    pub fn new(id: Id, client_id: Id, weight: u32, cost: u32) -> Self {
        Self {
            id,
            client_id,
            weight,
            cost,
            packaging: None,
            add_film: false,
        }
    }

    pub fn with_packaging(mut self, packaging: PackagingKind) -> Self {
        self.packaging = Some(packaging);
        self
    }

    pub fn with_film(mut self) -> Self {
        self.add_film = true;
        self
    }
}

/// Cancel an order: return it to the courier.
#[derive(Debug, Clone, Copy)]
pub struct CancelOrderRequest {
    pub id: Id,
}

impl CancelOrderRequest {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

/// Hand orders to their client.
///
/// All orders are expected to belong to the client of the first one.
#[derive(Debug, Clone)]
pub struct IssueOrdersRequest {
    pub ids: Vec<Id>,
}

impl IssueOrdersRequest {
    pub fn new(ids: impl IntoIterator<Item = Id>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

/// Outcome of an issue call.
///
/// Issuing is partial: `orders` holds what was handed out, `rejected` names
/// every requested order that was not.
#[derive(Debug, Default)]
pub struct IssueOrdersResponse {
    pub orders: Vec<Order>,
    pub rejected: Option<IssueErrors>,
}

/// Take an issued order back from its client.
#[derive(Debug, Clone, Copy)]
pub struct AcceptReturnRequest {
    pub client_id: Id,
    pub order_id: Id,
}

impl AcceptReturnRequest {
    pub fn new(client_id: Id, order_id: Id) -> Self {
        Self {
            client_id,
            order_id,
        }
    }
}

/// List a client's orders waiting in storage.
#[derive(Debug, Clone, Copy)]
pub struct GetOrdersRequest {
    pub client_id: Id,
    /// Only orders stored at this pickup point.
    pub local_only: bool,
}

impl GetOrdersRequest {
    pub fn new(client_id: Id) -> Self {
        Self {
            client_id,
            local_only: false,
        }
    }

    pub fn local_only(mut self) -> Self {
        self.local_only = true;
        self
    }
}

/// List returned orders.
///
/// `page` is the number of orders to skip and `per_page` the most to return;
/// a non-positive `per_page` returns everything after `page`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetReturnedRequest {
    pub page: u64,
    pub per_page: i64,
}

impl GetReturnedRequest {
    pub fn new(page: u64, per_page: i64) -> Self {
        Self { page, per_page }
    }
}
