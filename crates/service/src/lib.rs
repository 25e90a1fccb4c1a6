//! Order lifecycle service for a single pickup point.
//!
//! [`OrderService`] runs the six use cases (accept, cancel, issue, accept
//! return, list orders, list returns) against three ports: the order
//! repository, the order cache and the event sink. Reads go through the
//! cache first; writes hit the store, then refresh the cache. Events are
//! published best-effort after the store write succeeds.

mod cached;
pub mod config;
pub mod error;
mod events;
mod operations;
pub mod requests;
mod service;
#[cfg(test)]
mod testing;

pub use config::ServiceConfig;
pub use error::{ErrorKind, IssueErrors, Result, ServiceError};
pub use requests::{
    AcceptOrderRequest, AcceptReturnRequest, CancelOrderRequest, GetOrdersRequest,
    GetReturnedRequest, IssueOrdersRequest, IssueOrdersResponse,
};
pub use service::OrderService;
