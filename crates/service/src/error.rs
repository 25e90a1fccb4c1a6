//! Service error types.

use std::fmt;

use common::Id;
use domain::PackagingError;
use store::StoreError;
use thiserror::Error;

/// Broad classification of a [`ServiceError`], used by adaptors to pick a
/// response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Upstream,
}

/// Errors returned by the lifecycle use cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No order with this ID exists.
    #[error("order {0} not found")]
    OrderNotFound(Id),

    /// An order with this ID was already accepted.
    #[error("order {0} already exists")]
    OrderAlreadyExists(Id),

    /// The order is neither returned nor past its storage period.
    #[error("can't cancel order {0}: it is either not expired or already issued")]
    CannotCancel(Id),

    /// The order is not waiting at this pickup point and can't be issued.
    #[error("order {0} is not stored at this pickup point")]
    NotIssuable(Id),

    /// A return was requested for an order that was never handed out.
    #[error("order {0} was not issued")]
    OrderNotIssued(Id),

    /// A return was requested by someone other than the order's client.
    #[error("order {order_id} belongs to another client, not {client_id}")]
    WrongClientId { order_id: Id, client_id: Id },

    /// A return was brought to a pickup point other than the issuing one.
    #[error("order {0} was issued at another pickup point")]
    WrongPickupPoint(Id),

    /// The return window has closed.
    #[error("return period for order {0} has expired")]
    ReturnExpired(Id),

    /// An issue request named no orders.
    #[error("no order IDs given to issue")]
    EmptyIssueRequest,

    #[error(transparent)]
    Packaging(#[from] PackagingError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::OrderNotFound(_) => ErrorKind::NotFound,
            ServiceError::OrderAlreadyExists(_)
            | ServiceError::CannotCancel(_)
            | ServiceError::NotIssuable(_)
            | ServiceError::ReturnExpired(_) => ErrorKind::Conflict,
            ServiceError::OrderNotIssued(_)
            | ServiceError::WrongClientId { .. }
            | ServiceError::WrongPickupPoint(_)
            | ServiceError::EmptyIssueRequest
            | ServiceError::Packaging(_) => ErrorKind::InvalidInput,
            ServiceError::Store(_) => ErrorKind::Upstream,
        }
    }

    /// Maps a repository miss to [`ServiceError::OrderNotFound`].
    pub(crate) fn from_lookup(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::OrderNotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

/// The requested orders an issue call left untouched, one error per ID.
#[derive(Debug, Default)]
pub struct IssueErrors {
    errors: Vec<ServiceError>,
}

impl IssueErrors {
    pub(crate) fn push(&mut self, err: ServiceError) {
        self.errors.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ServiceError] {
        &self.errors
    }

    /// IDs of the orders that were not issued.
    pub fn ids(&self) -> Vec<Id> {
        self.errors
            .iter()
            .filter_map(|e| match e {
                ServiceError::NotIssuable(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

impl fmt::Display for IssueErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for IssueErrors {}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
