//! The order entity.

use chrono::{DateTime, Duration, Utc};
use common::Id;
use serde::{Deserialize, Serialize};

use crate::error::PackagingError;
use crate::packaging::Packaging;

use super::Status;

/// A parcel held at a pickup point.
///
/// `status_updated_at` is a write-time stamp owned by the persistence layer.
/// Application code never assigns it: a freshly built order has no stamp, and
/// repositories attach one through [`Order::stamped`] when they persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: Id,
    client_id: Id,
    pickup_point_id: Id,
    status: Status,
    status_updated_at: Option<DateTime<Utc>>,
    weight: u32,
    cost: u32,
}

impl Order {
    /// Creates a new order in `Stored` status.
    pub fn new(id: Id, client_id: Id, pickup_point_id: Id, weight: u32, cost: u32) -> Self {
        Self {
            id,
            client_id,
            pickup_point_id,
            status: Status::Stored,
            status_updated_at: None,
            weight,
            cost,
        }
    }

    /// Rebuilds an order from persisted columns.
    pub fn from_parts(
        id: Id,
        client_id: Id,
        pickup_point_id: Id,
        status: Status,
        status_updated_at: DateTime<Utc>,
        weight: u32,
        cost: u32,
    ) -> Self {
        Self {
            id,
            client_id,
            pickup_point_id,
            status,
            status_updated_at: Some(status_updated_at),
            weight,
            cost,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn client_id(&self) -> Id {
        self.client_id
    }

    pub fn pickup_point_id(&self) -> Id {
        self.pickup_point_id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// When the persistence layer last wrote this order, if ever.
    pub fn status_updated_at(&self) -> Option<DateTime<Utc>> {
        self.status_updated_at
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Returns the order with a different status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Returns the order carrying the persistence write stamp `at`.
    ///
    /// Only repositories call this. The stamp never moves backwards: an
    /// earlier `at` than the current stamp leaves the current one in place.
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.status_updated_at = Some(match self.status_updated_at {
            Some(current) if current > at => current,
            _ => at,
        });
        self
    }

    /// Returns true if the order is no longer waiting in storage or has
    /// outstayed `store_duration`.
    pub fn is_expired(&self, store_duration: Duration, now: DateTime<Utc>) -> bool {
        if self.status != Status::Stored {
            return true;
        }
        match self.status_updated_at {
            // A deadline past the representable range is never reached.
            Some(updated) => updated
                .checked_add_signed(store_duration)
                .is_some_and(|deadline| deadline < now),
            None => false,
        }
    }

    /// Returns true if the client may still bring the order back.
    pub fn can_be_returned(&self, return_window: Duration, now: DateTime<Utc>) -> bool {
        if self.status != Status::ReachedClient {
            return false;
        }
        match self.status_updated_at {
            Some(updated) => updated
                .checked_add_signed(return_window)
                .is_none_or(|deadline| deadline > now),
            None => false,
        }
    }

    /// Adds the packaging cost to the order.
    ///
    /// The cost only changes when every layer of the packaging accepts the
    /// order weight.
    pub fn apply_packaging(&mut self, packaging: Option<&Packaging>) -> Result<(), PackagingError> {
        if let Some(packaging) = packaging {
            self.cost = packaging.apply(self.weight, self.cost)?;
        }
        Ok(())
    }
}
