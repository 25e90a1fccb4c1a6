use common::Id;

use crate::order::{Order, Status};

/// Conjunction of optional constraints over orders.
///
/// Absent fields impose no constraint, so `Filter::new()` matches every
/// order. Repositories read the active constraints through
/// [`Filter::predicates`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter {
    /// Filter by order ID.
    pub id: Option<Id>,

    /// Filter by owning client.
    pub client_id: Option<Id>,

    /// Filter by pickup point.
    pub pickup_point_id: Option<Id>,

    /// Filter by status.
    pub status: Option<Status>,
}

/// One active constraint of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Id(Id),
    ClientId(Id),
    PickupPointId(Id),
    Status(Status),
}

impl Predicate {
    /// Returns true if `order` satisfies this constraint.
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Predicate::Id(id) => order.id() == *id,
            Predicate::ClientId(id) => order.client_id() == *id,
            Predicate::PickupPointId(id) => order.pickup_point_id() == *id,
            Predicate::Status(status) => order.status() == *status,
        }
    }
}

impl Filter {
    /// Creates a filter that matches every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter for all orders of a client.
    pub fn for_client(client_id: Id) -> Self {
        Self {
            client_id: Some(client_id),
            ..Default::default()
        }
    }

    /// Creates a filter for orders in a given status.
    pub fn for_status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Filters by order ID.
    pub fn id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Filters by client.
    pub fn client_id(mut self, client_id: Id) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Filters by pickup point.
    pub fn pickup_point_id(mut self, pickup_point_id: Id) -> Self {
        self.pickup_point_id = Some(pickup_point_id);
        self
    }

    /// Filters by status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the active constraints in a fixed order: id, client,
    /// pickup point, status.
    pub fn predicates(&self) -> Vec<Predicate> {
        [
            self.id.map(Predicate::Id),
            self.client_id.map(Predicate::ClientId),
            self.pickup_point_id.map(Predicate::PickupPointId),
            self.status.map(Predicate::Status),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Returns true if `order` satisfies every active constraint.
    pub fn matches(&self, order: &Order) -> bool {
        self.predicates().iter().all(|p| p.matches(order))
    }
}
