//! Audit events emitted on order state changes.

use chrono::{DateTime, Utc};
use common::Id;
use serde::{Deserialize, Serialize};

/// The state change an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Order accepted from a courier.
    Accept,
    /// Order handed to a client.
    Issue,
    /// Order brought back by a client.
    Return,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Accept => "accept",
            Operation::Issue => "issue",
            Operation::Return => "return",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable record of a completed state change.
///
/// Not domain data: it is serialized and handed to the event sink, keyed by
/// the decimal order ID so a key-partitioned log keeps per-order ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: Id,
    pub operation: Operation,
    pub timestamp: DateTime<Utc>,
}

impl OrderEvent {
    pub fn new(order_id: Id, operation: Operation, timestamp: DateTime<Utc>) -> Self {
        Self {
            order_id,
            operation,
            timestamp,
        }
    }

    /// The message key: the order ID as decimal text.
    pub fn key(&self) -> Vec<u8> {
        self.order_id.to_string().into_bytes()
    }

    /// The message value: the event as JSON.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
