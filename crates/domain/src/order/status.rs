//! Order status machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The status of an order held at a pickup point.
///
/// Transitions:
/// ```text
/// Stored ──issue──► ReachedClient ──return──► Returned ──cancel──► Canceled
///   │                                                                 ▲
///   └──────────────────────cancel (expired only)─────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Accepted from a courier and waiting at the pickup point.
    #[default]
    Stored,

    /// Handed over to the client.
    ReachedClient,

    /// Brought back by the client, waiting for a courier.
    Returned,

    /// Collected by the courier (terminal state).
    Canceled,
}

impl Status {
    /// Returns true if the order can be handed to a client.
    pub fn can_issue(&self) -> bool {
        matches!(self, Status::Stored)
    }

    /// Returns true if the client can bring the order back.
    pub fn can_return(&self) -> bool {
        matches!(self, Status::ReachedClient)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Canceled)
    }

    /// Returns the storage and wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Stored => "stored",
            Status::ReachedClient => "reached-client",
            Status::Returned => "returned",
            Status::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stored" => Ok(Status::Stored),
            "reached-client" => Ok(Status::ReachedClient),
            "returned" => Ok(Status::Returned),
            "canceled" => Ok(Status::Canceled),
            other => Err(ParseError::new("status", other)),
        }
    }
}
