//! Shared types for the pickup point order system.

pub mod clock;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{Id, ParseIdError};
