//! Order entity and status.

mod entity;
mod status;

pub use entity::Order;
pub use status::Status;
