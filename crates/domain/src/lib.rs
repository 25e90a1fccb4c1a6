//! Domain layer for the pickup point order system.
//!
//! Pure data and validation logic, no I/O:
//! - `Order` entity and its `Status` lifecycle
//! - `Packaging` decorator chain (box, bag, film)
//! - `Filter` used by repositories for queries and bulk deletes
//! - `OrderEvent` audit record emitted on state changes

pub mod error;
pub mod event;
pub mod filter;
pub mod order;
pub mod packaging;

pub use common::Id;
pub use error::{PackagingError, ParseError};
pub use event::{Operation, OrderEvent};
pub use filter::{Filter, Predicate};
pub use order::{Order, Status};
pub use packaging::{Packaging, PackagingKind, resolve_packaging};
