//! Persistence port for orders.
//!
//! [`OrderRepository`] is the contract the lifecycle service depends on.
//! Two adapters ship with it: [`InMemoryOrderRepository`] for tests and
//! single-process runs, and [`PostgresOrderRepository`] for production.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::InMemoryOrderRepository;
pub use postgres::PostgresOrderRepository;
pub use repository::{OrderRepository, OrderRepositoryExt, Written};
