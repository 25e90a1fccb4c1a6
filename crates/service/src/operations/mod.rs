//! The lifecycle use cases, one module per operation.

mod accept;
mod cancel;
mod issue;
mod queries;
mod returns;
