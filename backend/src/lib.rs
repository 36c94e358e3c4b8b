//! Storefront backend: REST record management for orders and users.
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] holds the entities, validation rules, ports, and the
//!   orchestrating services.
//! - [`inbound`] contains the actix-web HTTP adapter.
//! - [`outbound`] contains the Diesel persistence adapters and the remote
//!   user directory client.
//! - [`middleware`] provides request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::trace::{Trace, TraceId, TRACE_ID_HEADER};
