//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the domain's driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{OrderOperations, UserOperations};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Order operations driving port, implemented by the order service.
    pub orders: Arc<dyn OrderOperations>,
    /// User operations driving port, implemented by the user service.
    pub users: Arc<dyn UserOperations>,
}

impl HttpState {
    /// Bundle port implementations for injection into the app.
    pub fn new(orders: Arc<dyn OrderOperations>, users: Arc<dyn UserOperations>) -> Self {
        Self { orders, users }
    }
}
