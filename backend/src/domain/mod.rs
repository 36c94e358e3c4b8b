//! Domain entities, validation engine and record services.
//!
//! The genuinely engineered logic lives here: the check-digit national id
//! validator, the declarative field validation with aggregated reporting,
//! the zero-value-as-absence partial-update merge, and the order/user
//! record services orchestrating them around the store and directory ports.
//! Everything is transport agnostic; inbound and outbound adapters depend
//! on this module, never the other way round.

pub mod error;
pub mod national_id;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod user;
pub mod user_service;
pub mod validation;

pub use self::error::{Error, ErrorCode};
pub use self::national_id::{NationalId, NationalIdError};
pub use self::order::{Order, OrderDraft};
pub use self::order_service::OrderService;
pub use self::user::{User, UserDraft};
pub use self::user_service::UserService;
pub use self::validation::{Violation, ViolationKind, Violations};
