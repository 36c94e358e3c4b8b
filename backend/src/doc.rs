//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! covering the orders and users endpoints plus the health probes. The
//! generated specification backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Order, OrderDraft, User, UserDraft};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "HTTP interface for order and user record management.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::list_user_orders,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Order, OrderDraft, User, UserDraft, Error, ErrorCode)),
    tags(
        (name = "orders", description = "Operations on order records"),
        (name = "users", description = "Operations on user records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
