//! Orders API handlers.
//!
//! ```text
//! GET    /orders             list orders
//! GET    /orders/{id}        fetch one order
//! GET    /users/{id}/orders  list a user's orders
//! POST   /orders             create an order
//! PUT    /orders/{id}        partial update (zero value = field omitted)
//! DELETE /orders/{id}        remove an order
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::domain::{Error, Order, OrderDraft};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// List every order.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Orders", body = [Order]),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Order>>> {
    state.orders.list_orders().await.map(web::Json)
}

/// Fetch one order by identifier.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 404, description = "Order not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Order>> {
    state.orders.order_by_id(path.into_inner()).await.map(web::Json)
}

/// List the orders owned by a user.
#[utoipa::path(
    get,
    path = "/users/{id}/orders",
    params(("id" = i64, Path, description = "Owning user identifier")),
    responses(
        (status = 200, description = "Orders owned by the user", body = [Order]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listUserOrders"
)]
#[get("/users/{id}/orders")]
pub async fn list_user_orders(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<Order>>> {
    state
        .orders
        .orders_for_user(path.into_inner())
        .await
        .map(web::Json)
}

/// Create an order after validating it and confirming the owning user
/// exists in the remote directory.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderDraft,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Validation failure or unknown user", body = Error),
        (status = 503, description = "User directory unreachable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    payload: web::Json<OrderDraft>,
) -> ApiResult<HttpResponse> {
    let created = state.orders.create_order(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Merge a partial draft into a stored order and persist the result.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order identifier")),
    request_body = OrderDraft,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Merged record fails validation", body = Error),
        (status = 404, description = "Order not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<OrderDraft>,
) -> ApiResult<web::Json<Order>> {
    state
        .orders
        .update_order(path.into_inner(), payload.into_inner())
        .await
        .map(web::Json)
}

/// Delete an order by identifier.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order identifier")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.orders.delete_order(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
