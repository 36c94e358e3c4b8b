//! Users API handlers.
//!
//! ```text
//! GET    /users        list users
//! GET    /users/{id}   fetch one user
//! POST   /users        create a user
//! PUT    /users/{id}   partial update (empty string = field omitted)
//! DELETE /users/{id}   remove a user
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::domain::{Error, User, UserDraft};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// List every user.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    state.users.list_users().await.map(web::Json)
}

/// Fetch one user by identifier.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<User>> {
    state.users.user_by_id(path.into_inner()).await.map(web::Json)
}

/// Create a user after validation, national id canonicalization and the
/// uniqueness check.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserDraft,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation failure", body = Error),
        (status = 409, description = "National id already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    let created = state.users.create_user(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Merge a partial draft into a stored user and persist the result.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserDraft,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Merged record fails validation", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 409, description = "National id already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserDraft>,
) -> ApiResult<web::Json<User>> {
    state
        .users
        .update_user(path.into_inner(), payload.into_inner())
        .await
        .map(web::Json)
}

/// Delete a user by identifier.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.users.delete_user(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
