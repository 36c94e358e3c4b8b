//! Backend entry-point: wires the record services, persistence, the remote
//! user directory, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use storefront::doc::ApiDoc;
use storefront::domain::{OrderService, UserService};
use storefront::inbound::http::health::{live, ready, HealthState};
use storefront::inbound::http::orders::{
    create_order, delete_order, get_order, list_orders, list_user_orders, update_order,
};
use storefront::inbound::http::state::HttpState;
use storefront::inbound::http::users::{
    create_user, delete_user, get_user, list_users, update_user,
};
use storefront::outbound::directory::HttpUserDirectory;
use storefront::outbound::persistence::{
    DieselOrderRepository, DieselUserRepository, DbPool, PoolConfig,
};
use storefront::Trace;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DIRECTORY_URL: &str = "http://user-service:8081/";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let directory_url = env::var("USER_DIRECTORY_URL")
        .unwrap_or_else(|_| DEFAULT_DIRECTORY_URL.to_owned());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());

    let mut pool_config = PoolConfig::new(database_url);
    if let Some(size) = env::var("DATABASE_POOL_SIZE")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
    {
        pool_config = pool_config.with_max_size(size);
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;

    let directory_base = Url::parse(&directory_url)
        .map_err(|e| std::io::Error::other(format!("invalid USER_DIRECTORY_URL: {e}")))?;
    let directory = HttpUserDirectory::new(directory_base)
        .map_err(|e| std::io::Error::other(format!("directory client setup failed: {e}")))?;

    let order_service = OrderService::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(directory),
    );
    let user_service = UserService::new(Arc::new(DieselUserRepository::new(pool)));

    let http_state = web::Data::new(HttpState::new(
        Arc::new(order_service),
        Arc::new(user_service),
    ));
    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();

    info!(addr = %bind_addr, "starting storefront backend");
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(list_orders)
            .service(get_order)
            .service(list_user_orders)
            .service(create_order)
            .service(update_order)
            .service(delete_order)
            .service(list_users)
            .service(get_user)
            .service(create_user)
            .service(update_user)
            .service(delete_user)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr.as_str())?;

    health_state.mark_ready();
    server.run().await
}
