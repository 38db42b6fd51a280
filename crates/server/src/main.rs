mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use crate::{
    config::Config,
    doc::ApiDoc,
    routes::{auth, enrollment, health, prerequisite, schedule},
    state::AppState,
    utils::shutdown::shutdown_signal,
};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use database::db::create_connection;
use log::info;
use migration::{Migrator, MigratorTrait};
use std::{error::Error, sync::Arc};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::from_env()?;

    let db = create_connection().await?;
    Migrator::up(&db, None).await?;
    info!("Database schema is up to date");

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(&config.oidc_issuer_url)
        .build()
        .await?;

    let bind_address = config.bind_address.clone();
    let state = AppState {
        db,
        config: Arc::new(config),
    };

    // Everything registered before the auth layer requires a bearer token
    let app = Router::new()
        .route("/me", get(auth::me))
        .route("/schedules", post(schedule::create_schedule))
        .route("/schedules/conflicts", get(schedule::find_conflicts))
        .route(
            "/schedules/{id}",
            patch(schedule::update_schedule).delete(schedule::delete_schedule),
        )
        .route("/sections/{id}/schedules", get(schedule::section_schedules))
        .route(
            "/courses/{id}/prerequisites",
            post(prerequisite::add_prerequisite).get(prerequisite::get_prerequisites),
        )
        .route(
            "/courses/{id}/prerequisites/{prerequisite_id}",
            delete(prerequisite::remove_prerequisite),
        )
        .route(
            "/enrollments/{id}/credits/recompute",
            post(enrollment::recompute_credits),
        )
        .route(
            "/enrolled-courses/{id}/status",
            put(enrollment::change_status),
        )
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()))
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Running axum on {bind_address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
