use std::{net::SocketAddr, sync::Arc};

use axum::http::{HeaderValue, Method, header};
use log::info;
use migration::{EscapeRoomMigrator, FestivalMigrator, MigratorTrait};
use models::clock::EventClock;
use notify::Notifier;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().expect("invalid configuration");

    let festival = database::db::connect(&config.festival_database_url)
        .await
        .expect("failed to connect to the festival store");
    let escaperoom = database::db::connect(&config.escaperoom_database_url)
        .await
        .expect("failed to connect to the escape-room store");

    FestivalMigrator::up(&festival, None)
        .await
        .expect("festival migrations failed");
    EscapeRoomMigrator::up(&escaperoom, None)
        .await
        .expect("escape-room migrations failed");
    info!("database migrations applied");

    let state = AppState {
        festival,
        escaperoom,
        notifier: Arc::new(Notifier::new(config.notify.clone())),
        clock: EventClock::guayaquil(),
    };

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .expect("invalid CORS origin");
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = routes::router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", doc::ApiDoc::openapi()))
        .layer(cors)
        .layer(CompressionLayer::new());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    info!("Running axum on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown::shutdown_signal())
        .await
        .expect("server error");
}
