mod config;
mod error;
mod routes;
mod storage;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::GatewayConfig;
use routes::configure_routes;
use std::env;
use storage::s3_service::S3Service;

fn cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = GatewayConfig::load().map_err(|e| {
        log::error!("Invalid gateway configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let frontend_dir = config.frontend_dir();
    let s3_service = S3Service::connect(&config.storage).await;
    log::info!(
        "Issuing upload URLs for bucket {} via {}",
        s3_service.bucket_name(),
        config.storage.endpoint_url.as_deref().unwrap_or("AWS S3")
    );

    let bind_address = config.bind_address();
    let allowed_origins = config.server.allowed_origins.clone();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .app_data(web::Data::new(s3_service.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
