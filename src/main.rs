use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use invoice_generator::api::{configure_routes, ApiState, AppConfig};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    tracing::info!("Starting Invoice Generator API");

    // Initialize Prometheus metrics
    prometheus::default_registry()
        .register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

    // Load configuration
    let config = load_config()?;

    // Initialize application state
    let state = web::Data::new(ApiState::new(config)?);

    // Get server settings
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse::<u16>()?;

    tracing::info!("Starting server on {}:{}", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let defaults = AppConfig::default();

    let config = AppConfig {
        work_dir: env::var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.work_dir),
        counter_file: env::var("COUNTER_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.counter_file),
        pdf_binary: env::var("PDF_BINARY").unwrap_or(defaults.pdf_binary),
        conversion_timeout_ms: env::var("CONVERSION_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse()?,
        max_payload_size_bytes: env::var("MAX_PAYLOAD_SIZE_BYTES")
            .unwrap_or_else(|_| "1048576".to_string())
            .parse()?,
        max_logo_size_bytes: env::var("MAX_LOGO_SIZE_BYTES")
            .unwrap_or_else(|_| "1048576".to_string())
            .parse()?,
    };

    Ok(config)
}
