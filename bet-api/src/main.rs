use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use bet_api::config::ApiConfig;
use bet_api::handlers;
use bet_ledger::RedisStore;
use bet_settlement::SettlementEngine;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;
    let ledger_config = config.ledger_config().map_err(anyhow::Error::msg)?;

    let store = RedisStore::connect(&config.redis.url)
        .await
        .context("Failed to connect to Redis")?;
    let engine = Arc::new(SettlementEngine::new(Arc::new(store), ledger_config));

    info!(
        "Starting bet-api on {}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(web::Data::new(engine.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
