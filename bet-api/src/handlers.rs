//! HTTP handlers and routes

use crate::error::ApiError;
use crate::models::{
    BalanceResponse, PlaceBetRequest, PlaceBetResponse, SettleEventRequest, SettleEventResponse,
};
use actix_web::{web, HttpResponse};
use bet_ledger::{BetStatus, EventId, UserId};
use bet_settlement::SettlementEngine;
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "bet-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Place a bet
pub async fn place_bet(
    engine: web::Data<Arc<SettlementEngine>>,
    request: web::Json<PlaceBetRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let bet_id = engine
        .place_bet(
            UserId::new(request.user_id.clone()),
            EventId::new(request.event_id.clone()),
            request.odds,
            request.amount,
        )
        .await?;

    Ok(HttpResponse::Created().json(PlaceBetResponse {
        bet_id,
        user_id: request.user_id,
        event_id: request.event_id,
        odds: request.odds,
        amount: request.amount,
        status: BetStatus::Placed,
    }))
}

/// Settle every pending bet of an event
pub async fn settle_event(
    engine: web::Data<Arc<SettlementEngine>>,
    request: web::Json<SettleEventRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let report = engine
        .settle_event(EventId::new(request.event_id.clone()), request.outcome)
        .await?;

    Ok(HttpResponse::Ok().json(SettleEventResponse {
        event_id: request.event_id,
        settled: report.results.len(),
        failed: report.failed,
        results: report.results,
    }))
}

/// Read a user's balance, creating the user on first reference
pub async fn get_balance(
    engine: web::Data<Arc<SettlementEngine>>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user_id.into_inner();
    let balance = engine.user_balance(UserId::new(user_id.clone())).await?;

    Ok(HttpResponse::Ok().json(BalanceResponse { user_id, balance }))
}

/// Prometheus metrics endpoint
pub async fn metrics_endpoint(engine: web::Data<Arc<SettlementEngine>>) -> HttpResponse {
    match engine.metrics().export() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Failed to gather metrics",
            "details": e.to_string()
        })),
    }
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/bet/place", web::post().to(place_bet))
            .route("/bet/settle", web::put().to(settle_event))
            .route("/user/balance/{user_id}", web::get().to(get_balance)),
    )
    .route("/health", web::get().to(health_check))
    .route("/metrics", web::get().to(metrics_endpoint));
}
