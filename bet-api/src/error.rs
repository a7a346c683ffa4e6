//! HTTP error mapping
//!
//! Translates engine errors into status codes and a uniform JSON error
//! body.

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

/// API-level error
#[derive(Error, Debug)]
pub enum ApiError {
    /// Engine or state-layer failure
    #[error(transparent)]
    Engine(#[from] bet_settlement::Error),
}

impl ApiError {
    fn error_type(&self) -> &str {
        let ApiError::Engine(err) = self;
        match err {
            bet_settlement::Error::InvalidArgument(_) => "invalid_argument",
            bet_settlement::Error::NoSettleableBets(_) => "no_settleable_bets",
            bet_settlement::Error::Ledger(inner) => match inner {
                bet_ledger::Error::UserNotFound(_) => "not_found",
                bet_ledger::Error::InsufficientFunds { .. } => "insufficient_funds",
                bet_ledger::Error::Storage(_) | bet_ledger::Error::Serialization(_) => {
                    "storage_error"
                }
                _ => "internal_error",
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        let ApiError::Engine(err) = self;
        match err {
            bet_settlement::Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            bet_settlement::Error::NoSettleableBets(_) => StatusCode::NOT_FOUND,
            bet_settlement::Error::Ledger(inner) => match inner {
                bet_ledger::Error::UserNotFound(_) => StatusCode::NOT_FOUND,
                bet_ledger::Error::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(json!({
            "error": {
                "code": status_code.as_u16(),
                "message": self.to_string(),
                "type": self.error_type()
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bet_ledger::EventId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_argument_maps_to_400() {
        let err: ApiError = bet_settlement::Error::InvalidArgument("bad odds".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "invalid_argument");
    }

    #[test]
    fn test_insufficient_funds_maps_to_400() {
        let err: ApiError = bet_settlement::Error::Ledger(bet_ledger::Error::InsufficientFunds {
            required: dec!(200),
            available: dec!(100),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "insufficient_funds");
    }

    #[test]
    fn test_no_settleable_bets_maps_to_404() {
        let err: ApiError = bet_settlement::Error::NoSettleableBets(EventId::new("e1")).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_type(), "no_settleable_bets");
    }

    #[test]
    fn test_storage_maps_to_500() {
        let err: ApiError =
            bet_settlement::Error::Ledger(bet_ledger::Error::Storage("down".to_string())).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "storage_error");
    }
}
