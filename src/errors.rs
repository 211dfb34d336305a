use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let msg = e.to_string();
        match e {
            DomainError::CustomerNotFound
            | DomainError::NoProductsFound
            | DomainError::ProductNotFound(_)
            | DomainError::OrderNotFound => AppError::NotFound(msg),
            DomainError::InsufficientStock { .. } | DomainError::InvalidInput(_) => {
                AppError::BadRequest(msg)
            }
            DomainError::StockConflict(_)
            | DomainError::EmailInUse(_)
            | DomainError::ProductNameInUse(_) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Internal(msg) => {
                log::error!("Request failed: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": self.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Order not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn lookup_failures_map_to_not_found() {
        for e in [
            DomainError::CustomerNotFound,
            DomainError::NoProductsFound,
            DomainError::ProductNotFound(Uuid::nil()),
            DomainError::OrderNotFound,
        ] {
            let app_err: AppError = e.into();
            assert!(matches!(app_err, AppError::NotFound(_)));
        }
    }

    #[test]
    fn insufficient_stock_maps_to_bad_request_with_message() {
        let app_err: AppError = DomainError::InsufficientStock {
            product_id: Uuid::nil(),
            requested: 15,
        }
        .into();

        assert_eq!(app_err.status_code(), StatusCode::BAD_REQUEST);
        assert!(app_err.to_string().contains("The quantity 15 is not available"));
    }

    #[test]
    fn conflicts_map_to_409() {
        for e in [
            DomainError::StockConflict(Uuid::nil()),
            DomainError::EmailInUse("a@b.c".to_string()),
            DomainError::ProductNameInUse("Keyboard".to_string()),
        ] {
            let app_err: AppError = e.into();
            assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(ref m) if m == "oops"));
    }
}
