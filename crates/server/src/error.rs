//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is JSON `{"message": ...}` with
//! internal details never exposed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use mesa_core::InvalidTransition;

use crate::db::RepositoryError;
use crate::models::CartError;
use crate::services::CheckoutError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order status transition rejected.
    #[error("Invalid transition: {0}")]
    Transition(#[from] InvalidTransition),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks the required privilege.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(err) => repository_status(err),
            Self::Cart(err) => match err {
                CartError::InvalidQuantity(_) | CartError::QuantityTooLarge(_) => {
                    StatusCode::BAD_REQUEST
                }
                CartError::LineNotFound(_) => StatusCode::NOT_FOUND,
            },
            Self::Checkout(err) => match err {
                CheckoutError::InvalidOrderType(_)
                | CheckoutError::InvalidPaymentMethod(_)
                | CheckoutError::MissingTableNumber
                | CheckoutError::MissingPickupTime
                | CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::ItemUnavailable(_) => StatusCode::NOT_FOUND,
                CheckoutError::CartChanged => StatusCode::CONFLICT,
                CheckoutError::Repository(err) => repository_status(err),
            },
            Self::Transition(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-safe message. Database/internal details stay out of responses.
    fn message(&self) -> String {
        match self {
            Self::Database(err) | Self::Checkout(CheckoutError::Repository(err)) => match err {
                RepositoryError::Timeout(_) => "Service temporarily unavailable".to_string(),
                RepositoryError::NotFound => "Not found".to_string(),
                RepositoryError::Conflict(_) => "Conflicting update, please retry".to_string(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Transition(err) => err.to_string(),
            _ => self.to_string(),
        }
    }

    fn is_server_error(&self) -> bool {
        let status = self.status();
        status == StatusCode::INTERNAL_SERVER_ERROR || status == StatusCode::SERVICE_UNAVAILABLE
    }
}

const fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RepositoryError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(serde_json::json!({ "message": self.message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_core::{ItemId, OrderStatus};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cart_errors_map_to_400_and_404() {
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidQuantity(0))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::QuantityTooLarge(ItemId::new(1)))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::LineNotFound(ItemId::new(1)))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_checkout_errors() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::MissingTableNumber)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::CartChanged)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_invalid_transition_is_conflict() {
        let err = OrderStatus::Canceled
            .transition(OrderStatus::Completed)
            .expect_err("terminal");
        assert_eq!(get_status(AppError::Transition(err)), StatusCode::CONFLICT);
    }

    #[test]
    fn test_repository_timeout_is_503() {
        let err = AppError::Database(RepositoryError::Timeout(sqlx::Error::PoolTimedOut));
        assert_eq!(get_status(err), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_database_details_not_exposed() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "invalid status: junk".to_string(),
        ));
        assert_eq!(err.message(), "Internal server error");
    }
}
