//! Unified error handling for the admin service.
//!
//! Same shape as the storefront's error type, plus the role gate
//! (`Forbidden`) and order-lifecycle rejections.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use pampa_core::store::{AuthError, StoreError};
use pampa_core::types::OrderStatus;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No admin session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but not an admin account.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The order lifecycle does not allow this transition.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::InvalidTransition { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Internal(_) | Self::Auth(AuthError::Provider(_)) => {
                "Error interno del servidor".to_owned()
            }
            Self::Auth(_) => "Credenciales inválidas".to_owned(),
            Self::NotFound(what) => format!("No encontrado: {what}"),
            Self::Unauthorized(_) => "Iniciá sesión para continuar".to_owned(),
            Self::Forbidden(_) => "Acceso restringido a administradores".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
            Self::InvalidTransition { from, to } => {
                format!("transición inválida: {} a {}", from.label(), to.label())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Store(_) | Self::Internal(_) | Self::Auth(AuthError::Provider(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status_code();
        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Forbidden("role".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Unauthorized("session".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_transition_message_in_spanish() {
        let err = AppError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Shipped,
        };
        assert_eq!(
            err.client_message(),
            "transición inválida: cancelado a enviado"
        );
    }
}
