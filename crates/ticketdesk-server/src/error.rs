use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use ticketdesk_orders::OrderSourceError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Recurso no encontrado
    #[error("{error}")]
    NotFound { error: String },

    /// La fuente de pedidos no esta disponible
    #[error("{message}: {details}")]
    ServiceUnavailable { message: String, details: String },

    /// Error interno
    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Order lookup miss.
    pub fn order_not_found() -> Self {
        AppError::NotFound {
            error: "Order not found".to_string(),
        }
    }

    /// The cache is empty and the upstream could not be loaded.
    pub fn upstream_unavailable(err: &OrderSourceError) -> Self {
        AppError::ServiceUnavailable {
            message: "Unable to load orders from the upstream source. Please check configuration."
                .to_string(),
            details: err.to_string(),
        }
    }

    /// Unexpected failure while handling a request.
    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::NotFound { error } => ErrorResponse {
                success: false,
                error,
                message: None,
                details: None,
            },
            AppError::ServiceUnavailable { message, details } => ErrorResponse {
                success: false,
                error: "Order source unavailable".to_string(),
                message: Some(message),
                details: Some(details),
            },
            AppError::Internal { message, details } => ErrorResponse {
                success: false,
                error: details,
                message: Some(message),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
