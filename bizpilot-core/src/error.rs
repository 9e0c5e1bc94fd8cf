use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// API error taxonomy.
///
/// Every failure a handler can produce maps to exactly one of these
/// variants. Store failures carry full diagnostic detail for the logs but
/// are surfaced to the caller as a generic message so internals never leak.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No authenticated tenant identity was present on the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// A required field was missing or invalid. Carries the offending
    /// field names so the caller knows exactly what to fix.
    #[error("missing or invalid field(s): {}", .0.join(", "))]
    Validation(Vec<String>),

    /// An invoice with this identifier already exists for the tenant.
    /// Produced when two concurrent creations race on the same sequence
    /// number and the second writer hits the uniqueness constraint.
    #[error("an invoice with id {0} already exists")]
    DuplicateInvoiceId(String),

    /// The backing store could not be reached or rejected the operation.
    #[error(transparent)]
    Store(#[from] sqlx::Error),

    /// Anything else that went wrong server-side.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Builds a `Validation` error from a list of missing field names.
    pub fn missing_fields(fields: &[&str]) -> Self {
        ApiError::Validation(fields.iter().map(|f| f.to_string()).collect())
    }

    /// True when the underlying sqlx error is a Postgres unique violation.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(
            err,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::DuplicateInvoiceId(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Store(e) => {
                tracing::error!("store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error".to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("internal error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error".to_string())
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
