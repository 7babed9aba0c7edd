use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions};
use products_pipeline::PipelineError;
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::LimitExceeded(_) => "LIMIT_EXCEEDED",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "internal API error");
        Self::Internal(Arc::new(err))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn limit(message: impl Into<String>) -> Self {
        Self::LimitExceeded(message.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<PipelineError> for ApiError {
    fn from(value: PipelineError) -> Self {
        if value.is_validation() {
            Self::InvalidInput(value.to_string())
        } else {
            Self::internal(value.into())
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if matches!(self, ApiError::InvalidInput(_) | ApiError::LimitExceeded(_)) {
            err = err.extend_with(|_err, e| {
                e.set("type", "BAD_REQUEST");
            });
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;

    fn code_of(err: &Error) -> Option<Value> {
        err.extensions
            .as_ref()
            .and_then(|map| map.get("code"))
            .cloned()
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = internal_error(anyhow::anyhow!("boom"));
        assert_eq!(err.message, "internal server error");
        assert_eq!(code_of(&err), Some(Value::from("INTERNAL")));
    }

    #[test]
    fn pipeline_validation_maps_to_invalid_input() {
        let err = ApiError::from(PipelineError::NegativeCount(-3)).extend();
        assert_eq!(
            err.message,
            "bad request: deal count must be non-negative, got -3"
        );
        assert_eq!(code_of(&err), Some(Value::from("INVALID_INPUT")));
    }

    #[test]
    fn distribution_failures_are_internal() {
        let err = ApiError::from(PipelineError::Distribution("bad weights".into())).extend();
        assert_eq!(err.message, "internal server error");
    }

    #[test]
    fn limit_errors_carry_their_code() {
        let err = ApiError::limit("dealCount cannot exceed 2000").extend();
        assert_eq!(code_of(&err), Some(Value::from("LIMIT_EXCEEDED")));
    }
}
