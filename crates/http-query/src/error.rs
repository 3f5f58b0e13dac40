// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::StatusCode;
use thiserror::Error;

/// A request-level failure. Every variant maps to an HTTP status code (and possibly extra headers).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpQueryError {
    #[error("GraphQL only supports GET and POST requests.")]
    MethodNotAllowed,

    #[error("Batch GraphQL requests are not enabled.")]
    BatchingDisabled,

    #[error("Received an empty list in the batch request.")]
    EmptyBatch,

    #[error("{0}")]
    MalformedPayload(String),

    #[error("Variables are invalid JSON.")]
    InvalidVariablesJson,

    #[error("POST body sent invalid JSON.")]
    InvalidJsonBody,

    #[error("POST body is not valid UTF-8.")]
    InvalidUtf8Body,

    #[error("{0}")]
    Execution(#[from] ExecutionError),
}

impl HttpQueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpQueryError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            HttpQueryError::BatchingDisabled
            | HttpQueryError::EmptyBatch
            | HttpQueryError::MalformedPayload(_)
            | HttpQueryError::InvalidVariablesJson
            | HttpQueryError::InvalidJsonBody
            | HttpQueryError::InvalidUtf8Body => StatusCode::BAD_REQUEST,
            HttpQueryError::Execution(error) => error.status_code,
        }
    }

    /// Headers that must accompany the error response
    pub fn headers(&self) -> Vec<(String, String)> {
        match self {
            HttpQueryError::MethodNotAllowed => {
                vec![(http::header::ALLOW.to_string(), "GET, POST".to_string())]
            }
            HttpQueryError::Execution(error) => error.headers.clone(),
            _ => vec![],
        }
    }
}

/// A recoverable failure reported by the execution engine for a single operation.
///
/// Depending on the [`ErrorPolicy`](crate::ErrorPolicy), it either aborts the whole request or
/// turns into an absent result for the entry that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExecutionError {
    pub status_code: StatusCode,
    pub message: String,
    pub headers: Vec<(String, String)>,
}

impl ExecutionError {
    pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            headers: vec![],
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            HttpQueryError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );

        for error in [
            HttpQueryError::BatchingDisabled,
            HttpQueryError::EmptyBatch,
            HttpQueryError::MalformedPayload("null".into()),
            HttpQueryError::InvalidVariablesJson,
            HttpQueryError::InvalidJsonBody,
            HttpQueryError::InvalidUtf8Body,
        ] {
            assert_eq!(error.status_code(), StatusCode::BAD_REQUEST, "{error}");
            assert!(error.headers().is_empty());
        }
    }

    #[test]
    fn method_not_allowed_carries_allow_header() {
        assert_eq!(
            HttpQueryError::MethodNotAllowed.headers(),
            vec![("allow".to_string(), "GET, POST".to_string())]
        );
    }

    #[test]
    fn execution_error_passes_through_status_and_headers() {
        let error: HttpQueryError = ExecutionError::new(StatusCode::METHOD_NOT_ALLOWED, "nope")
            .with_header("Allow", "POST")
            .into();

        assert_eq!(error.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error.to_string(), "nope");
        assert_eq!(
            error.headers(),
            vec![("Allow".to_string(), "POST".to_string())]
        );
    }
}
