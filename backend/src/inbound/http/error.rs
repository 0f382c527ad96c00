//! HTTP adapter mapping for domain errors.
//!
//! The domain [`Error`] stays transport agnostic; this module turns it into
//! a JSON response with a matching status code and `trace-id` header. It
//! also replaces actix's plain-text extractor failures (bad JSON, bad query
//! strings) with the same envelope.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Strip internal and dependency failures down to a generic message.
/// Their real cause is logged, never returned.
fn redact(error: &Error) -> Error {
    let public = match error.code() {
        ErrorCode::InvalidRequest
        | ErrorCode::Unauthorized
        | ErrorCode::Forbidden
        | ErrorCode::NotFound
        | ErrorCode::Conflict => return error.clone(),
        ErrorCode::ServiceUnavailable => {
            Error::service_unavailable("Service temporarily unavailable")
        }
        ErrorCode::InternalError => Error::internal("Internal server error"),
    };
    match error.trace_id() {
        Some(id) => public.with_trace_id(id),
        None => public,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.code(), message = self.message(), "request failed");
        }
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn json_payload_error(err: &JsonPayloadError) -> Error {
    match err {
        JsonPayloadError::ContentType => Error::invalid_request("request body must be JSON")
            .with_details(json!({ "code": "unsupported_content_type" })),
        JsonPayloadError::Overflow { limit }
        | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            Error::invalid_request(format!("request body exceeds {limit} bytes"))
                .with_details(json!({ "code": "payload_too_large" }))
        }
        other => Error::invalid_request(format!("malformed JSON body: {other}"))
            .with_details(json!({ "code": "malformed_json" })),
    }
}

/// JSON extractor configuration answering malformed bodies with the
/// standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| json_payload_error(&err).into())
}

/// Query extractor configuration answering malformed query strings with the
/// standard error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        Error::invalid_request(format!("malformed query string: {err}"))
            .with_details(json!({ "code": "malformed_query" }))
            .into()
    })
}
