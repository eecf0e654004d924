//! Error types for the epilogue data provider.
//!
//! # Design
//! The adapter itself raises only contract errors (an operation it does not
//! map, a list response it cannot paginate, params of the wrong shape).
//! Everything the transport reports is wrapped once in `Transport` and
//! otherwise passed through untouched; nothing here is retried or recovered.

use thiserror::Error;

use crate::types::OperationKind;

/// Name of the header carrying the list total.
pub const CONTENT_RANGE: &str = "Content-Range";

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors returned by `DataProvider` and the request/response mappers.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// An operation kind the mapper does not handle.
    #[error("Unsupported fetch action type {kind}")]
    UnsupportedOperation { kind: String },

    /// A list-shaped response came back without the pagination header.
    #[error(
        "The {header} header is missing in the HTTP Response for resource '{resource}'. \
         Responses for lists of resources must contain this header with the total number \
         of results to build the pagination. If you are using CORS, did you declare \
         {header} in the Access-Control-Expose-Headers header? \
         Example {header} value: items 0-9/100"
    )]
    MissingPaginationHeader {
        header: &'static str,
        resource: String,
    },

    /// The pagination header has no numeric total after its last `/`.
    #[error("Cannot read a total from {header} value '{value}' for resource '{resource}'")]
    InvalidPaginationHeader {
        header: &'static str,
        resource: String,
        value: String,
    },

    /// Caller params do not match the shape the operation expects.
    #[error("Invalid params for {kind}: {reason}")]
    InvalidParams { kind: OperationKind, reason: String },

    /// The record payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors surfaced by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_message_names_header_resource_and_cors() {
        let err = AdapterError::MissingPaginationHeader {
            header: CONTENT_RANGE,
            resource: "posts".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Content-Range"));
        assert!(msg.contains("'posts'"));
        assert!(msg.contains("Access-Control-Expose-Headers"));
        assert!(msg.contains("items 0-9/100"));
    }

    #[test]
    fn unsupported_operation_names_kind() {
        let err = AdapterError::UnsupportedOperation {
            kind: "GET_EVERYTHING".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported fetch action type GET_EVERYTHING");
    }

    #[test]
    fn transport_error_passes_through_display() {
        let err: AdapterError = TransportError::Status {
            status: 404,
            message: "Not Found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        match err {
            AdapterError::Transport(inner) => assert_eq!(inner.status(), Some(404)),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
