//! Error types for the Payletter client.

use http::StatusCode;
use payletter_proto::ProtocolError;

/// Errors that can occur while talking to the gateway.
///
/// Variants carry a `context` naming the operation (e.g. `"POST /v1.0/payments/autopay"`)
/// so that logs identify the failing call without the request body.
#[derive(Debug, thiserror::Error)]
pub enum PayletterError {
    /// Endpoint URL construction failed.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// HTTP transport error.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Failed to read the response body.
    #[error("Failed to read response body as text: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not the expected JSON document.
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        /// Human-readable context.
        context: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Non-success HTTP status without a gateway error envelope.
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },

    /// The gateway rejected the request.
    #[error("[{code}]{message}")]
    Gateway {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// Gateway error code.
        code: String,
        /// Gateway error message.
        message: String,
    },

    /// An API key cannot be sent as an HTTP header value.
    #[error("invalid header value: {context}: {source}")]
    InvalidHeader {
        /// Human-readable context.
        context: &'static str,
        /// The underlying header error.
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// Protocol-level error (callback verification, JSON).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Returned by [`MockGateway::failing`](crate::mock::MockGateway::failing).
    #[error("mock gateway configured to fail")]
    Mock,
}

impl PayletterError {
    /// Returns the gateway error code, if the gateway rejected the request.
    #[must_use]
    pub fn gateway_code(&self) -> Option<&str> {
        match self {
            Self::Gateway { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Gateway { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display_matches_gateway_format() {
        let err = PayletterError::Gateway {
            context: "POST /v1.0/payments/autopay",
            status: StatusCode::BAD_REQUEST,
            code: "2002".into(),
            message: "invalid billkey".into(),
        };
        assert_eq!(err.to_string(), "[2002]invalid billkey");
        assert_eq!(err.gateway_code(), Some("2002"));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_non_gateway_errors_have_no_code() {
        assert_eq!(PayletterError::Mock.gateway_code(), None);
        assert_eq!(PayletterError::MissingConfig("PAYLETTER_CLIENT_ID").status(), None);
    }
}
