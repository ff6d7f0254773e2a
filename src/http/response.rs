//! Conversion of relay results into HTTP responses.
//!
//! Engine responses go back with their status, content type and body. Proxy
//! failures become a server-error status with a short GraphQL-style error
//! body; nothing partial is ever streamed.

use axum::{
    body::Body,
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::proxy::{Forwarded, ProxyError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub message: String,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Serialize)]
pub struct ErrorExtensions {
    pub code: &'static str,
}

impl From<&ProxyError> for ErrorBody {
    fn from(err: &ProxyError) -> Self {
        Self {
            errors: vec![ErrorEntry {
                message: err.to_string(),
                extensions: ErrorExtensions { code: err.kind() },
            }],
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(ErrorBody::from(&self))).into_response()
    }
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> axum::response::Response {
        let mut builder = Response::builder().status(self.status);
        if let Some(content_type) = self.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        match builder.body(Body::from(self.body)) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build relayed response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use std::time::Duration;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_proxy_error_body() {
        let err = ProxyError::UpstreamUnavailable {
            attempts: 500,
            waited: Duration::from_millis(4990),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["extensions"]["code"], "upstream_unavailable");
        assert!(json["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("500 attempts"));
    }

    #[tokio::test]
    async fn test_forwarded_keeps_status_and_content_type() {
        let forwarded = Forwarded {
            status: StatusCode::OK,
            content_type: Some("application/graphql-response+json".parse().unwrap()),
            body: Bytes::from_static(br#"{"data":null}"#),
            retries: 4,
            waited: Duration::from_millis(40),
        };
        let response = forwarded.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/graphql-response+json"
        );
        assert_eq!(body_json(response).await, serde_json::json!({ "data": null }));
    }
}
