use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Kind};

const NOT_FOUND_MESSAGE: &str =
    "Order book not found for this market (upstream returned 404); check the tokenId";
const MALFORMED_ORDER_MESSAGE: &str =
    "Order could not be built: a required order value was missing or malformed";

/// Body of every order-endpoint response.
#[non_exhaustive]
#[derive(Clone, Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }
}

impl Envelope<()> {
    #[must_use]
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// An [`Error`] rendered as a failure envelope.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            Kind::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to callers.
    ///
    /// Upstream failures mentioning `404` or the `toString` serialization
    /// symptom are replaced with clearer text; everything else passes through.
    #[must_use]
    pub fn message(&self) -> String {
        let message = self.0.to_string();

        match self.0.kind() {
            Kind::Validation | Kind::MarketNotFound | Kind::CredentialDerivation => message,
            _ if message.contains("404") => NOT_FOUND_MESSAGE.to_owned(),
            _ if message.contains("toString") => MALFORMED_ORDER_MESSAGE.to_owned(),
            _ => message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, kind = ?self.0.kind(), "order request failed");
        } else {
            tracing::debug!(error = %self.0, "order request rejected");
        }

        (status, Envelope::failure(self.message())).into_response()
    }
}
