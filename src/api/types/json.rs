//! Custom JSON extractor that returns errors as JSON

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use mime_guess::mime;
use serde::de::DeserializeOwned;

use super::error::ApiErrorResponse;

/// Body used when a request carries no JSON at all
const EMPTY_OBJECT: &[u8] = b"{}";

/// JSON extractor that reports rejections as `{"error": ...}`
///
/// A request without a JSON content type, or with an empty body, is read as
/// `{}` so the handler's own required-field checks produce the error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// JSON rejection error that returns API error format
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: self.message,
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return parse_body(EMPTY_OBJECT);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| JsonRejection {
                status: err.status(),
                message: format!("Failed to read request body: {}", err.body_text()),
            })?;

        if bytes.is_empty() {
            return parse_body(EMPTY_OBJECT);
        }

        parse_body(&bytes)
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
    else {
        return false;
    };

    content_type.type_() == "application"
        && (content_type.subtype() == "json"
            || content_type.suffix().is_some_and(|suffix| suffix == "json"))
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<Json<T>, JsonRejection> {
    AxumJson::<T>::from_bytes(bytes)
        .map(|AxumJson(value)| Json(value))
        .map_err(|rejection| JsonRejection {
            status: StatusCode::BAD_REQUEST,
            message: format_rejection_message(&rejection),
        })
}

/// Format the rejection message to be more user-friendly
fn format_rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => {
            // Extract the serde error message which contains field info
            let msg = err.body_text();
            format!("Invalid JSON data: {}", msg)
        }
        JsonSyntaxError(err) => {
            format!("Invalid JSON syntax: {}", err.body_text())
        }
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
