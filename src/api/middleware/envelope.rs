//! Error envelope middleware
//!
//! `ApiError::into_response` stashes its body in the response extensions;
//! this layer rewrites it with the request path filled in, so every error
//! response carries the `{error, code, details?, timestamp, path}` shape.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::types::ErrorBody;

pub async fn error_envelope(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    if let Some(mut body) = response.extensions_mut().remove::<ErrorBody>() {
        body.path = path;
        return (response.status(), Json(body)).into_response();
    }

    response
}
