//! Request-shape failures raised before a handler runs.

use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::envelope::Envelope;
use crate::application::error::ErrorReport;

#[derive(Debug)]
pub struct RequestError {
    status: StatusCode,
    message: &'static str,
    detail: String,
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for RequestError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid request body",
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for RequestError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid query parameters",
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let mut response = Envelope::<()>::failure(self.status, self.message).into_response();
        ErrorReport::from_message("infra::http::request", self.status, self.detail)
            .attach(&mut response);
        response
    }
}

/// JSON body whose rejections render as envelopes.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(RequestError))]
pub struct JsonBody<T>(pub T);

/// Query string whose rejections render as envelopes.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(RequestError))]
pub struct QueryParams<T>(pub T);
