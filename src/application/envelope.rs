//! Uniform JSON response envelope.
//!
//! Every response body has the shape `{"status": bool, "message": string,
//! "data": {...}}`; `data` is omitted on failures. List payloads nest records
//! under the collection name next to a `pagination` object, item payloads
//! under the singular entity name.

use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::application::pagination::{ListPage, Pagination};
use crate::application::resource::Resource;

pub mod messages {
    pub const FETCHED: &str = "Data fetched successfully";
    pub const CREATED: &str = "Resource created successfully";
    pub const UPDATED: &str = "Resource updated successfully";
    pub const DELETED: &str = "Resource deleted successfully";
    pub const CACHE_CLEARED: &str = "Cache cleared successfully";
    pub const CONTACT_SUBMITTED: &str = "Contact form submitted successfully";
    pub const FRANCHISE_SUBMITTED: &str = "Franchise inquiry submitted successfully";
    pub const SUBSCRIPTION_CREATED: &str = "Subscription created successfully";
    pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
    pub const UNAUTHORIZED: &str = "Unauthorized";
    pub const SERVER_ERROR: &str = "Internal server error";
}

#[derive(Debug, Clone)]
pub struct Envelope<T> {
    status_code: StatusCode,
    status: bool,
    message: Cow<'static, str>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self::success(StatusCode::OK, message, data)
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self::success(StatusCode::CREATED, message, data)
    }

    pub fn success(status_code: StatusCode, message: &'static str, data: T) -> Self {
        Self {
            status_code,
            status: true,
            message: Cow::Borrowed(message),
            data: Some(data),
        }
    }

    /// Success without a payload, e.g. after a delete.
    pub fn message_only(status_code: StatusCode, message: &'static str) -> Self {
        Self {
            status_code,
            status: true,
            message: Cow::Borrowed(message),
            data: None,
        }
    }

    pub fn failure(status_code: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code,
            status: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

#[derive(Serialize)]
struct Body<'a, T> {
    status: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Body {
            status: self.status,
            message: &self.message,
            data: self.data.as_ref(),
        }
        .serialize(serializer)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(&self)).into_response()
    }
}

/// `{"<plural>": [...], "pagination": {...}}`
pub struct ListPayload<R> {
    pub items: Vec<R>,
    pub pagination: Pagination,
}

impl<R> From<ListPage<R>> for ListPayload<R> {
    fn from(page: ListPage<R>) -> Self {
        let pagination = page.pagination();
        Self {
            items: page.items,
            pagination,
        }
    }
}

impl<R: Resource> Serialize for ListPayload<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(R::PLURAL, &self.items)?;
        map.serialize_entry("pagination", &self.pagination)?;
        map.end()
    }
}

/// `{"<plural>": [...]}` without pagination, used by exports.
pub struct ExportPayload<R>(pub Vec<R>);

impl<R: Resource> Serialize for ExportPayload<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(R::PLURAL, &self.0)?;
        map.serialize_entry("total", &self.0.len())?;
        map.end()
    }
}

/// `{"<singular>": {...}}`
pub struct ItemPayload<R>(pub R);

impl<R: Resource> Serialize for ItemPayload<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(R::SINGULAR, &self.0)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn failure_omits_data() {
        let envelope = Envelope::<()>::failure(StatusCode::NOT_FOUND, messages::RESOURCE_NOT_FOUND);
        assert_eq!(
            serde_json::to_value(&envelope).expect("json"),
            json!({"status": false, "message": "Resource not found"})
        );
        assert_eq!(envelope.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn created_envelope_carries_201() {
        let envelope = Envelope::created(messages::CREATED, json!({"id": 1}));
        assert_eq!(envelope.status_code(), StatusCode::CREATED);
        assert_eq!(
            serde_json::to_value(&envelope).expect("json"),
            json!({"status": true, "message": "Resource created successfully", "data": {"id": 1}})
        );
    }
}
