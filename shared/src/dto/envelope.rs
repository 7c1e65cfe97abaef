//! # Response Envelope
//!
//! Every gateway endpoint wraps its payload in the same envelope:
//!
//! ```text
//! {
//!   "success": true,
//!   "statusCode": 200,
//!   "message": "Balance retrieved",
//!   "data": { ... },
//!   "timestamp": "2024-05-01T10:00:00.000Z",
//!   "pagination": { "page": 1, "limit": 20, "total": 57, "pages": 3 }
//! }
//! ```
//!
//! `pagination` is only present on list endpoints. Failed calls carry
//! `success: false`, a human-readable `message` and usually no `data`.

use serde::{Deserialize, Serialize};

/// Uniform response envelope returned by every gateway call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            status_code: 200,
            message: String::new(),
            data: Some(data),
            timestamp: chrono::Utc::now().to_rfc3339(),
            pagination: None,
        }
    }

    /// Failed envelope with a server message and no payload.
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            pagination: None,
        }
    }

    /// Attach a pagination block (list endpoints).
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Convert the payload, keeping status, message and pagination.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiEnvelope<U> {
        ApiEnvelope {
            success: self.success,
            status_code: self.status_code,
            message: self.message,
            data: self.data.map(f),
            timestamp: self.timestamp,
            pagination: self.pagination,
        }
    }

    /// Unwrap the payload of a successful envelope.
    ///
    /// Returns the server message as the error when `success` is false or the
    /// payload is missing. The message may be empty; callers pick their own
    /// fallback text.
    pub fn into_payload(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.message),
        }
    }

    /// Like [`into_payload`](Self::into_payload) for endpoints whose payload is
    /// irrelevant (logout, withdraw). Only `success` is checked.
    pub fn into_ack(self) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self.message)
        }
    }
}

impl<T> ApiEnvelope<Vec<T>> {
    /// Split a successful list envelope into items and pagination.
    ///
    /// A missing pagination block is treated as a single page holding every
    /// returned item.
    pub fn into_page(self) -> Result<Page<T>, String> {
        let pagination = self.pagination;
        let items = self.into_payload()?;
        let pagination = pagination.unwrap_or_else(|| Pagination::single(items.len() as u32));
        Ok(Page { items, pagination })
    }
}

/// Pagination block of list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

impl Pagination {
    pub fn single(total: u32) -> Self {
        Self {
            page: 1,
            limit: total,
            total,
            pages: 1,
        }
    }

    /// True while pages beyond `page` remain.
    pub fn has_more(&self) -> bool {
        self.page < self.pages
    }
}

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope_without_data_deserializes() {
        let json = r#"{"success":false,"statusCode":401,"message":"Invalid credentials","timestamp":"2024-05-01T10:00:00Z"}"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(json).unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.status_code, 401);
        assert_eq!(envelope.into_payload(), Err("Invalid credentials".to_string()));
    }

    #[test]
    fn test_success_without_data_is_not_a_payload() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success":true,"message":"done"}"#).unwrap();
        assert_eq!(envelope.clone().into_ack(), Ok(()));
        assert_eq!(envelope.into_payload(), Err("done".to_string()));
    }

    #[test]
    fn test_into_page_reads_pagination() {
        let json = r#"{
            "success": true,
            "statusCode": 200,
            "message": "",
            "data": [1, 2, 3],
            "timestamp": "",
            "pagination": { "page": 2, "limit": 3, "total": 9, "pages": 3 }
        }"#;
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        let page = envelope.into_page().unwrap();

        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.pagination.page, 2);
        assert!(page.pagination.has_more());
    }

    #[test]
    fn test_into_page_without_pagination_is_single_page() {
        let page = ApiEnvelope::ok(vec!["a", "b"]).into_page().unwrap();
        assert_eq!(page.pagination, Pagination::single(2));
        assert!(!page.pagination.has_more());
    }
}
