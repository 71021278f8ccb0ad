//! Success response wrapper

use serde::{Deserialize, Serialize};

/// Code carried by every successful response
pub const SUCCESS_CODE: &str = "0000";

/// Standard API success envelope: `{status, code, data}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status code of the response
    pub status: u16,

    /// Application result code, always [`SUCCESS_CODE`]
    pub code: String,

    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap `data` for a response with the given status
    pub fn new(status: u16, data: T) -> Self {
        Self {
            status,
            code: SUCCESS_CODE.to_string(),
            data: Some(data),
        }
    }

    /// 200 OK envelope
    pub fn ok(data: T) -> Self {
        Self::new(200, data)
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
