use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::i18n::{localize, Locale, MessageKey};

pub const CODE_SUCCESS: &str = "SUCCESS";
pub const CODE_4XX: &str = "4XX";
pub const CODE_5XX: &str = "5XX";

/// Envelope shared by every JSON response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseBody<T> {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ResponseBody<T> {
    pub fn success(locale: Locale, data: T) -> Self {
        Self {
            code: CODE_SUCCESS.into(),
            message: localize(MessageKey::Success, locale).into(),
            data: Some(data),
        }
    }
}

/// A non-success reply; the code class follows the status.
#[derive(Debug)]
pub struct ErrorReply {
    pub status: StatusCode,
    pub message: String,
}

impl ErrorReply {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(locale: Locale) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            localize(MessageKey::InternalError, locale),
        )
    }
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        let code = if self.status.is_server_error() {
            CODE_5XX
        } else {
            CODE_4XX
        };
        let body = ResponseBody::<()> {
            code: code.into(),
            message: self.message,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}
