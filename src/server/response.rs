use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::types::response::{CommonResponse, ErrorKind, ResourceResponse};
use crate::validate::FieldError;

pub const AUTHN_ERROR: &str = "Authentication failed";
pub const DATABASE_ERROR: &str = "Database error";
pub const JSON_ERROR: &str = "Encode or decode JSON failed";
pub const ORG_SYNC_ERROR: &str = "Could not verify organization";

/// A wrapper struct for HTTP responses that provides one constructor per
/// error kind, so every handler speaks the same envelope.
pub struct Response {
    http_response: HttpResponse,
}

impl Response {
    /// Row absent, unknown resource, or organization mismatch. The two
    /// latter cases deliberately look identical to a missing row.
    pub fn not_found() -> Self {
        Self::err_response(
            StatusCode::NOT_FOUND,
            ErrorKind::NotFound,
            "Resource not found".to_string(),
            None,
        )
    }

    pub fn bad_request(message: impl AsRef<str>) -> Self {
        let message = format!("Bad request: {}", message.as_ref());
        Self::err_response(StatusCode::BAD_REQUEST, ErrorKind::InvalidInput, message, None)
    }

    pub fn invalid_input(field_errors: Vec<FieldError>) -> Self {
        Self::err_response(
            StatusCode::BAD_REQUEST,
            ErrorKind::InvalidInput,
            "Validation failed".to_string(),
            Some(field_errors),
        )
    }

    pub fn unauthenticated(message: impl AsRef<str>) -> Self {
        let message = format!("Unauthenticated: {}", message.as_ref());
        Self::err_response(StatusCode::UNAUTHORIZED, ErrorKind::Unauthenticated, message, None)
    }

    pub fn no_active_organization() -> Self {
        Self::err_response(
            StatusCode::BAD_REQUEST,
            ErrorKind::NoActiveOrganization,
            "No active organization".to_string(),
            None,
        )
    }

    /// Authorization denied at the type level. The message is generic on
    /// purpose, it never says what was denied.
    pub fn forbidden() -> Self {
        Self::err_response(
            StatusCode::FORBIDDEN,
            ErrorKind::Forbidden,
            "Access denied".to_string(),
            None,
        )
    }

    pub fn conflict(message: impl AsRef<str>) -> Self {
        let message = format!("Conflict: {}", message.as_ref());
        Self::err_response(StatusCode::CONFLICT, ErrorKind::Conflict, message, None)
    }

    pub fn method_not_allowed() -> Self {
        Self::err_response(
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::InvalidInput,
            "Method not allowed".to_string(),
            None,
        )
    }

    pub fn error(message: &str) -> Self {
        let message = format!("Server error: {message}");
        Self::err_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Internal,
            message,
            None,
        )
    }

    pub fn ok() -> Self {
        let resp = CommonResponse {
            code: StatusCode::OK.into(),
            kind: None,
            message: None,
            field_errors: None,
        };
        Self {
            http_response: HttpResponse::Ok().json(resp),
        }
    }

    pub fn json<T: Serialize + DeserializeOwned>(data: T) -> Self {
        let resp = ResourceResponse::<T> {
            code: StatusCode::OK.into(),
            message: None,
            data: Some(data),
        };
        Self {
            http_response: HttpResponse::Ok().json(resp),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.http_response.status()
    }

    fn err_response(
        status: StatusCode,
        kind: ErrorKind,
        message: String,
        field_errors: Option<Vec<FieldError>>,
    ) -> Self {
        let resp = CommonResponse {
            code: status.into(),
            kind: Some(kind),
            message: Some(message),
            field_errors,
        };
        Self {
            http_response: HttpResponseBuilder::new(status).json(resp),
        }
    }
}

impl From<Response> for HttpResponse {
    fn from(val: Response) -> Self {
        val.http_response
    }
}
