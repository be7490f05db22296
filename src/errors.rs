use crate::webhook::whatsapp::models::MessageResult;
use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};

/// Errors returned by the JSON endpoints.
///
/// Rendered as a `{"success": false, "message": ...}` envelope.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    #[display("Invalid request format")]
    InvalidRequestFormat,
    #[display("Both 'to' and 'message' fields are required")]
    MissingRequiredFields,
    /// Readable body that is not a webhook payload
    #[display("{_0}")]
    InvalidPayload(#[error(not(source))] String),
    /// Failure talking to WhatsApp, exposed as is to the caller
    #[display("{_0}")]
    ExternalServiceError(#[error(not(source))] String),
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);

        web::HttpResponse::build(self.status_code()).json(&MessageResult::failed(self.to_string()))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ApiError::InvalidRequestFormat
            | ApiError::MissingRequiredFields
            | ApiError::InvalidPayload(_) => http::StatusCode::BAD_REQUEST,
            ApiError::ExternalServiceError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
