use actix_web::ResponseError;
use std::collections::HashMap;

use ratchet_core::{ErrorResponse, PublicErrorType};

pub mod app;
pub mod datastore;
pub mod routes;

pub use app::register;
pub use datastore::{Datastore, MemoryDatastore};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("job does not exist: {0}")]
    JobNotFound(i64),

    #[error("datastore error: {0:?}")]
    Datastore(#[from] datastore::DatastoreError),

    #[error("validation errors found")]
    ValidationErrors(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn to_error_response(&self) -> ErrorResponse {
        tracing::error!("Handling error: {:?}", self);
        match self {
            Error::ValidationErrors(err) => {
                let mut validation = HashMap::new();

                for (field, errors) in err.field_errors().iter() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            if let Some(message) = &e.message {
                                message.to_string()
                            } else {
                                format!("validation error on {}", field)
                            }
                        })
                        .collect();
                    validation.insert(field.to_string(), messages);
                }

                ErrorResponse {
                    error: PublicErrorType::Validation,
                    message: Some("Validation errors found".to_string()),
                    existing_id: None,
                    validation: Some(validation),
                }
            },
            Error::JobNotFound(id) => {
                ErrorResponse::from_public_error(
                    PublicErrorType::NotFound,
                    Some(format!("Job does not exist: {id}")),
                )
            },
            _ => ErrorResponse::internal(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            Error::ValidationErrors(_) => actix_web::http::StatusCode::BAD_REQUEST,
            Error::JobNotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            Error::Datastore(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse<actix_web::body::BoxBody> {
        let response = self.to_error_response();
        actix_web::HttpResponse::build(self.status_code()).json(response)
    }
}
