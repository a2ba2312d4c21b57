use std::collections::HashMap;
use utoipa::ToSchema;

pub mod models;

#[derive(serde::Serialize, serde::Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PublicErrorType {
    InternalServerError,

    Unauthorized,
    NotFound,
    Conflict,

    Validation,

    #[serde(other)]
    Unknown,
}

impl Into<&'static str> for &PublicErrorType {
    fn into(self) -> &'static str {
        match self {
            PublicErrorType::InternalServerError => "internal-server-error",
            PublicErrorType::Unauthorized => "unauthorized",
            PublicErrorType::NotFound => "not-found",
            PublicErrorType::Conflict => "conflict",
            PublicErrorType::Validation => "validation-error",
            PublicErrorType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Debug for PublicErrorType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s: &'static str = self.into();
        write!(f, "{}", s)
    }
}

impl std::fmt::Display for PublicErrorType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s: &'static str = self.into();
        write!(f, "{}", s)
    }
}

/// Error body shared by the jobs plugin and consumed by the world client.
///
/// `existing_id` is the structured replacement for recovering an existing
/// pipeline id out of a conflict response; `message` splitting is kept as a
/// fallback for servers that only send the human-readable form.
#[derive(serde::Serialize, serde::Deserialize, ToSchema, Debug)]
#[serde(rename_all = "snake_case")]
pub struct ErrorResponse {
    pub error: PublicErrorType,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<HashMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn internal() -> Self {
        Self {
            error: PublicErrorType::InternalServerError,
            message: None,
            existing_id: None,
            validation: None,
        }
    }

    pub fn from_public_error(
        error: PublicErrorType,
        message: Option<String>,
    ) -> Self {
        Self {
            error,
            message,
            existing_id: None,
            validation: None,
        }
    }

    /// Recover the id of an already-existing pipeline from a conflict body.
    ///
    /// Prefers the structured `existing_id` field; falls back to splitting a
    /// `"Pipeline already exists: <id>"` message on `": "`.
    pub fn existing_pipeline_id(&self) -> Option<String> {
        if let Some(id) = &self.existing_id {
            return Some(id.clone());
        }

        self.message
            .as_ref()?
            .splitn(2, ": ")
            .nth(1)
            .map(str::to_string)
    }
}
