use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Build status lifecycle as reported by the builds endpoint.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    Created,
    Queued,
    Running,
    Success,
    Failure,
    Aborted,
    Unstable,
}

impl BuildStatus {
    /// Whether the build has not yet reached a terminal state.
    pub fn is_pending(&self) -> bool {
        matches!(self, BuildStatus::Queued | BuildStatus::Running)
    }
}

/// An execution instance of a pipeline job
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: i64,
    /// Job this build was triggered for
    pub job_id: Option<i64>,
    pub status: BuildStatus,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Enabled,
    Disabled,
}

/// A job belonging to a pipeline
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    /// Pipeline this job belongs to
    pub pipeline_id: i64,
    /// Job name as defined in the pipeline configuration
    pub name: String,
    pub state: JobState,
    #[serde(default)]
    pub archived: bool,
}

/// A pipeline tracked by the API, created from a repository checkout URL
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: i64,
    pub checkout_url: Option<String>,
}

/// Body of the auth-token endpoint response
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// Bearer token for subsequent API calls
    pub token: SecretString,
}

/// Request body for creating a pipeline
#[derive(Serialize, Deserialize, ToSchema, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineRequest {
    /// Repository checkout URL, e.g. `git@github.com:org/repo.git#master`
    #[validate(length(min = 1))]
    pub checkout_url: String,
}

/// Request body for updating a job; absent fields are left unchanged
#[derive(Serialize, Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub state: Option<JobState>,
    pub archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_status_wire_format() {
        let build: Build =
            serde_json::from_str(r#"{"id":77,"jobId":3,"status":"RUNNING"}"#).unwrap();
        assert_eq!(build.job_id, Some(3));
        assert!(build.status.is_pending());

        let done: BuildStatus = serde_json::from_str(r#""SUCCESS""#).unwrap();
        assert!(!done.is_pending());
    }

    #[test]
    fn job_archived_defaults_to_false() {
        let job: Job = serde_json::from_str(
            r#"{"id":1,"pipelineId":2,"name":"main","state":"ENABLED"}"#,
        )
        .unwrap();
        assert!(!job.archived);
    }
}
