//! Functional-test world for driving a remote pipeline API.
//!
//! One [`World`] is constructed per scenario and discarded at scenario end.
//! Helper calls mutate the world's session state (token, pipeline id, job
//! ids) which later steps read back; scenarios run sequentially so no state
//! is shared between worlds.

use secrecy::{ExposeSecret, SecretString};

use ratchet_core::ErrorResponse;
use ratchet_core::models::{Build, CreatePipelineRequest, Job, Pipeline, TokenResponse};

pub mod config;

pub use config::WorldConfig;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no token held (obtain a JWT before authenticated calls)")]
    NoAuth,
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Validation errors: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("unexpected status {status} from {context}: {body}")]
    UnexpectedStatus {
        context: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("conflict body carried no recoverable pipeline id: {message:?}")]
    MissingExistingId { message: Option<String> },
    #[error("pipeline {pipeline_id} has fewer than two jobs")]
    TooFewJobs { pipeline_id: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Resolve after the given number of seconds.
pub async fn wait(seconds: u64) {
    tokio::time::sleep(std::time::Duration::from_secs(seconds)).await;
}

/// Per-scenario context wrapping authenticated access to the pipeline API.
pub struct World {
    config: WorldConfig,
    base_url: url::Url,
    http: reqwest::Client,

    // Session state, unset until the corresponding call has completed.
    pub jwt: Option<SecretString>,
    pub pipeline_id: Option<String>,
    pub job_id: Option<i64>,
    pub second_job_id: Option<i64>,
    pub third_job_id: Option<i64>,
    pub last_job_id: Option<i64>,
    pub login_response: Option<TokenResponse>,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self> {
        use validator::Validate;

        config.validate()?;

        let base_url = url::Url::parse(&config.instance())?;
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            config,
            base_url,
            http,
            jwt: None,
            pipeline_id: None,
            job_id: None,
            second_job_id: None,
            third_job_id: None,
            last_job_id: None,
            login_response: None,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(WorldConfig::from_env()?)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    fn url(
        &self,
        path: &str,
    ) -> Result<url::Url> {
        Ok(self
            .base_url
            .join(&format!("{}/{}", self.config.namespace, path))?)
    }

    /// Exchange an access key for a JWT at the auth-token endpoint.
    ///
    /// No retry; any transport or HTTP failure propagates to the caller.
    pub async fn get_jwt(
        &self,
        access_key: &SecretString,
    ) -> Result<TokenResponse> {
        let mut url = self.url("auth/token")?;
        url.query_pairs_mut()
            .append_pair("access_key", access_key.expose_secret());

        tracing::debug!("requesting jwt from {}", url.path());

        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                context: "auth/token",
                status,
                body: resp.text().await.unwrap_or_default(),
            });
        }

        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    /// Log the current token out, then re-authenticate and store the response.
    ///
    /// Used to validate re-authentication flows; the actual login happens
    /// through [`World::get_jwt`].
    pub async fn login_with_token(
        &mut self,
        access_key: &SecretString,
    ) -> Result<()> {
        let jwt = self.jwt.as_ref().ok_or(Error::NoAuth)?;

        let url = self.url("auth/logout")?;
        self.http
            .post(url)
            .bearer_auth(jwt.expose_secret())
            .send()
            .await?;

        let response = self.get_jwt(access_key).await?;
        self.login_response = Some(response);

        Ok(())
    }

    /// Poll the build-status endpoint until the build leaves QUEUED/RUNNING.
    ///
    /// At most `build_poll_attempts` requests are issued, with
    /// `build_poll_delay` between them. Transport errors are retried; a
    /// still-pending build after the last attempt is returned as-is, which
    /// callers cannot distinguish from completion without checking the
    /// status themselves.
    pub async fn wait_for_build(
        &self,
        build_id: i64,
    ) -> Result<Build> {
        let url = self.url(&format!("builds/{build_id}"))?;

        for attempt in 1..self.config.build_poll_attempts {
            match self.fetch_build(&url).await {
                Ok(build) if !build.status.is_pending() => return Ok(build),
                Ok(build) => {
                    tracing::debug!(build = build.id, status = ?build.status, attempt, "build still pending");
                },
                Err(Error::Reqwest(err)) => {
                    tracing::debug!(attempt, "build poll transport error: {err}");
                },
                Err(err) => return Err(err),
            }

            tokio::time::sleep(self.config.build_poll_delay()).await;
        }

        self.fetch_build(&url).await
    }

    async fn fetch_build(
        &self,
        url: &url::Url,
    ) -> Result<Build> {
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                context: "builds",
                status,
                body: resp.text().await.unwrap_or_default(),
            });
        }

        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    /// Ensure a pipeline exists for the given repository, and record its jobs.
    ///
    /// Accepts 201 (created) or 409 (already exists) from the creation
    /// endpoint; on conflict the existing pipeline's id is recovered from the
    /// error body. Any other status is an error. The first, second, third
    /// (when present) and last job ids are stored for later steps.
    pub async fn ensure_pipeline_exists(
        &mut self,
        repo_name: &str,
    ) -> Result<()> {
        let token = self
            .get_jwt(&self.config.access_key)
            .await?
            .token;
        self.jwt = Some(token.clone());

        let url = self.url("pipelines")?;
        let body = CreatePipelineRequest {
            checkout_url: self.config.checkout_url(repo_name),
        };

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await?;
        let status = resp.status();

        let pipeline_id = match status {
            reqwest::StatusCode::CREATED => {
                let pipeline: Pipeline = serde_json::from_slice(&resp.bytes().await?)?;
                pipeline.id.to_string()
            },
            reqwest::StatusCode::CONFLICT => {
                let conflict: ErrorResponse = serde_json::from_slice(&resp.bytes().await?)?;
                conflict
                    .existing_pipeline_id()
                    .ok_or(Error::MissingExistingId {
                        message: conflict.message,
                    })?
            },
            _ => {
                return Err(Error::UnexpectedStatus {
                    context: "pipelines",
                    status,
                    body: resp.text().await.unwrap_or_default(),
                });
            },
        };

        tracing::info!("pipeline {pipeline_id} ready for {repo_name}");
        self.pipeline_id = Some(pipeline_id.clone());

        let url = self.url(&format!("pipelines/{pipeline_id}/jobs"))?;
        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if status != reqwest::StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                context: "pipelines/jobs",
                status,
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let jobs: Vec<Job> = serde_json::from_slice(&resp.bytes().await?)?;
        let (Some(first), Some(second)) = (jobs.first(), jobs.get(1)) else {
            return Err(Error::TooFewJobs { pipeline_id });
        };

        self.job_id = Some(first.id);
        self.second_job_id = Some(second.id);
        self.third_job_id = jobs.get(2).map(|job| job.id);
        self.last_job_id = jobs.last().map(|job| job.id);

        Ok(())
    }
}
