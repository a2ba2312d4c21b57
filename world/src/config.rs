use secrecy::SecretString;
use serde::Deserialize;
use validator::Validate;

/// Name of the optional env file loaded before reading the environment.
pub const ENV_FILE: &str = ".func_config";

fn default_protocol() -> String {
    "https".into()
}

fn default_namespace() -> String {
    "v4".into()
}

fn default_build_poll_attempts() -> u32 {
    10
}

fn default_build_poll_delay_secs() -> u64 {
    5
}

/// Configuration for a functional-test world.
///
/// Constructed explicitly and handed to [`crate::World::new`]; `from_env` is
/// the convenience loader reading the same variables the scenarios have
/// always used (`ACCESS_KEY`, `SD_API`, `TEST_ORG`, ...), layered over an
/// optional `.func_config` file.
#[derive(Deserialize, Debug, Validate)]
pub struct WorldConfig {
    /// Access key exchanged for a JWT at the auth-token endpoint
    pub access_key: SecretString,

    /// SCM token, held for scenarios that exercise checkout credentials
    pub git_token: Option<SecretString>,

    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Host of the pipeline API instance under test
    #[validate(length(min = 1))]
    pub sd_api: String,

    /// Organization owning the repositories scenarios create pipelines from
    #[validate(length(min = 1))]
    pub test_org: String,

    #[validate(length(min = 1))]
    pub test_username: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Upper bound on build-status poll requests
    #[serde(default = "default_build_poll_attempts")]
    #[validate(range(min = 1))]
    pub build_poll_attempts: u32,

    #[serde(default = "default_build_poll_delay_secs")]
    pub build_poll_delay_secs: u64,
}

impl WorldConfig {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::from_filename(ENV_FILE).ok();

        let this: Self = ::config::Config::builder()
            .add_source(::config::Environment::default())
            .build()?
            .try_deserialize()?;

        this.validate()?;

        Ok(this)
    }

    /// Base URL of the instance under test, e.g. `https://api.ratchet.cd`
    pub fn instance(&self) -> String {
        format!("{}://{}", self.protocol, self.sd_api)
    }

    /// Checkout URL pipelines are created from, keyed by repository name
    pub fn checkout_url(
        &self,
        repo_name: &str,
    ) -> String {
        format!("git@github.com:{}/{}.git#master", self.test_org, repo_name)
    }

    pub fn build_poll_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.build_poll_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorldConfig {
        WorldConfig {
            access_key: SecretString::from("key"),
            git_token: None,
            protocol: default_protocol(),
            sd_api: "api.ratchet.test".to_string(),
            test_org: "ratchet-test".to_string(),
            test_username: "sd-buser".to_string(),
            namespace: default_namespace(),
            build_poll_attempts: default_build_poll_attempts(),
            build_poll_delay_secs: default_build_poll_delay_secs(),
        }
    }

    #[test]
    fn instance_joins_protocol_and_host() {
        assert_eq!(config().instance(), "https://api.ratchet.test");
    }

    #[test]
    fn checkout_url_is_keyed_by_repo_name() {
        assert_eq!(
            config().checkout_url("func-repo"),
            "git@github.com:ratchet-test/func-repo.git#master"
        );
    }

    #[test]
    fn empty_host_fails_validation() {
        let mut c = config();
        c.sd_api = String::new();
        assert!(c.validate().is_err());
    }
}
