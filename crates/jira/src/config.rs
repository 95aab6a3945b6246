//! Connection settings for [`crate::JiraClient`].

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use crate::JiraError;

/// Dev-status application type queried when none is configured.
pub const DEFAULT_DEV_STATUS_APPLICATION: &str = "bitbucket";

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the client needs to reach a Jira Cloud site.
///
/// The API token is held as a [`SecretString`] and never appears in `Debug`
/// output or logs.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Site host name, e.g. `acme.atlassian.net`.
    pub host: String,

    /// Account e-mail used for basic authentication.
    pub username: String,

    /// API token paired with `username`.
    pub api_token: SecretString,

    /// Overrides the `https://{host}/` base URL (tests, proxies, Jira behind a
    /// path prefix).
    pub base_url: Option<Url>,

    /// Dev-status integration whose branches are read (e.g. `"bitbucket"`,
    /// `"GitHub"`).
    pub dev_status_application: String,

    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl JiraConfig {
    /// Creates a configuration with default base URL, dev-status application
    /// and timeout.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        api_token: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            api_token,
            base_url: None,
            dev_status_application: DEFAULT_DEV_STATUS_APPLICATION.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub fn with_dev_status_application(mut self, application: impl Into<String>) -> Self {
        self.dev_status_application = application.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Resolves the base URL every API path is joined onto. The returned URL
    /// always ends in `/` so that joining keeps any path prefix.
    ///
    /// # Errors
    ///
    /// [`JiraError::InvalidConfig`] if the host is blank or does not form a
    /// valid URL, or the override cannot carry a path.
    pub fn resolved_base_url(&self) -> Result<Url, JiraError> {
        let mut url = match &self.base_url {
            Some(url) => url.clone(),
            None => {
                let host = self.host.trim().trim_end_matches('/');
                if host.is_empty() {
                    return Err(JiraError::InvalidConfig {
                        message: "Jira host must not be empty".to_string(),
                    });
                }
                let raw = if host.contains("://") {
                    format!("{host}/")
                } else {
                    format!("https://{host}/")
                };
                Url::parse(&raw).map_err(|e| JiraError::InvalidConfig {
                    message: format!("invalid Jira host '{host}': {e}"),
                })?
            }
        };

        if url.cannot_be_a_base() {
            return Err(JiraError::InvalidConfig {
                message: format!("'{url}' cannot be used as a base URL"),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> JiraConfig {
        JiraConfig::new(host, "me@example.com", SecretString::new("token".into()))
    }

    #[test]
    fn base_url_defaults_to_https_host() {
        let url = config("acme.atlassian.net").resolved_base_url().unwrap();
        assert_eq!(url.as_str(), "https://acme.atlassian.net/");
    }

    #[test]
    fn blank_host_is_rejected() {
        assert!(matches!(
            config("  ").resolved_base_url(),
            Err(JiraError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn override_keeps_its_path_prefix() {
        let cfg = config("ignored").with_base_url(Url::parse("http://proxy.local/jira").unwrap());
        let url = cfg.resolved_base_url().unwrap();
        assert_eq!(
            url.join("rest/api/2/status").unwrap().as_str(),
            "http://proxy.local/jira/rest/api/2/status"
        );
    }

    #[test]
    fn debug_output_hides_the_token() {
        let cfg = JiraConfig::new("h", "u", SecretString::new("super-secret".into()));
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }
}
