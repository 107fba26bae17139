use std::time::Duration;

use reqwest::Url;

use crate::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_USERNAME: &str = "test-user";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);
pub const DEFAULT_MIN_LIFETIME: Duration = Duration::from_secs(1);

/// What to probe and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub base_url: String,
    pub username: String,

    /// Longest wait for the response headers or for the next piece of body.
    pub timeout: Duration,

    /// How long a stream may go without a non-blank line before it is
    /// considered stuck.
    pub grace: Duration,

    /// Streams closed by the server sooner than this count as failures.
    pub min_lifetime: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            username: DEFAULT_USERNAME.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            grace: DEFAULT_GRACE,
            min_lifetime: DEFAULT_MIN_LIFETIME,
        }
    }
}

impl ProbeConfig {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// `{base_url}/events?username={username}`, with the username encoded as
    /// a query value.
    pub fn endpoint(&self) -> Result<Url, Error> {
        let base = self.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/events", base))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("username", &self.username);
        Ok(url)
    }
}
