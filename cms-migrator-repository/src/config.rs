//! Configuration types for the HTTP collaborators.

/// Connection settings for one API instance.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, including the project path for v8 instances
    /// (e.g. "http://localhost:8080/_").
    pub base_url: String,
    /// Static access token sent as a bearer token.
    ///
    /// `None` sends unauthenticated requests.
    pub token: Option<String>,
}

impl ApiConfig {
    /// Create a config without a token.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Attach a static access token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
