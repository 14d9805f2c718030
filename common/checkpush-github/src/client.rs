//! GitHub client implementation

/// Public GitHub REST endpoint, used when `GITHUB_API_URL` is not provided
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

pub(crate) const USER_AGENT: &str = concat!("checkpush/", env!("CARGO_PKG_VERSION"));

/// GitHub API client for making optionally authenticated requests
pub struct GitHubClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_base: String,
    pub(crate) token: Option<String>,
}

impl GitHubClient {
    /// Create a client against the public API with an optional token
    pub fn new(token: Option<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    /// Create a client against a specific API root (GitHub Enterprise or a test server)
    pub fn with_api_base(api_base: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new(None)
    }
}
