use crate::client::client_settings::ClientSettings;

/// Shared state behind a [`Client`](crate::Client) handle.
#[derive(Debug)]
pub struct InternalClient {
    pub(crate) settings: ClientSettings,
    pub(crate) http_client: reqwest::Client,
}

impl InternalClient {
    /// Base url of the targeted API, without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.settings.api_url.trim_end_matches('/')
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.settings.user_agent
    }

    /// The configured HTTP client. Carries the default headers and the cookie
    /// store that keeps the service's session cookie between calls.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }
}
