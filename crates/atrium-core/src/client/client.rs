use std::sync::Arc;

use reqwest::header::{self, HeaderValue};

use super::internal::InternalClient;
use crate::client::client_settings::ClientSettings;

/// The main struct to interact with the Atrium SDK.
#[derive(Debug, Clone)]
pub struct Client {
    // Important: The [`Client`] struct requires its `Clone` implementation to
    // return an owned reference to the same instance, so the subclients can
    // all share one HTTP client and cookie store. Any mutable state must live
    // behind the `Arc` as part of [`InternalClient`].
    #[doc(hidden)]
    pub internal: Arc<InternalClient>,
}

impl Client {
    /// Create a new Atrium client with the given settings, or the defaults
    /// when `None`.
    pub fn new(settings: Option<ClientSettings>) -> Self {
        let settings = settings.unwrap_or_default();

        let headers = build_default_headers(&settings);

        let http_client = new_http_client_builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .expect("HTTP client build should not fail");

        Self {
            internal: Arc::new(InternalClient {
                settings,
                http_client,
            }),
        }
    }
}

fn new_http_client_builder() -> reqwest::ClientBuilder {
    use rustls::ClientConfig;
    use rustls_platform_verifier::ConfigVerifierExt;

    #[allow(unused_mut)]
    let mut client_builder = reqwest::Client::builder().use_preconfigured_tls(
        ClientConfig::with_platform_verifier().expect("Failed to create platform verifier"),
    );

    // Enforce HTTPS for all requests in non-debug builds
    #[cfg(not(debug_assertions))]
    {
        client_builder = client_builder.https_only(true);
    }

    client_builder
}

/// Build default headers for the Atrium HTTP client.
fn build_default_headers(settings: &ClientSettings) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();

    headers.append(
        header::USER_AGENT,
        HeaderValue::from_str(&settings.user_agent)
            .expect("User agent should be a valid header value"),
    );

    // The service rejects requests without an explicit charset.
    headers.append(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json;charset=utf-8"),
    );

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_with_defaults() {
        let client = Client::new(None);

        assert_eq!(client.internal.api_url(), "https://api.atrium.chat/1");
        assert_eq!(client.internal.user_agent(), "Atrium Rust-SDK");
    }

    #[test]
    fn test_api_url_trailing_slash_is_stripped() {
        let client = Client::new(Some(ClientSettings {
            api_url: "http://localhost:8080/api/".into(),
            user_agent: "Atrium Rust-SDK [TEST]".into(),
        }));

        assert_eq!(client.internal.api_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_clones_share_the_same_instance() {
        let client = Client::new(None);
        let clone = client.clone();

        assert!(Arc::ptr_eq(&client.internal, &clone.internal));
    }

    #[test]
    fn test_settings_deserialize_camel_case() {
        let settings: ClientSettings = serde_json::from_str(
            r#"{"apiUrl": "http://localhost:9000/1", "userAgent": "test-agent"}"#,
        )
        .expect("settings should deserialize");

        assert_eq!(settings.api_url, "http://localhost:9000/1");
        assert_eq!(settings.user_agent, "test-agent");
    }
}
