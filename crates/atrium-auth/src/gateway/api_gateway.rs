use atrium_core::Client;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use super::api::{ApiErrorResponse, VerifyCodeRequest};
use super::{AuthGateway, GatewayError, LoginResult, VerifyResult};
use crate::capture::Credentials;
use crate::challenge::ChallengeKind;
use crate::session::Identity;

/// Field the service sets on a login response body when second factors are
/// outstanding. Its absence means the body is the resolved identity.
const FACTORS_FIELD: &str = "requiresTwoFactorAuth";

/// HTTP implementation of [`AuthGateway`] against the Atrium REST API.
///
/// The login call leaves the service's session cookie in the client's cookie
/// store; the verify calls depend on it, so one `ApiGateway` (or clones of
/// the same [`Client`]) must serve a whole login cycle.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
}

impl ApiGateway {
    /// Creates a gateway bound to the given client's HTTP configuration.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.client.internal.api_url(), path)
    }
}

/// Encodes credentials the way the service's Basic authentication expects:
/// percent-encode each part, then base64 the joined pair.
fn encode_basic_credentials(credentials: &Credentials) -> String {
    let username = utf8_percent_encode(credentials.username(), NON_ALPHANUMERIC);
    let password = utf8_percent_encode(credentials.password(), NON_ALPHANUMERIC);
    BASE64_STANDARD.encode(format!("{username}:{password}"))
}

/// Maps a non-2xx response to [`GatewayError::ResponseContent`], preferring
/// the service's error envelope and falling back to the raw body text.
async fn error_from_response(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();

    let message = match serde_json::from_slice::<ApiErrorResponse>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => String::from_utf8_lossy(&body).into_owned(),
    };

    GatewayError::ResponseContent { status, message }
}

#[async_trait]
impl AuthGateway for ApiGateway {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResult, GatewayError> {
        log::info!("attempting login for user: {}", credentials.username());

        let response = self
            .client
            .internal
            .http_client()
            .get(self.endpoint("/auth/user"))
            .header(
                AUTHORIZATION,
                format!("Basic {}", encode_basic_credentials(credentials)),
            )
            .send()
            .await?;

        log::debug!("login response status: {}", response.status());
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mut body: Value = response.json().await?;
        if let Some(factors) = body.get_mut(FACTORS_FIELD) {
            let outstanding: Vec<String> = serde_json::from_value(factors.take())?;
            log::debug!("login reports outstanding factors: {outstanding:?}");
            return Ok(LoginResult::FactorsOutstanding(outstanding));
        }

        let identity: Identity = serde_json::from_value(body)?;
        Ok(LoginResult::ResolvedIdentity(identity))
    }

    async fn verify_challenge(
        &self,
        kind: ChallengeKind,
        code: &str,
    ) -> Result<VerifyResult, GatewayError> {
        let path = match kind {
            ChallengeKind::Totp => "/auth/twofactorauth/totp/verify",
            ChallengeKind::EmailOtp => "/auth/twofactorauth/emailotp/verify",
        };

        let response = self
            .client
            .internal
            .http_client()
            .post(self.endpoint(path))
            .json(&VerifyCodeRequest { code })
            .send()
            .await?;

        log::debug!("verify response status: {}", response.status());
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json::<VerifyResult>().await?)
    }
}
