//! The remote authentication service boundary.
//!
//! The orchestrator consumes the service exclusively through [`AuthGateway`];
//! [`ApiGateway`] is the production HTTP implementation. Tests substitute
//! scripted implementations of the trait.

mod api;
mod api_gateway;

pub use api_gateway::ApiGateway;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::Credentials;
use crate::challenge::ChallengeKind;
use crate::session::Identity;

/// Failure reported while talking to the authentication service.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error("received error message from server: [{}] {}", .status, .message)]
    ResponseContent { status: StatusCode, message: String },
}

/// Outcome of a login round-trip.
///
/// An explicit tagged variant: handling both arms is enforced at every call
/// site instead of being inferred from the presence of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginResult {
    /// The service resolved the account; authentication is complete.
    ResolvedIdentity(Identity),
    /// The account exists but the listed second factors are outstanding.
    FactorsOutstanding(Vec<String>),
}

/// Outcome of a challenge verification round-trip.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    /// Whether the submitted code was accepted.
    pub verified: bool,
}

/// The remote authentication service, treated as an opaque capability.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Authenticates with primary credentials.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResult, GatewayError>;

    /// Verifies a one-time code for the given challenge kind. Relies on the
    /// service-side state established by the preceding [`login`](Self::login).
    async fn verify_challenge(
        &self,
        kind: ChallengeKind,
        code: &str,
    ) -> Result<VerifyResult, GatewayError>;
}
