use serde::{Deserialize, Serialize};

/// A second-factor mechanism the service may require before resolving an
/// identity. Always derived from the outstanding-factors list a login
/// reports, never stored on its own.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeKind {
    /// Time-based one-time code from an authenticator app.
    Totp,
    /// One-time code delivered to the account email address.
    EmailOtp,
}
