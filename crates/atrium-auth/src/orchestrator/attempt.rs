use crate::capture::Credentials;
use crate::challenge::ChallengeKind;

/// Ephemeral correlation of the in-flight credentials and challenge state for
/// one login cycle.
///
/// Lives from the first `perform_login` call until a session is committed or
/// the cycle is cancelled or superseded. Dropping it zeroizes the
/// credentials, however the cycle ends. Never merged: a new cycle always
/// starts a fresh attempt.
#[derive(Debug)]
pub(crate) struct LoginAttempt {
    pub credentials: Credentials,
    pub challenge: Option<ChallengeKind>,
}
