use serde::Serialize;

use crate::challenge::ChallengeKind;

/// Observable, transient orchestrator state for the presentation layer.
///
/// Rebuilt fresh on every process start and mutated only by the
/// orchestrator; the UI renders it and never writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorState {
    /// A gateway round-trip is in flight.
    pub is_loading: bool,
    /// Failure of the last login phase, if any.
    pub error: Option<String>,
    /// A second-factor challenge is awaiting a code.
    pub challenge_open: bool,
    /// Which challenge is presented while `challenge_open`.
    pub challenge_kind: Option<ChallengeKind>,
    /// Failure of the last challenge phase, if any.
    pub challenge_error: Option<String>,
}

/// Position of the login flow between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlowState {
    Idle,
    AttemptingLogin,
    ChallengePending,
    VerifyingChallenge,
    Authenticated,
}

/// What a [`perform_login`](super::AuthOrchestrator::perform_login) call
/// amounted to. Every variant is also reflected in the observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum LoginOutcome {
    /// The session is committed.
    Authenticated,
    /// A challenge is now open; submit a code next.
    ChallengeRequired(ChallengeKind),
    /// The attempt ended; `error` in the observable state says why.
    Failed,
    /// The call was not permitted: a session is already authenticated and
    /// must be logged out first. No state changed.
    Rejected,
    /// A newer attempt (or a cancellation) took over while this call was in
    /// flight; its response was discarded.
    Superseded,
}

/// What a [`submit_challenge`](super::AuthOrchestrator::submit_challenge)
/// call amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ChallengeOutcome {
    /// The code verified and the re-login committed the session.
    Authenticated,
    /// The challenge stays open; `challenge_error` says what to fix and the
    /// attempt's credentials remain resident for the next try.
    Retry,
    /// The attempt ended fatally; `error` says why.
    Failed,
    /// No challenge was open, or a verification was already in flight. No
    /// state changed.
    Rejected,
    /// The attempt was cancelled or superseded while the call was in flight;
    /// its response was discarded.
    Superseded,
}
