//! The authentication state machine.
//!
//! Sequences credential submission, challenge presentation, code
//! verification and session establishment, and owns every transient secret
//! for the duration of an in-flight attempt. The whole flow, including the
//! re-login after a verified challenge, is written as linear asynchronous
//! sequences inside the operations below, so every transition is visible in
//! one place.

mod attempt;
mod state;

pub use state::{ChallengeOutcome, LoginOutcome, OrchestratorState};

use std::sync::{Arc, Mutex, MutexGuard};

use attempt::LoginAttempt;
use state::FlowState;

use crate::capture::Credentials;
use crate::challenge::select_challenge;
use crate::gateway::{AuthGateway, LoginResult, VerifyResult};
use crate::session::{Identity, SessionError, SessionStore};

/// Message stored in `challenge_error` when a submitted code trims to empty.
const EMPTY_CODE: &str = "code must not be empty";
/// Message stored in `challenge_error` when the service rejects a code.
const INVALID_CODE: &str = "the code was not accepted";
/// Message stored in `error` when the service still reports outstanding
/// factors after a successful verification.
const FACTORS_AFTER_VERIFY: &str =
    "service still reports outstanding factors after a verified challenge";

/// Drives a login from credential submission through an optional
/// second-factor challenge to a committed session.
///
/// Every gateway failure is absorbed here and folded into the observable
/// [`OrchestratorState`]; nothing propagates past the orchestrator as an
/// unhandled failure. At most one login attempt is outstanding at a time: a
/// newer `perform_login` supersedes the old attempt (zeroizing its
/// credentials first), and responses belonging to a superseded or cancelled
/// attempt are discarded when they land.
pub struct AuthOrchestrator {
    gateway: Arc<dyn AuthGateway>,
    sessions: SessionStore,
    inner: Mutex<Inner>,
}

struct Inner {
    flow: FlowState,
    attempt: Option<LoginAttempt>,
    state: OrchestratorState,
    /// Bumped whenever the current attempt stops being the current attempt
    /// (supersede, cancel, logout). A gateway response carrying a stale
    /// generation is discarded instead of mutating state.
    generation: u64,
}

impl AuthOrchestrator {
    /// Creates an orchestrator over the given gateway and an already
    /// rehydrated session store.
    pub fn new(gateway: Arc<dyn AuthGateway>, sessions: SessionStore) -> Self {
        let flow = if sessions.snapshot().authenticated {
            FlowState::Authenticated
        } else {
            FlowState::Idle
        };

        Self {
            gateway,
            sessions,
            inner: Mutex::new(Inner {
                flow,
                attempt: None,
                state: OrchestratorState::default(),
                generation: 0,
            }),
        }
    }

    /// The current observable state.
    pub fn state(&self) -> OrchestratorState {
        self.lock().state.clone()
    }

    /// The session store backing this orchestrator.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Submits primary credentials.
    ///
    /// An attempt already outstanding is superseded: its credentials are
    /// dropped before the new ones take over, and its in-flight response, if
    /// any, will be ignored. A call while a session is authenticated is
    /// rejected; `logout` first.
    pub async fn perform_login(&self, credentials: Credentials) -> LoginOutcome {
        let generation = {
            let mut inner = self.lock();
            if inner.flow == FlowState::Authenticated {
                log::debug!("rejecting login while a session is authenticated");
                return LoginOutcome::Rejected;
            }

            let superseding = inner.attempt.take().is_some() || inner.flow != FlowState::Idle;
            if superseding {
                log::debug!("superseding the outstanding login attempt");
            }

            inner.generation += 1;
            inner.flow = FlowState::AttemptingLogin;
            inner.state.is_loading = true;
            inner.state.error = None;
            inner.state.challenge_open = false;
            inner.state.challenge_kind = None;
            inner.state.challenge_error = None;
            inner.generation
        };

        let result = self.gateway.login(&credentials).await;

        // Resolve the synchronous decision under the lock, releasing the guard
        // at the end of this block so the future stays Send across the commit
        // await below. Terminal outcomes return directly; the success path
        // yields the identity to commit.
        let identity = {
            let mut inner = self.lock();
            if inner.generation != generation {
                return LoginOutcome::Superseded;
            }
            inner.state.is_loading = false;

            match result {
                Ok(LoginResult::ResolvedIdentity(identity)) => {
                    // The credentials are no longer needed once an identity is
                    // resolved; zeroize them before the session turns
                    // authenticated.
                    drop(credentials);
                    inner.flow = FlowState::Authenticated;
                    identity
                }
                Ok(LoginResult::FactorsOutstanding(factors)) => {
                    return match select_challenge(&factors) {
                        Ok(kind) => {
                            inner.flow = FlowState::ChallengePending;
                            inner.state.challenge_open = true;
                            inner.state.challenge_kind = Some(kind);
                            // The credentials stay resident: the final re-login
                            // after verification needs them.
                            inner.attempt = Some(LoginAttempt {
                                credentials,
                                challenge: Some(kind),
                            });
                            LoginOutcome::ChallengeRequired(kind)
                        }
                        Err(error) => {
                            log::error!(
                                "login reported factors this client cannot present: {error}"
                            );
                            inner.flow = FlowState::Idle;
                            inner.state.error = Some(error.to_string());
                            LoginOutcome::Failed
                        }
                    };
                }
                Err(error) => {
                    log::error!("login failed: {error}");
                    inner.flow = FlowState::Idle;
                    inner.state.error = Some(error.to_string());
                    return LoginOutcome::Failed;
                }
            }
        };

        if self.commit_session(generation, identity).await {
            LoginOutcome::Authenticated
        } else {
            LoginOutcome::Failed
        }
    }

    /// Submits a one-time code for the open challenge.
    ///
    /// An empty code is refused locally without touching the gateway or the
    /// loading flag. A rejected code (or a gateway failure during the
    /// challenge phase) keeps the challenge open and the attempt's
    /// credentials resident, so the user can retry with a fresh code without
    /// re-entering the password.
    pub async fn submit_challenge(&self, code: &str) -> ChallengeOutcome {
        let code = code.trim();

        let (kind, generation) = {
            let mut inner = self.lock();
            match inner.flow {
                FlowState::ChallengePending => {}
                FlowState::VerifyingChallenge => {
                    log::debug!("rejecting code submission while a verification is in flight");
                    return ChallengeOutcome::Rejected;
                }
                _ => return ChallengeOutcome::Rejected,
            }

            if code.is_empty() {
                inner.state.challenge_error = Some(EMPTY_CODE.to_string());
                return ChallengeOutcome::Retry;
            }

            let Some(kind) = inner.attempt.as_ref().and_then(|attempt| attempt.challenge) else {
                return ChallengeOutcome::Rejected;
            };

            inner.flow = FlowState::VerifyingChallenge;
            inner.state.is_loading = true;
            inner.state.challenge_error = None;
            (kind, inner.generation)
        };

        let verify = self.gateway.verify_challenge(kind, code).await;

        let attempt = {
            let mut inner = self.lock();
            if inner.generation != generation {
                return ChallengeOutcome::Superseded;
            }

            match verify {
                Ok(VerifyResult { verified: true }) => {}
                Ok(_) => {
                    inner.flow = FlowState::ChallengePending;
                    inner.state.is_loading = false;
                    inner.state.challenge_error = Some(INVALID_CODE.to_string());
                    return ChallengeOutcome::Retry;
                }
                Err(error) => {
                    log::error!("challenge verification failed: {error}");
                    inner.flow = FlowState::ChallengePending;
                    inner.state.is_loading = false;
                    inner.state.challenge_error = Some(error.to_string());
                    return ChallengeOutcome::Retry;
                }
            }

            // Verified. Check the attempt out for the re-login round-trip;
            // the second-factor proof is established service-side by the
            // verify call, so the stored credentials are all that is needed.
            let Some(attempt) = inner.attempt.take() else {
                return ChallengeOutcome::Rejected;
            };
            attempt
        };

        log::debug!("challenge verified, repeating login to resolve the identity");
        let result = self.gateway.login(&attempt.credentials).await;

        // As in `perform_login`, resolve the decision under the lock and
        // release the guard at the end of this block so the commit await below
        // keeps the future Send.
        let identity = {
            let mut inner = self.lock();
            if inner.generation != generation {
                return ChallengeOutcome::Superseded;
            }
            inner.state.is_loading = false;

            match result {
                Ok(LoginResult::ResolvedIdentity(identity)) => {
                    drop(attempt);
                    inner.flow = FlowState::Authenticated;
                    inner.state.challenge_open = false;
                    inner.state.challenge_kind = None;
                    inner.state.challenge_error = None;
                    identity
                }
                Ok(LoginResult::FactorsOutstanding(_)) => {
                    // Never loop: a verified challenge must resolve the identity.
                    log::error!("{FACTORS_AFTER_VERIFY}");
                    inner.flow = FlowState::Idle;
                    inner.state.challenge_open = false;
                    inner.state.challenge_kind = None;
                    inner.state.challenge_error = None;
                    inner.state.error = Some(FACTORS_AFTER_VERIFY.to_string());
                    return ChallengeOutcome::Failed;
                }
                Err(error) => {
                    log::error!("re-login after verification failed: {error}");
                    inner.state.challenge_error = Some(error.to_string());
                    inner.flow = FlowState::ChallengePending;
                    inner.attempt = Some(attempt);
                    return ChallengeOutcome::Retry;
                }
            }
        };

        if self.commit_session(generation, identity).await {
            ChallengeOutcome::Authenticated
        } else {
            ChallengeOutcome::Failed
        }
    }

    /// Abandons the open challenge and returns to idle.
    ///
    /// Only local state is touched: the attempt's credentials and code are
    /// discarded, and a verification response still in flight is ignored
    /// when it lands. Any committed session is unaffected.
    pub fn cancel_challenge(&self) {
        let mut inner = self.lock();
        if !matches!(
            inner.flow,
            FlowState::ChallengePending | FlowState::VerifyingChallenge
        ) {
            return;
        }

        inner.attempt = None;
        inner.generation += 1;
        inner.flow = FlowState::Idle;
        inner.state.is_loading = false;
        inner.state.challenge_open = false;
        inner.state.challenge_kind = None;
        inner.state.challenge_error = None;
    }

    /// Destroys the session and clears residual errors. Idempotent; an
    /// in-flight attempt, if any, is discarded as well.
    pub async fn logout(&self) -> Result<(), SessionError> {
        {
            let mut inner = self.lock();
            inner.attempt = None;
            inner.generation += 1;
            inner.flow = FlowState::Idle;
            inner.state = OrchestratorState::default();
        }

        self.sessions.clear().await
    }

    /// Commits `identity` once the machine has settled on success. A policy
    /// refusal fails the attempt; a persistence failure downgrades to a
    /// warning because the in-memory session is already committed.
    async fn commit_session(&self, generation: u64, identity: Identity) -> bool {
        match self.sessions.commit(identity).await {
            Ok(()) => true,
            Err(error @ SessionError::SensitiveField(_)) => {
                log::error!("gateway identity refused by session policy: {error}");
                let mut inner = self.lock();
                if inner.generation == generation {
                    inner.flow = FlowState::Idle;
                    inner.state.error = Some(error.to_string());
                }
                false
            }
            Err(error) => {
                log::warn!("failed to persist session: {error}");
                true
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .expect("orchestrator lock should not be poisoned")
    }
}
