use std::sync::Arc;

use atrium_core::Client;
use atrium_state::repository::Repository;

use crate::gateway::ApiGateway;
use crate::orchestrator::AuthOrchestrator;
use crate::session::{Session, SessionStore};

/// Subclient containing authentication functionality.
#[derive(Clone)]
pub struct AuthClient {
    pub(crate) client: Client,
}

impl AuthClient {
    /// Constructs a new `AuthClient` over the given `Client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The HTTP gateway bound to this client's configuration.
    pub fn gateway(&self) -> ApiGateway {
        ApiGateway::new(self.client.clone())
    }

    /// Builds a fully wired orchestrator: rehydrates the session store from
    /// `repository`, then connects it to this client's gateway.
    ///
    /// This is the one place construction order matters: the store is
    /// rehydrated before anything can observe it.
    pub async fn orchestrator(&self, repository: Arc<dyn Repository<Session>>) -> AuthOrchestrator {
        let sessions = SessionStore::initialize(repository).await;
        AuthOrchestrator::new(Arc::new(self.gateway()), sessions)
    }
}

/// Extension trait for `Client` to provide access to the `AuthClient`.
pub trait ClientAuthExt {
    /// Creates a new `AuthClient` instance.
    fn auth(&self) -> AuthClient;
}

impl ClientAuthExt for Client {
    fn auth(&self) -> AuthClient {
        AuthClient::new(self.clone())
    }
}
