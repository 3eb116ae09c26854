//! The durable, restart-surviving record of "who is logged in".

mod identity;
mod store;

pub use identity::Identity;
pub use store::{SessionError, SessionStore};

use atrium_state::register_repository_item;
use serde::{Deserialize, Serialize};

/// The session record. Only the identity and the authenticated flag are ever
/// persisted; credentials and one-time codes have no representation here.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Identity of the authenticated account, if any.
    pub user: Option<Identity>,
    /// Whether the account is currently authenticated.
    pub authenticated: bool,
}

register_repository_item!(Session, "auth_storage");
