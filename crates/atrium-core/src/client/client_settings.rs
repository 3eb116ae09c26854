use serde::{Deserialize, Serialize};

/// Basic client behavior settings. These settings specify the target service
/// and identification of the Atrium client. They are optional and uneditable
/// once the client is initialized.
///
/// Defaults to
///
/// ```
/// # use atrium_core::ClientSettings;
/// let settings = ClientSettings {
///     api_url: "https://api.atrium.chat/1".to_string(),
///     user_agent: "Atrium Rust-SDK".to_string(),
/// };
/// let default = ClientSettings::default();
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientSettings {
    /// The base url of the targeted Atrium API. Defaults to `https://api.atrium.chat/1`
    pub api_url: String,
    /// The user_agent sent with every request. Defaults to `Atrium Rust-SDK`
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.atrium.chat/1".into(),
            user_agent: "Atrium Rust-SDK".into(),
        }
    }
}
