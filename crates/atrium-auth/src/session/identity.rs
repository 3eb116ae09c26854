use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque, service-defined profile record returned on successful
/// authentication.
///
/// The core passes identities through without interpreting their contents.
/// The only inspection performed anywhere is the sensitive-field scan in
/// [`SessionStore::commit`](super::SessionStore::commit).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Identity(Map<String, Value>);

impl Identity {
    /// Pass-through accessor for a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the record carries any fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for Identity {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
