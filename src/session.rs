use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A verified identity produced by a provider's `authorize` step.
///
/// A session is an open-ended record with one mandatory field: a stable
/// unique identifier. Any additional fields the host attaches are carried
/// through the token untouched. Sessions are never mutated by this crate
/// after creation; they are destroyed implicitly when their token is
/// discarded or expires.
///
/// # Examples
///
/// ```rust
/// use orange_auth::Session;
///
/// let session = Session::new("u1").with("name", "Ferris");
/// assert_eq!(session.id, "u1");
/// assert_eq!(session.get("name").and_then(|v| v.as_str()), Some("Ferris"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Stable unique identifier of the user this session belongs to.
    pub id: String,

    /// Host-defined session fields beyond the identifier.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Session {
    /// Creates a session for the given user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Map::new(),
        }
    }

    /// Returns the session with an additional field attached.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Gets a non-identifier session field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
