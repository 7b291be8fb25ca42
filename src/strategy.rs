use async_trait::async_trait;

use crate::{config::AuthConfig, session::Session};

/// A strategy converts between a verified [`Session`] and the opaque bearer
/// token stored in the client's cookie.
///
/// Strategies must implement:
///
/// 1. [`serialize`](Strategy::serialize), minting a token from a session
///    and,
/// 2. [`deserialize`](Strategy::deserialize), validating a token back into
///    a session.
///
/// Every validation failure (a bad signature, a structurally broken token,
/// an expired timestamp) must resolve uniformly to `None`: callers cannot
/// tell a forged token from an expired one, so neither can an attacker.
///
/// The configuration is passed explicitly on every call; strategies hold no
/// back-reference to it and no per-request state.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use orange_auth::{AuthConfig, Result, Session, Strategy};
///
/// /// Stores the session as plain JSON. Testing only: offers no tamper
/// /// resistance whatsoever.
/// #[derive(Debug, Clone)]
/// struct PlainText;
///
/// #[async_trait]
/// impl Strategy for PlainText {
///     async fn serialize(&self, session: &Session, _config: &AuthConfig) -> Result<String> {
///         Ok(serde_json::to_string(session)?)
///     }
///
///     async fn deserialize(&self, token: &str, _config: &AuthConfig) -> Option<Session> {
///         serde_json::from_str(token).ok()
///     }
/// }
/// ```
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Mints an opaque token carrying the given session.
    ///
    /// Implementations with a pre-serialize hook must fail the whole
    /// operation when the hook vetoes, rather than skipping it silently.
    async fn serialize(&self, session: &Session, config: &AuthConfig) -> crate::Result<String>;

    /// Validates a token and returns the session it carries, or `None` when
    /// the token is not acceptable for any reason.
    async fn deserialize(&self, token: &str, config: &AuthConfig) -> Option<Session>;

    /// Runs the strategy's logout side effect.
    ///
    /// Stateless strategies have nothing to clean up, so the default is a
    /// no-op that always succeeds. Strategies backed by a revocation store
    /// implement their side effects here.
    async fn log_out(&self, config: &AuthConfig) -> crate::Result<()> {
        let _ = config;
        Ok(())
    }
}
