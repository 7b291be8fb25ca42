use async_trait::async_trait;
use axum::extract::Request;

use crate::{config::AuthConfig, session::Session};

/// A successful login: the verified session and the token minted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedIn {
    /// The session produced by the provider's authorization step.
    pub session: Session,

    /// The opaque token carrying that session.
    pub token: String,
}

/// A provider turns request credentials into a verified [`Session`].
///
/// Each provider carries a stable identifier used to route
/// `POST <base_path>/login/<id>` requests to it. Multiple instances of the
/// same provider type may coexist as long as their identifiers differ.
///
/// `log_in` returns:
///
/// - `Ok(Some(_))`: credentials were accepted and a token was minted,
/// - `Ok(None)`: a designed rejection (unsupported content type, unknown
///   credentials, a vetoed or failed token mint),
/// - `Err(_)`: a request-level error such as a malformed body; the
///   orchestrator collapses it to a 400 at the boundary.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The identifier this provider is routed by.
    fn id(&self) -> &str;

    /// Runs the provider's login flow for the given request.
    async fn log_in(
        &self,
        req: Request,
        config: &AuthConfig,
    ) -> crate::Result<Option<LoggedIn>>;
}
