use axum::http::{header, HeaderMap};
use cookie::Cookie;

use crate::{config::AuthConfig, session::Session};

/// The session and raw token read back from a request's cookie header.
///
/// Both fields are `None` for an anonymous request (no cookie). A present
/// token with a `None` session means the cookie carried a token the
/// strategy did not accept.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ResolvedSession {
    pub(crate) session: Option<Session>,
    pub(crate) token: Option<String>,
}

/// Finds the session cookie's token value among the request headers.
fn cookie_token(config: &AuthConfig, headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == config.cookie_name())
        .map(|cookie| cookie.value().to_owned())
}

/// Resolves the current session from a request's headers.
///
/// An absent cookie is the anonymous case, not an error. Whatever the
/// strategy makes of the token is propagated alongside the raw token
/// string. Read-only and idempotent; safe to call repeatedly per request.
pub(crate) async fn resolve_session(config: &AuthConfig, headers: &HeaderMap) -> ResolvedSession {
    let Some(token) = cookie_token(config, headers) else {
        return ResolvedSession::default();
    };

    ResolvedSession {
        session: config.strategy().deserialize(&token, config).await,
        token: Some(token),
    }
}
