use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use cookie::Cookie;
use serde::Serialize;

use crate::{
    config::{AuthBuilder, AuthConfig, CallbackParams, LoginOutcome},
    cookies,
    provider::Provider,
    resolve::{resolve_session, ResolvedSession},
    session::Session,
};

/// The auth entry point: owns the immutable configuration and exposes the
/// login/logout routes, session lookup and the client-safe configuration.
///
/// Cloning is cheap; all clones share the same configuration.
#[derive(Clone)]
pub struct Auth {
    config: Arc<AuthConfig>,
    base_path: String,
}

/// The non-secret subset of the configuration, safe to hand to a
/// companion front-end client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientConfig {
    /// Path the auth routes are mounted on.
    pub base_path: String,

    /// Name of the session cookie.
    pub cookie_name: String,

    /// Identifiers of the registered providers.
    pub providers: Vec<String>,
}

impl Auth {
    pub(crate) fn new(config: Arc<AuthConfig>, base_path: String) -> Self {
        Self { config, base_path }
    }

    /// Creates a builder for the auth configuration.
    pub fn builder() -> AuthBuilder {
        AuthBuilder::default()
    }

    /// The immutable configuration backing this instance.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Path the auth routes are mounted on.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Builds the router serving `POST <base_path>/:action/:provider`.
    ///
    /// Merge it into the host application's router.
    pub fn router(&self) -> Router {
        let routes = Router::new()
            .route("/:action/:provider", any(handle))
            .with_state(self.clone());

        match self.base_path.trim_end_matches('/') {
            "" => routes,
            base => Router::new().nest(base, routes),
        }
    }

    /// Reads the current session from a request's headers, outside the
    /// action routes. Returns `None` for anonymous requests and for tokens
    /// the strategy rejects.
    pub async fn get_session(&self, headers: &HeaderMap) -> Option<Session> {
        resolve_session(&self.config, headers).await.session
    }

    /// The non-secret configuration for a companion front-end client.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_path: self.base_path.clone(),
            cookie_name: self.config.cookie_name().to_owned(),
            providers: self
                .config
                .providers()
                .iter()
                .map(|provider| provider.id().to_owned())
                .collect(),
        }
    }

    /// Runs the login/logout state machine for an already-routed request.
    #[tracing::instrument(level = "debug", skip(self, req))]
    pub(crate) async fn run(&self, action: &str, provider_id: &str, req: Request) -> Response {
        let Some(provider) = self
            .config
            .providers()
            .iter()
            .find(|provider| provider.id() == provider_id)
            .cloned()
        else {
            return text(StatusCode::NOT_FOUND, "Page not found");
        };

        match action {
            "login" => self.login(provider.as_ref(), req).await,
            "logout" => self.logout(req).await,
            _ => text(StatusCode::NOT_FOUND, "Page not found"),
        }
    }

    async fn login(&self, provider: &dyn Provider, req: Request) -> Response {
        let config = &*self.config;
        let headers = req.headers().clone();

        let logged_in = match provider.log_in(req, config).await {
            Ok(logged_in) => logged_in,
            Err(err) => {
                tracing::debug!(err = %err, "login failed with a request-level error");
                None
            }
        };
        let Some(minted) = logged_in else {
            return empty(StatusCode::BAD_REQUEST);
        };

        // Read the minted token back through the resolver, exactly as a
        // future request would, to get the canonical session/token pair.
        let resolved = match synthetic_cookie_headers(config.cookie_name(), &minted.token) {
            Ok(synthetic) => resolve_session(config, &synthetic).await,
            Err(_) => ResolvedSession::default(),
        };
        let (Some(session), Some(token)) = (resolved.session, resolved.token) else {
            tracing::error!(
                provider = provider.id(),
                "freshly minted token did not resolve to a session; the strategy and provider are mismatched"
            );
            return empty(StatusCode::INTERNAL_SERVER_ERROR);
        };

        let outcome = match &config.callbacks.login {
            Some(callback) => {
                callback(CallbackParams {
                    headers,
                    token: token.clone(),
                    session,
                })
                .await
            }
            None => LoginOutcome::Proceed,
        };

        match outcome {
            LoginOutcome::Deny => text(StatusCode::BAD_REQUEST, "Bad Request"),
            LoginOutcome::Redirect(location) => redirect(location),
            LoginOutcome::Proceed => with_set_cookie(cookies::session_cookie(
                config.cookie_name(),
                &token,
                config.cookie_settings(),
            )),
        }
    }

    async fn logout(&self, req: Request) -> Response {
        let config = &*self.config;

        // No session, no callback; the cookie is cleared either way.
        let resolved = resolve_session(config, req.headers()).await;
        if let (Some(session), Some(token)) = (resolved.session, resolved.token) {
            if let Some(callback) = &config.callbacks.logout {
                callback(CallbackParams {
                    headers: req.headers().clone(),
                    token,
                    session,
                })
                .await;
            }
        }

        if let Err(err) = config.strategy().log_out(config).await {
            tracing::error!(err = %err, "strategy logout side effect failed");
        }

        with_set_cookie(cookies::expired_cookie(
            config.cookie_name(),
            config.cookie_settings(),
        ))
    }
}

/// Route handler: method check, route-parameter extraction, dispatch.
async fn handle(
    State(auth): State<Auth>,
    Path(params): Path<HashMap<String, String>>,
    req: Request,
) -> Response {
    if req.method() != Method::POST {
        return text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    }

    let (Some(action), Some(provider_id)) = (
        params.get("action").cloned(),
        params.get("provider").cloned(),
    ) else {
        // Host misconfiguration, not a user-facing condition.
        tracing::error!(
            "route template is missing the `:action`/`:provider` segments; check the path the auth routes are mounted on"
        );
        return empty(StatusCode::INTERNAL_SERVER_ERROR);
    };

    auth.run(&action, &provider_id, req).await
}

fn empty(status: StatusCode) -> Response {
    Response::builder()
        .status(status)
        .body(Body::empty())
        .unwrap()
}

fn text(status: StatusCode, body: &'static str) -> Response {
    Response::builder()
        .status(status)
        .body(Body::from(body))
        .unwrap()
}

fn with_set_cookie(cookie: Cookie<'static>) -> Response {
    match HeaderValue::try_from(cookie.encoded().to_string()) {
        Ok(value) => {
            let mut res = empty(StatusCode::OK);
            res.headers_mut().insert(header::SET_COOKIE, value);
            res
        }
        Err(err) => {
            tracing::error!(err = %err, "session cookie could not be encoded into a header");
            empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn redirect(location: String) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => {
            let mut res = empty(StatusCode::PERMANENT_REDIRECT);
            res.headers_mut().insert(header::LOCATION, value);
            res
        }
        Err(err) => {
            tracing::error!(err = %err, "login callback returned an unusable redirect location");
            empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Builds the cookie header a browser would send back for the minted
/// token. The value must go through the same percent-encoding as the
/// `Set-Cookie` header, or tokens containing reserved characters would be
/// mangled on the way back in.
fn synthetic_cookie_headers(
    name: &str,
    token: &str,
) -> Result<HeaderMap, axum::http::header::InvalidHeaderValue> {
    let pair = Cookie::new(name.to_owned(), token.to_owned());
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::try_from(pair.encoded().to_string())?,
    );
    Ok(headers)
}
