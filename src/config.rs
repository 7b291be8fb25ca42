use std::{future::Future, sync::Arc};

use axum::http::HeaderMap;
use cookie::SameSite;
use futures::future::BoxFuture;
use secrecy::SecretString;
use time::Duration;

use crate::{
    error::Error, handler::Auth, provider::Provider, session::Session, strategy::Strategy,
};

/// Key material used to sign and verify session tokens.
///
/// A single symmetric secret is used for both signing and verification; a
/// key pair signs with the private half and verifies with the public half.
/// Which half applies is selected once per operation, never cached.
#[derive(Debug, Clone)]
pub enum Secret {
    /// One shared symmetric secret.
    Symmetric(SecretString),

    /// An asymmetric key pair, PEM-encoded.
    KeyPair {
        /// Private key used for signing.
        private: SecretString,

        /// Public key used for verification. Not secret by definition.
        public: String,
    },
}

impl Secret {
    /// Creates a symmetric secret.
    pub fn symmetric(secret: impl Into<String>) -> Self {
        Self::Symmetric(SecretString::new(secret.into()))
    }

    /// Creates an asymmetric key pair from PEM-encoded keys.
    pub fn key_pair(private: impl Into<String>, public: impl Into<String>) -> Self {
        Self::KeyPair {
            private: SecretString::new(private.into()),
            public: public.into(),
        }
    }
}

impl From<&str> for Secret {
    fn from(secret: &str) -> Self {
        Self::symmetric(secret)
    }
}

impl From<String> for Secret {
    fn from(secret: String) -> Self {
        Self::symmetric(secret)
    }
}

/// Attributes applied to the session cookie.
///
/// The default value is the fixed baseline; builder configuration overrides
/// it and per-call attributes (the forced expiry on logout) override both.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Cookie `Path` attribute.
    pub path: String,

    /// Whether the cookie carries `HttpOnly`.
    pub http_only: bool,

    /// Cookie `SameSite` attribute.
    pub same_site: SameSite,

    /// Whether the cookie carries `Secure`.
    pub secure: bool,

    /// Cookie `Max-Age`, if any.
    pub max_age: Option<Duration>,

    /// Cookie `Domain` attribute, if any.
    pub domain: Option<String>,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            path: "/".to_owned(),
            http_only: true,
            same_site: SameSite::Lax,
            secure: true,
            max_age: Some(Duration::hours(1)),
            domain: None,
        }
    }
}

impl CookieSettings {
    /// Configures the cookie `Path` attribute.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Configures whether the cookie carries `HttpOnly`.
    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Configures the cookie `SameSite` attribute.
    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Configures whether the cookie carries `Secure`.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Configures the cookie `Max-Age`. `None` omits the attribute.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// Configures the cookie `Domain` attribute.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Parameters handed to the host's login and logout callbacks.
///
/// Constructed by the orchestrator at the lifecycle points where the host
/// may observe or veto the flow; never mutated by this crate afterwards.
#[derive(Debug, Clone)]
pub struct CallbackParams {
    /// Headers of the request that triggered the lifecycle point.
    pub headers: HeaderMap,

    /// The opaque session token.
    pub token: String,

    /// The session the token carries.
    pub session: Session,
}

/// Outcome of the host's login callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Continue: respond 200 and set the session cookie.
    Proceed,

    /// Veto the login: respond 400, no cookie is set.
    Deny,

    /// Respond with a 308 redirect to the given location; no cookie is set.
    Redirect(String),
}

pub(crate) type LoginCallback =
    Arc<dyn Fn(CallbackParams) -> BoxFuture<'static, LoginOutcome> + Send + Sync>;

pub(crate) type LogoutCallback =
    Arc<dyn Fn(CallbackParams) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Clone, Default)]
pub(crate) struct Callbacks {
    pub(crate) login: Option<LoginCallback>,
    pub(crate) logout: Option<LogoutCallback>,
}

/// Immutable, process-wide auth configuration.
///
/// Built once by [`AuthBuilder`] and shared read-only for the lifetime of
/// the process; every operation receives it explicitly, so concurrent
/// requests never interfere through hidden shared state.
pub struct AuthConfig {
    pub(crate) cookie_name: String,
    pub(crate) secret: Secret,
    pub(crate) strategy: Arc<dyn Strategy>,
    pub(crate) providers: Vec<Arc<dyn Provider>>,
    pub(crate) cookie_settings: CookieSettings,
    pub(crate) callbacks: Callbacks,
}

impl AuthConfig {
    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Key material used to sign and verify tokens.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// The configured token strategy.
    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// The registered providers, in registration order. The first provider
    /// whose id matches the route wins.
    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    /// Attributes applied to the session cookie.
    pub fn cookie_settings(&self) -> &CookieSettings {
        &self.cookie_settings
    }
}

/// Builder for [`Auth`].
///
/// The secret and the strategy are mandatory; everything else has the
/// documented defaults. Missing mandatory fields are configuration errors
/// surfaced from [`build`](AuthBuilder::build); they are never recovered
/// at request time.
pub struct AuthBuilder {
    base_path: String,
    cookie_name: String,
    secret: Option<Secret>,
    strategy: Option<Arc<dyn Strategy>>,
    providers: Vec<Arc<dyn Provider>>,
    cookie_settings: CookieSettings,
    callbacks: Callbacks,
}

impl Default for AuthBuilder {
    fn default() -> Self {
        Self {
            base_path: "/auth".to_owned(),
            cookie_name: "orange.auth".to_owned(),
            secret: None,
            strategy: None,
            providers: Vec::new(),
            cookie_settings: CookieSettings::default(),
            callbacks: Callbacks::default(),
        }
    }
}

impl AuthBuilder {
    /// Configures the secret used to sign and verify tokens. Mandatory.
    #[must_use]
    pub fn secret(mut self, secret: impl Into<Secret>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Configures the token strategy. Mandatory.
    #[must_use]
    pub fn strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Registers a provider. Order matters when several providers share an
    /// id: the first match wins.
    #[must_use]
    pub fn provider(mut self, provider: impl Provider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Configures the path the auth routes are mounted on. The
    /// `/:action/:provider` segments are appended by the crate. Defaults to
    /// `/auth`.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Configures the session cookie name. Defaults to `orange.auth`.
    #[must_use]
    pub fn cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    /// Configures the session cookie attributes.
    #[must_use]
    pub fn cookie_settings(mut self, cookie_settings: CookieSettings) -> Self {
        self.cookie_settings = cookie_settings;
        self
    }

    /// Registers a callback invoked after a successful login, before the
    /// cookie is set. Its [`LoginOutcome`] may veto the login or redirect
    /// around it.
    #[must_use]
    pub fn on_login<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(CallbackParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = LoginOutcome> + Send + 'static,
    {
        self.callbacks.login = Some(Arc::new(move |params| Box::pin(callback(params))));
        self
    }

    /// Registers a callback invoked on logout when a valid session is
    /// present. Its return value is ignored by the state machine.
    #[must_use]
    pub fn on_logout<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(CallbackParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.logout = Some(Arc::new(move |params| Box::pin(callback(params))));
        self
    }

    /// Validates the configuration and builds the [`Auth`] entry point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSecret`] or [`Error::MissingStrategy`] when
    /// a mandatory field was not configured.
    pub fn build(self) -> crate::Result<Auth> {
        let secret = self.secret.ok_or(Error::MissingSecret)?;
        let strategy = self.strategy.ok_or(Error::MissingStrategy)?;

        let config = AuthConfig {
            cookie_name: self.cookie_name,
            secret,
            strategy,
            providers: self.providers,
            cookie_settings: self.cookie_settings,
            callbacks: self.callbacks,
        };

        Ok(Auth::new(Arc::new(config), self.base_path))
    }
}
