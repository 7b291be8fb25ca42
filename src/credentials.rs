use std::{
    fmt::{self, Debug},
    future::Future,
    sync::Arc,
};

use async_trait::async_trait;
use axum::{extract::Request, http::header};
use futures::future::BoxFuture;

use crate::{
    body::{self, DecodedBody, Fields},
    config::AuthConfig,
    provider::{LoggedIn, Provider},
    session::Session,
};

/// Credential bodies are small; anything larger is not a login form.
const BODY_LIMIT: usize = 1024 * 1024;

type AuthorizeFn = Arc<dyn Fn(Fields) -> BoxFuture<'static, Option<Session>> + Send + Sync>;

/// Provider that logs a user in with basic credentials.
///
/// The request body is decoded per its content type into flat form fields
/// and handed to the host's `authorize` callback. That callback is where
/// the host looks up its user store; returning `None` means "no matching
/// identity" and fails the login.
///
/// # Examples
///
/// ```rust
/// use orange_auth::{Credentials, Fields, Session};
///
/// let provider = Credentials::new(|credentials: Fields| async move {
///     // Look the user up in your database here.
///     (credentials.get("email").map(String::as_str) == Some("ferris@example.com"))
///         .then(|| Session::new("u1"))
/// });
/// ```
#[derive(Clone)]
pub struct Credentials {
    id: String,
    authorize: AuthorizeFn,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("id", &self.id).finish()
    }
}

impl Credentials {
    /// Creates a credentials provider with the default id `credentials`.
    pub fn new<F, Fut>(authorize: F) -> Self
    where
        F: Fn(Fields) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Session>> + Send + 'static,
    {
        Self {
            id: "credentials".to_owned(),
            authorize: Arc::new(move |fields| Box::pin(authorize(fields))),
        }
    }

    /// Overrides the provider id. Only needed when several instances of
    /// this provider are registered at once.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

#[async_trait]
impl Provider for Credentials {
    fn id(&self) -> &str {
        &self.id
    }

    async fn log_in(
        &self,
        req: Request,
        config: &AuthConfig,
    ) -> crate::Result<Option<LoggedIn>> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let bytes = axum::body::to_bytes(req.into_body(), BODY_LIMIT).await?;

        let fields = match body::decode(content_type.as_deref(), bytes).await? {
            DecodedBody::Fields(fields) => fields,
            // Unsupported content types never reach `authorize`.
            DecodedBody::Unsupported => return Ok(None),
        };

        let Some(session) = (self.authorize)(fields).await else {
            return Ok(None);
        };

        // A vetoed or failed mint is a designed login failure, not an
        // error the host should see.
        match config.strategy().serialize(&session, config).await {
            Ok(token) => Ok(Some(LoggedIn { session, token })),
            Err(err) => {
                tracing::debug!(err = %err, provider = %self.id, "token mint failed; rejecting login");
                Ok(None)
            }
        }
    }
}
