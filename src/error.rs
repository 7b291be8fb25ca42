/// An error which can occur while configuring the auth layer or while
/// handling an authentication request.
///
/// Configuration errors are fatal: they are returned from
/// [`AuthBuilder::build`](crate::AuthBuilder::build) and the host must fix
/// its configuration. Request-level errors are caught at the orchestrator
/// boundary and collapse to an HTTP status; no error detail is ever
/// serialized into a response body.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No secret was configured.
    #[error("auth secret missing: set `secret` on the auth builder")]
    MissingSecret,

    /// No token strategy was configured.
    #[error("no token strategy chosen: set `strategy` on the auth builder")]
    MissingStrategy,

    /// A serialize hook vetoed token creation.
    #[error("token rejected by the serialize hook")]
    SerializeRejected,

    /// Token signing failed, e.g. because the configured key material could
    /// not be parsed.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// A JSON request body could not be parsed.
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// A multipart request body could not be parsed.
    #[error("malformed multipart body: {0}")]
    Multipart(String),

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    /// An HTTP value could not be constructed.
    #[error(transparent)]
    Http(#[from] axum::http::Error),
}
