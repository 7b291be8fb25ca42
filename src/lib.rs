//! 🍊 Cookie-based session authentication with pluggable providers and
//! token strategies.
//!
//! # Overview
//!
//! This crate wires a small, explicit authentication flow into an [`axum`]
//! application:
//!
//! - a [`Provider`] turns request credentials into a verified [`Session`]
//!   ([`Credentials`] ships with the crate),
//! - a [`Strategy`] turns sessions into opaque tokens and back ([`Jwt`]
//!   ships with the crate),
//! - [`Auth`] mounts `POST <base_path>/login/<provider>` and
//!   `POST <base_path>/logout/<provider>` routes, carries the session in a
//!   cookie, and resolves it back out of later requests with
//!   [`Auth::get_session`].
//!
//! Configuration is built once and shared immutably; there is no global
//! state. Login and logout lifecycle points can be observed (and logins
//! vetoed or redirected) with the [`AuthBuilder::on_login`] and
//! [`AuthBuilder::on_logout`] callbacks.
//!
//! # Example
//!
//! ```rust,no_run
//! use orange_auth::{Auth, Credentials, Fields, Jwt, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Auth::builder()
//!         .secret(std::env::var("AUTH_SECRET")?)
//!         .strategy(Jwt::default())
//!         .provider(Credentials::new(|credentials: Fields| async move {
//!             // Look the user up in your store here.
//!             (credentials.get("email").map(String::as_str) == Some("ferris@example.com")
//!                 && credentials.get("password").map(String::as_str) == Some("hunter2"))
//!                 .then(|| Session::new("u1").with("name", "Ferris"))
//!         }))
//!         .base_path("/api/auth")
//!         .build()?;
//!
//!     let app = axum::Router::new().merge(auth.router());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app.into_make_service()).await?;
//!
//!     Ok(())
//! }
//! ```
#![warn(clippy::all, nonstandard_style, future_incompatible, missing_docs)]

pub mod body;
mod config;
mod cookies;
mod credentials;
mod error;
mod handler;
mod jwt;
mod provider;
mod resolve;
mod session;
mod strategy;

pub use cookie::SameSite;

pub use self::{
    body::{DecodedBody, Fields},
    config::{AuthBuilder, AuthConfig, CallbackParams, CookieSettings, LoginOutcome, Secret},
    credentials::Credentials,
    error::Error,
    handler::{Auth, ClientConfig},
    jwt::Jwt,
    provider::{LoggedIn, Provider},
    session::Session,
    strategy::Strategy,
};

/// A `Result` with this crate's [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
