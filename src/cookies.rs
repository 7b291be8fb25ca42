//! Session cookie construction.

use cookie::Cookie;
use time::{Duration, OffsetDateTime};

use crate::config::CookieSettings;

/// Builds the session cookie with the configured attributes.
pub(crate) fn session_cookie(name: &str, value: &str, settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_owned(), value.to_owned());
    cookie.set_path(settings.path.clone());
    cookie.set_http_only(settings.http_only);
    cookie.set_same_site(settings.same_site);
    cookie.set_secure(settings.secure);
    if let Some(max_age) = settings.max_age {
        cookie.set_max_age(max_age);
    }
    if let Some(domain) = settings.domain.clone() {
        cookie.set_domain(domain);
    }
    cookie
}

/// Builds the cleared session cookie sent on logout.
///
/// Keeps the configured attributes but forces the expiry to the Unix epoch
/// and unsets `Max-Age` so the expiry wins.
pub(crate) fn expired_cookie(name: &str, settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = session_cookie(name, "deleted", settings);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(None::<Duration>);
    cookie
}
