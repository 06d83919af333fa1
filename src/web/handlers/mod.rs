//! API handlers for the NetLink REST API.

pub mod auth;
pub mod notification;
pub mod post;
pub mod user;

pub use auth::*;
pub use notification::*;
pub use post::*;
pub use user::*;

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::auth::SessionTokens;
use crate::config::Config;
use crate::db::Database;
use crate::mail::{ClientLinks, Mailer};
use crate::media::ImageStore;
use crate::Result;

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Cookie name.
    pub name: String,
    /// Set the `Secure` attribute (production only).
    pub secure: bool,
    /// Lifetime in seconds.
    pub max_age_secs: i64,
}

impl CookieSettings {
    /// Build the session cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .path("/")
            .max_age(time::Duration::seconds(self.max_age_secs))
            .build()
    }

    /// Build an already-expired session cookie.
    pub fn expired_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .path("/")
            .max_age(time::Duration::ZERO)
            .build()
    }
}

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Session token issuer/verifier.
    pub tokens: SessionTokens,
    /// Image store for profile and post images.
    pub images: Arc<dyn ImageStore>,
    /// Outbound mailer.
    pub mailer: Arc<dyn Mailer>,
    /// Links into the web client.
    pub links: ClientLinks,
    /// Session cookie attributes.
    pub cookie: CookieSettings,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: &Config,
        db: Database,
        images: Arc<dyn ImageStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self> {
        let tokens = SessionTokens::new(&config.auth.jwt_secret, config.auth.token_expiry_days);
        let cookie = CookieSettings {
            name: config.auth.cookie_name.clone(),
            secure: config.server.production,
            max_age_secs: tokens.expiry_secs() as i64,
        };

        Ok(Self {
            db,
            tokens,
            images,
            mailer,
            links: ClientLinks::new(&config.server.client_url)?,
            cookie,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secure: bool) -> CookieSettings {
        CookieSettings {
            name: "token".to_string(),
            secure,
            max_age_secs: 7 * 24 * 60 * 60,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = settings(false).session_cookie("abc".to_string());

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn test_secure_in_production() {
        let cookie = settings(true).session_cookie("abc".to_string());
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_expired_cookie() {
        let cookie = settings(false).expired_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
