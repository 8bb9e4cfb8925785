use fxd4_client::{AuthClient, RemoteClient};
use fxd4_config::config::Config;
use serde_json::Value;
use tracing::debug;

use crate::{
    controllers::auth::LOGIN_PATH, cookie::parse_cookie_header, error::Result, response::Response,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Authenticated(Value),
    /// No usable session; answer with this response instead.
    Unauthenticated(Response),
}

/// Resolves the signed-in user from the session cookie.
pub struct SessionGuard {
    auth: AuthClient,
    cookie_name: String,
}

impl SessionGuard {
    pub fn new(client: &RemoteClient, config: &Config) -> Self {
        Self {
            auth: client.auth(),
            cookie_name: config.session_cookie().to_string(),
        }
    }

    /// Session token in a `Cookie` request header, if any.
    pub fn token<'a>(&self, cookie_header: &'a str) -> Option<&'a str> {
        parse_cookie_header(cookie_header, &self.cookie_name)
    }

    /// The user behind the request, or a redirect to the login page when the
    /// cookie is missing or the token is rejected by the auth API.
    ///
    /// Transport failures are errors, not redirects.
    pub fn authenticate(&self, cookie_header: Option<&str>) -> Result<SessionOutcome> {
        let Some(token) = cookie_header.and_then(|header| self.token(header)) else {
            return Ok(SessionOutcome::Unauthenticated(Response::redirect(LOGIN_PATH)));
        };

        match self.auth.get_user(token) {
            Ok(user) => Ok(SessionOutcome::Authenticated(user)),
            Err(err) if matches!(err.status(), Some(401 | 403)) => {
                debug!("session rejected: {}", err.user_message());
                Ok(SessionOutcome::Unauthenticated(Response::redirect(LOGIN_PATH)))
            }
            Err(err) => Err(err.into()),
        }
    }
}
