//! Hosted auth API: sign-up, password sign-in, sign-out.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::{client::RemoteClient, error::ClientError, transport::Method};

/// Tokens issued by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

fn default_token_type() -> String {
    "bearer".into()
}

/// Result of a sign-up.
///
/// Projects with email confirmation enabled return only the user; projects
/// with auto-confirm also return a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpResponse {
    pub user: Option<Value>,
    pub session: Option<Session>,
}

pub struct AuthClient {
    client: RemoteClient,
}

impl AuthClient {
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
        }
    }

    /// Registers a new user. `metadata` is stored as the user's metadata
    /// (for example `{"full_name": "..."}`).
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Map<String, Value>,
    ) -> Result<SignUpResponse, ClientError> {
        debug!("signing up {email}");
        let url = self.client.auth_url("signup")?;
        let request = self.client.request(Method::Post, url).json(json!({
            "email": email,
            "password": password,
            "data": metadata,
        }));

        let body: Value = self.client.execute(request)?.json()?;
        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value(body)?;
            Ok(SignUpResponse {
                user: session.user.clone(),
                session: Some(session),
            })
        } else {
            Ok(SignUpResponse {
                user: Some(body),
                session: None,
            })
        }
    }

    pub fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        debug!("signing in {email}");
        let mut url = self.client.auth_url("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self.client.request(Method::Post, url).json(json!({
            "email": email,
            "password": password,
        }));

        self.client.execute(request)?.json()
    }

    /// Revokes the session behind `access_token`.
    ///
    /// A token the server no longer recognises counts as signed out.
    pub fn sign_out(&self, access_token: &str) -> Result<(), ClientError> {
        let url = self.client.auth_url("logout")?;
        let request = self.client.request_as(Method::Post, url, access_token);

        match self.client.execute(request) {
            Ok(_) => Ok(()),
            Err(err) if matches!(err.status(), Some(401 | 403 | 404)) => {
                debug!("session already invalid: {}", err.user_message());
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Fetches the user that owns `access_token`.
    pub fn get_user(&self, access_token: &str) -> Result<Value, ClientError> {
        let url = self.client.auth_url("user")?;
        let request = self.client.request_as(Method::Get, url, access_token);
        self.client.execute(request)?.json()
    }
}
