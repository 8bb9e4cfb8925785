use fxd4_app::{
    controllers::{AuthController, LoginForm, RegisterForm},
    middleware::{SessionGuard, SessionOutcome},
    Cookie, Response,
};
use fxd4_client::RemoteClient;
use fxd4_config::config::Config;
use serde_json::Value;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// What the terminal shows for a controller response.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Message(String),
    Redirect {
        location: String,
        cookies: Vec<Cookie>,
    },
}

/// A re-rendered form carrying `error_message` is a failure. Any other
/// page is reduced to its `message`.
fn outcome(response: Response) -> CliResult<Outcome> {
    match response {
        Response::Redirect {
            location,
            cookies,
        } => Ok(Outcome::Redirect {
            location,
            cookies,
        }),
        Response::Render {
            view, ..
        } => {
            if let Some(error) = view.get("error_message").and_then(Value::as_str) {
                return Err(CliError::Rejected(error.to_string()));
            }
            let message = view
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok(Outcome::Message(message.to_string()))
        }
        Response::Html {
            body, ..
        } => Ok(Outcome::Message(body)),
    }
}

pub fn register(
    client: &RemoteClient,
    config: &Config,
    name: String,
    email: String,
    password: String,
    password_confirmation: Option<String>,
) -> CliResult<Outcome> {
    let form = RegisterForm {
        name,
        email,
        password_confirmation: password_confirmation.unwrap_or_else(|| password.clone()),
        password,
    };
    let controller = AuthController::new(client.clone(), config);
    outcome(controller.register(&form)?)
}

pub fn login(
    client: &RemoteClient,
    config: &Config,
    email: String,
    password: String,
) -> CliResult<Outcome> {
    let controller = AuthController::new(client.clone(), config);
    outcome(controller.login(&LoginForm {
        email,
        password,
    })?)
}

pub fn logout(client: &RemoteClient, config: &Config, session: Option<&str>) -> CliResult<Outcome> {
    if session.is_none() {
        debug!("no session given, only clearing the cookie");
    }
    let controller = AuthController::new(client.clone(), config);
    outcome(controller.logout(session)?)
}

/// The user record behind `session`.
pub fn whoami(client: &RemoteClient, config: &Config, session: &str) -> CliResult<Value> {
    let guard = SessionGuard::new(client, config);
    let cookie_header = format!("{}={}", config.session_cookie(), session);

    match guard.authenticate(Some(&cookie_header))? {
        SessionOutcome::Authenticated(user) => Ok(user),
        SessionOutcome::Unauthenticated(_) => {
            Err(CliError::Rejected(
                "Session is invalid or expired. Please login.".into(),
            ))
        }
    }
}
