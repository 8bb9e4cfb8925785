//! Login, registration and logout.

use std::time::Duration;

use fxd4_client::{AuthClient, RemoteClient};
use fxd4_config::config::Config;
use fxd4_model::models::User;
use serde::Deserialize;
use serde_json::{json, Map};
use tracing::{debug, info};

use crate::{
    cookie::Cookie,
    error::Result,
    response::{Response, View},
};

const GUEST_LAYOUT: &str = "layouts/guest";
const LOGIN_VIEW: &str = "auth/login";
const REGISTER_VIEW: &str = "auth/register";

pub const HOME_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
struct SessionCookie {
    name: String,
    max_age: Duration,
    secure: bool,
}

pub struct AuthController {
    users: User,
    auth: AuthClient,
    cookie: SessionCookie,
}

impl AuthController {
    pub fn new(client: RemoteClient, config: &Config) -> Self {
        Self {
            auth: client.auth(),
            users: User::new(client),
            cookie: SessionCookie {
                name: config.session_cookie().to_string(),
                max_age: config.session_max_age(),
                secure: config.is_production(),
            },
        }
    }

    pub fn login_page(&self) -> Response {
        Response::render(login_view().with("message", "Please Login before continue!"))
    }

    pub fn register_page(&self) -> Response {
        Response::render(register_view().with("message", "Please Register before continue!"))
    }

    /// Registers a new account.
    ///
    /// Validation and sign-up failures re-render the form with the message
    /// and the submitted name and email. Failing to look up existing users
    /// is returned as an error.
    pub fn register(&self, form: &RegisterForm) -> Result<Response> {
        let rejected = |message: &str| {
            Response::render(
                register_view()
                    .with("error_message", message)
                    .with(
                        "old_data",
                        json!({ "name": form.name, "email": form.email }),
                    ),
            )
        };

        if form.password != form.password_confirmation {
            return Ok(rejected("Password confirmation does not match."));
        }

        if self.users.find_by_email(&form.email)?.is_some() {
            debug!("registration refused, {} already exists", form.email);
            return Ok(rejected("Email is already registered. Please login."));
        }

        let mut metadata = Map::new();
        metadata.insert("full_name".into(), json!(form.name));

        if let Err(err) = self.auth.sign_up(&form.email, &form.password, metadata) {
            debug!("sign-up failed for {}: {}", form.email, err);
            return Ok(rejected(&err.user_message()));
        }

        info!("registered {}", form.email);
        Ok(Response::render(login_view().with(
            "message",
            "Registration successful! Check your spam folder for confirmation.",
        )))
    }

    /// Signs in and stores the access token in the session cookie.
    pub fn login(&self, form: &LoginForm) -> Result<Response> {
        let session = match self.auth.sign_in_with_password(&form.email, &form.password) {
            Ok(session) => session,
            Err(err) => {
                debug!("sign-in failed for {}: {}", form.email, err);
                return Ok(Response::render(
                    login_view()
                        .with("error_message", err.user_message())
                        .with("old_email", form.email.as_str()),
                ));
            }
        };

        info!("signed in {}", form.email);
        let cookie = Cookie::session(
            &self.cookie.name,
            session.access_token,
            self.cookie.max_age,
            self.cookie.secure,
        );
        Ok(Response::redirect(HOME_PATH).with_cookie(cookie))
    }

    /// Revokes the session (when there is one) and clears the cookie.
    pub fn logout(&self, access_token: Option<&str>) -> Result<Response> {
        if let Some(token) = access_token {
            self.auth.sign_out(token)?;
        }

        Ok(Response::redirect(LOGIN_PATH).with_cookie(Cookie::removal(&self.cookie.name)))
    }
}

fn login_view() -> View {
    View::new(LOGIN_VIEW)
        .layout(GUEST_LAYOUT)
        .with("title", "Login")
}

fn register_view() -> View {
    View::new(REGISTER_VIEW)
        .layout(GUEST_LAYOUT)
        .with("title", "Register")
}
