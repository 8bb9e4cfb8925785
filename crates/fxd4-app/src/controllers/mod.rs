pub mod auth;

pub use auth::{AuthController, LoginForm, RegisterForm};
