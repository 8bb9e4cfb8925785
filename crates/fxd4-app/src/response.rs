use serde::Serialize;
use serde_json::{Map, Value};

use crate::cookie::Cookie;

/// A template to render with its data. Rendering itself is left to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub template: String,
    pub layout: Option<String>,
    pub data: Map<String, Value>,
}

impl View {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            layout: None,
            data: Map::new(),
        }
    }

    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Render { status: u16, view: View },
    Redirect { location: String, cookies: Vec<Cookie> },
    Html { status: u16, body: String },
}

impl Response {
    pub fn render(view: View) -> Self {
        Self::Render {
            status: 200,
            view,
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            cookies: Vec::new(),
        }
    }

    /// Attaches a cookie. Only redirects carry cookies; other responses are
    /// returned unchanged.
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        if let Self::Redirect {
            cookies, ..
        } = &mut self
        {
            cookies.push(cookie);
        }
        self
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Render {
                status, ..
            }
            | Self::Html {
                status, ..
            } => *status,
            Self::Redirect {
                ..
            } => 302,
        }
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            Self::Render {
                view, ..
            } => Some(view),
            _ => None,
        }
    }
}
