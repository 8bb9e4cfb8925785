use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        f.write_str(value)
    }
}

/// A `Set-Cookie` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age: Option<Duration>,
    pub expires: Option<DateTime<Utc>>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".into(),
            max_age: None,
            expires: None,
            http_only: false,
            secure: false,
            same_site: None,
        }
    }

    /// Session cookie carrying an access token: HttpOnly, SameSite=Lax,
    /// expiring after `max_age`. `secure` should be set in production.
    pub fn session(
        name: impl Into<String>,
        token: impl Into<String>,
        max_age: Duration,
        secure: bool,
    ) -> Self {
        let expires = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_add_signed(age));

        Self {
            max_age: Some(max_age),
            expires,
            http_only: true,
            secure,
            same_site: Some(SameSite::Lax),
            ..Self::new(name, token)
        }
    }

    /// Cookie that makes the browser drop `name`.
    pub fn removal(name: impl Into<String>) -> Self {
        Self {
            expires: Some(DateTime::<Utc>::UNIX_EPOCH),
            ..Self::new(name, "")
        }
    }

    pub fn to_header_value(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);

        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={}", max_age.as_secs()));
        }
        header.push_str(&format!("; Path={}", self.path));
        if let Some(expires) = self.expires {
            header.push_str(&format!("; Expires={}", expires.format(HTTP_DATE)));
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if let Some(same_site) = self.same_site {
            header.push_str(&format!("; SameSite={same_site}"));
        }

        header
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

/// Finds `name` in a `Cookie` request header.
pub fn parse_cookie_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}
