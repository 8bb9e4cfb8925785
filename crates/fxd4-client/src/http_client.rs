use std::time::Duration;

use fxd4_config::config::Config;
use ureq::{http::HeaderMap, Agent, Proxy, RequestBuilder};

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub headers: Option<HeaderMap>,
    pub proxy: Option<Proxy>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    /// Creates a default ClientConfig with the `fxd4/<version>` user agent and
    /// no proxy, extra headers, or timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use fxd4_client::http_client::ClientConfig;
    ///
    /// let cfg = ClientConfig::default();
    /// assert!(cfg.user_agent.as_deref().unwrap().starts_with("fxd4/"));
    /// assert!(cfg.proxy.is_none());
    /// assert!(cfg.timeout.is_none());
    /// ```
    fn default() -> Self {
        Self {
            user_agent: Some(concat!("fxd4/", env!("CARGO_PKG_VERSION")).into()),
            proxy: None,
            headers: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Takes the user agent and timeout from the application config, keeping
    /// defaults for anything unset.
    pub fn from_config(config: &Config) -> Self {
        let mut client = Self::default();
        if let Some(user_agent) = &config.user_agent {
            client.user_agent = Some(user_agent.clone());
        }
        client.timeout = config.timeout();
        client
    }

    /// Builds an HTTP `Agent` configured from this `ClientConfig`.
    ///
    /// Non-2xx responses are returned as regular responses rather than
    /// errors, because the remote API carries its error payload in the body.
    pub fn build(&self) -> Agent {
        let mut config = ureq::Agent::config_builder()
            .proxy(self.proxy.clone())
            .timeout_global(self.timeout)
            .http_status_as_error(false);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

/// Apply headers from an optional `HeaderMap` to a `RequestBuilder`,
/// skipping every name for which `overridden` returns true.
pub(crate) fn apply_headers<B>(
    mut req: RequestBuilder<B>,
    headers: &Option<HeaderMap>,
    overridden: impl Fn(&str) -> bool,
) -> RequestBuilder<B> {
    if let Some(headers) = headers {
        for (key, value) in headers.iter() {
            if overridden(key.as_str()) {
                continue;
            }
            req = req.header(key, value);
        }
    }
    req
}

#[cfg(test)]
mod tests {
    use ureq::http::HeaderValue;

    use super::*;
    use crate::test_utils::{capture_request, header_lines};

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(
            config.user_agent,
            Some(format!("fxd4/{}", env!("CARGO_PKG_VERSION")))
        );
        assert!(config.proxy.is_none());
        assert!(config.headers.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_client_config_from_app_config() {
        let app = Config {
            user_agent: Some("my-app/1.0".into()),
            timeout: Some(15),
            ..Default::default()
        };
        let config = ClientConfig::from_config(&app);
        assert_eq!(config.user_agent.as_deref(), Some("my-app/1.0"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_client_config_from_empty_app_config_keeps_defaults() {
        let config = ClientConfig::from_config(&Config::default());
        assert!(config.user_agent.unwrap().starts_with("fxd4/"));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_agent_sends_user_agent_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-tenant", HeaderValue::from_static("acme"));
        let config = ClientConfig {
            headers: Some(headers),
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };

        let (url, captured) = capture_request();
        let req = apply_headers(config.build().get(url.as_str()), &config.headers, |_| false);
        assert_eq!(req.call().unwrap().status().as_u16(), 200);

        let raw = captured.join().unwrap();
        assert_eq!(
            header_lines(&raw, "user-agent"),
            [format!("fxd4/{}", env!("CARGO_PKG_VERSION"))]
        );
        assert_eq!(header_lines(&raw, "x-tenant"), ["acme"]);
    }

    #[test]
    fn test_apply_headers_skips_overridden() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        headers.insert("x-tenant", HeaderValue::from_static("acme"));
        let config = ClientConfig {
            headers: Some(headers),
            ..Default::default()
        };

        let (url, captured) = capture_request();
        let req = apply_headers(config.build().get(url.as_str()), &config.headers, |name| {
            name.eq_ignore_ascii_case("Accept")
        });
        req.header("Accept", "text/plain").call().unwrap();

        let raw = captured.join().unwrap();
        assert_eq!(header_lines(&raw, "accept"), ["text/plain"]);
        assert_eq!(header_lines(&raw, "x-tenant"), ["acme"]);
    }
}
