use std::{fmt, sync::Arc};

use fxd4_config::config::Config;
use tracing::{debug, trace};
use url::Url;

use crate::{
    auth::AuthClient,
    error::ClientError,
    http_client::ClientConfig,
    transport::{ApiRequest, ApiResponse, Method, Transport, UreqTransport},
};

const REST_PATH: &str = "rest/v1/";
const AUTH_PATH: &str = "auth/v1/";

/// Handle to one hosted project.
///
/// Cloning is cheap; clones share the same transport. Construct one at
/// startup and pass it to every model and controller that needs it.
#[derive(Clone)]
pub struct RemoteClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RemoteClient {
    pub fn new(
        url: &str,
        api_key: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(url).map_err(|source| {
            ClientError::InvalidUrl {
                url: url.to_string(),
                source,
            }
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            transport,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Builds a client with a `ureq` transport from the application config.
    ///
    /// Fails when the project URL or key is missing.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let credentials = config.credentials()?;
        let transport = UreqTransport::new(&ClientConfig::from_config(config));
        Self::new(credentials.url, credentials.key, Arc::new(transport))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Auth API bound to this project.
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.clone())
    }

    /// URL of a resource (table or view) on the resource API.
    pub fn rest_url(&self, resource: &str) -> Result<Url, ClientError> {
        self.join(&format!("{REST_PATH}{resource}"))
    }

    /// URL of an endpoint on the auth API.
    pub fn auth_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        self.join(&format!("{AUTH_PATH}{endpoint}"))
    }

    fn join(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url.join(path).map_err(|source| {
            ClientError::InvalidUrl {
                url: path.to_string(),
                source,
            }
        })
    }

    /// Starts a request authenticated with the project key.
    pub fn request(&self, method: Method, url: Url) -> ApiRequest {
        self.request_as(method, url, &self.api_key)
    }

    /// Starts a request authenticated as the holder of `access_token`.
    pub fn request_as(&self, method: Method, url: Url, access_token: &str) -> ApiRequest {
        ApiRequest::new(method, url)
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {access_token}"))
    }

    /// Sends `request`, turning non-2xx responses into [`ClientError::Api`].
    pub fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        debug!("{} {}", request.method, request.url);
        let response = self.transport.send(&request)?;
        trace!("{} {} -> {}", request.method, request.url, response.status);
        response.error_for_status()
    }
}
