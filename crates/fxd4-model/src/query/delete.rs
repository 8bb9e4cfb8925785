use fxd4_client::{ApiRequest, ClientError, Method, RemoteClient};
use serde_json::Value;

use crate::{
    error::{ModelError, Result},
    query::clause::Filter,
    ID_COLUMN,
};

/// Deletes the row with the given identifier.
pub struct DeleteQuery<'a> {
    client: &'a RemoteClient,
    resource: &'a str,
    id: Value,
}

impl<'a> DeleteQuery<'a> {
    pub fn from(client: &'a RemoteClient, resource: &'a str, id: impl Into<Value>) -> Self {
        Self {
            client,
            resource,
            id: id.into(),
        }
    }

    pub fn build_request(&self) -> std::result::Result<ApiRequest, ClientError> {
        let mut url = self.client.rest_url(self.resource)?;
        let (key, value) = Filter::Eq {
            column: ID_COLUMN.into(),
            value: self.id.clone(),
        }
        .to_param();
        url.query_pairs_mut().append_pair(&key, &value);

        Ok(self
            .client
            .request(Method::Delete, url)
            .header("Prefer", "return=minimal"))
    }

    /// Returns `true` once the server accepts the delete, whether or not a
    /// row matched.
    pub fn execute(self) -> Result<bool> {
        self.build_request()
            .and_then(|request| self.client.execute(request))
            .map(|_| true)
            .map_err(|err| ModelError::write(self.resource, err))
    }
}
