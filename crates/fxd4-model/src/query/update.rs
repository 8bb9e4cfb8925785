use fxd4_client::{ApiRequest, ClientError, Method, RemoteClient};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{ModelError, Result},
    query::{clause::Filter, OBJECT_MEDIA_TYPE},
    Record, ID_COLUMN,
};

/// Updates the row with the given identifier and returns it as stored.
pub struct UpdateQuery<'a> {
    client: &'a RemoteClient,
    resource: &'a str,
    id: Value,
    payload: Value,
}

impl<'a> UpdateQuery<'a> {
    pub fn table(client: &'a RemoteClient, resource: &'a str, id: impl Into<Value>) -> Self {
        Self {
            client,
            resource,
            id: id.into(),
            payload: Value::Object(Default::default()),
        }
    }

    pub fn set<P: Serialize + ?Sized>(mut self, payload: &P) -> Result<Self> {
        self.payload = serde_json::to_value(payload)
            .map_err(|err| ModelError::write(self.resource, err.into()))?;
        Ok(self)
    }

    pub fn build_request(&self) -> std::result::Result<ApiRequest, ClientError> {
        let mut url = self.client.rest_url(self.resource)?;
        let (key, value) = Filter::Eq {
            column: ID_COLUMN.into(),
            value: self.id.clone(),
        }
        .to_param();
        url.query_pairs_mut()
            .append_pair(&key, &value)
            .append_pair("select", "*");

        Ok(self
            .client
            .request(Method::Patch, url)
            .header("Prefer", "return=representation")
            .header("Accept", OBJECT_MEDIA_TYPE)
            .json(self.payload.clone()))
    }

    /// Fails with [`ModelError::RemoteWrite`] when no row has the identifier.
    pub fn execute(self) -> Result<Record> {
        self.build_request()
            .and_then(|request| self.client.execute(request))
            .and_then(|response| response.json::<Record>())
            .map_err(|err| ModelError::write(self.resource, err))
    }
}
