use fxd4_client::{ApiRequest, ClientError, Method, RemoteClient};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{ModelError, Result},
    query::OBJECT_MEDIA_TYPE,
    Record,
};

/// Inserts one row and returns it as stored.
pub struct InsertQuery<'a> {
    client: &'a RemoteClient,
    resource: &'a str,
    payload: Value,
}

impl<'a> InsertQuery<'a> {
    pub fn into(client: &'a RemoteClient, resource: &'a str) -> Self {
        Self {
            client,
            resource,
            payload: Value::Object(Default::default()),
        }
    }

    pub fn values<P: Serialize + ?Sized>(mut self, payload: &P) -> Result<Self> {
        self.payload = serde_json::to_value(payload)
            .map_err(|err| ModelError::write(self.resource, err.into()))?;
        Ok(self)
    }

    pub fn build_request(&self) -> std::result::Result<ApiRequest, ClientError> {
        let mut url = self.client.rest_url(self.resource)?;
        url.query_pairs_mut().append_pair("select", "*");

        Ok(self
            .client
            .request(Method::Post, url)
            .header("Prefer", "return=representation")
            .header("Accept", OBJECT_MEDIA_TYPE)
            .json(Value::Array(vec![self.payload.clone()])))
    }

    pub fn execute(self) -> Result<Record> {
        self.build_request()
            .and_then(|request| self.client.execute(request))
            .and_then(|response| response.json::<Record>())
            .map_err(|err| ModelError::write(self.resource, err))
    }
}
