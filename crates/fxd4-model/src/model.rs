use fxd4_client::RemoteClient;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::Result,
    query::{DeleteQuery, InsertQuery, OrderOptions, QueryBuilder, UpdateQuery},
    Record,
};

/// A model bound to one remote resource.
///
/// The model itself holds no query state: each read starts a fresh
/// [`QueryBuilder`], and writes address rows by identifier only. A model can
/// therefore be shared and used for concurrent queries.
#[derive(Debug, Clone)]
pub struct Model {
    client: RemoteClient,
    resource: String,
}

impl Model {
    pub fn new(client: RemoteClient, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    /// A fresh builder on this resource.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.client.clone(), self.resource.clone())
    }

    pub fn where_eq(&self, column: impl Into<String>, value: impl Into<Value>) -> QueryBuilder {
        self.query().where_eq(column, value)
    }

    pub fn where_in<I, V>(&self, column: impl Into<String>, values: I) -> QueryBuilder
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.query().where_in(column, values)
    }

    pub fn where_or(&self, expression: impl Into<String>) -> QueryBuilder {
        self.query().where_or(expression)
    }

    pub fn order_by(&self, column: impl Into<String>, options: OrderOptions) -> QueryBuilder {
        self.query().order_by(column, options)
    }

    pub fn limit(&self, count: u32) -> QueryBuilder {
        self.query().limit(count)
    }

    /// Every row of the resource.
    pub fn all(&self) -> Result<Vec<Record>> {
        self.query().get()
    }

    pub fn first(&self) -> Result<Option<Record>> {
        self.query().first()
    }

    pub fn find(&self, id: impl Into<Value>) -> Result<Option<Record>> {
        self.query().find(id)
    }

    pub fn find_by(&self, column: impl Into<String>, value: impl Into<Value>) -> Result<Option<Record>> {
        self.query().find_by(column, value)
    }

    /// Inserts one row and returns it as stored.
    pub fn create<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Record> {
        InsertQuery::into(&self.client, &self.resource)
            .values(payload)?
            .execute()
    }

    /// Updates the row with identifier `id` and returns it as stored.
    pub fn update<P: Serialize + ?Sized>(&self, id: impl Into<Value>, payload: &P) -> Result<Record> {
        UpdateQuery::table(&self.client, &self.resource, id)
            .set(payload)?
            .execute()
    }

    pub fn delete(&self, id: impl Into<Value>) -> Result<bool> {
        DeleteQuery::from(&self.client, &self.resource, id).execute()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fxd4_client::{Method, RecordingTransport};
    use serde_json::json;

    use super::*;
    use crate::error::ModelError;

    fn setup() -> (Arc<RecordingTransport>, Model) {
        let transport = Arc::new(RecordingTransport::new());
        let client =
            RemoteClient::new("https://demo.supabase.co", "anon", transport.clone()).unwrap();
        (transport, Model::new(client, "posts"))
    }

    #[test]
    fn test_all_sends_no_filters() {
        let (transport, model) = setup();
        transport.push_json(200, json!([]));

        assert!(model.all().unwrap().is_empty());

        let request = transport.last_request().unwrap();
        let keys: Vec<String> = request
            .url
            .query_pairs()
            .map(|(k, _)| k.into_owned())
            .collect();
        assert_eq!(keys, vec!["select"]);
    }

    #[test]
    fn test_no_state_survives_a_fetch() {
        let (transport, model) = setup();
        transport.push_json(200, json!([{"id": 1}]));
        transport.push_json(200, json!([{"id": 1}, {"id": 2}]));

        model
            .where_eq("author", "ada")
            .order_by("id", OrderOptions::desc())
            .limit(1)
            .get()
            .unwrap();
        model.all().unwrap();

        let second = &transport.requests()[1];
        assert!(second.query_values("author").is_empty());
        assert!(second.query_values("order").is_empty());
        assert!(second.query_values("limit").is_empty());
    }

    #[test]
    fn test_no_state_survives_a_failed_fetch() {
        let (transport, model) = setup();
        transport.push_json(500, json!({"message": "boom"}));
        transport.push_json(200, json!([]));

        assert!(model.where_eq("author", "ada").get().is_err());
        model.all().unwrap();

        let second = &transport.requests()[1];
        assert!(second.query_values("author").is_empty());
    }

    #[test]
    fn test_find_by_email() {
        let (transport, model) = setup();
        transport.push_json(200, json!({"id": 1, "email": "a@x.com"}));
        transport.push_json(
            406,
            json!({"code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned"}),
        );

        let found = model.find_by("email", "a@x.com").unwrap();
        assert_eq!(found.unwrap()["id"], 1);

        let missing = model.find_by("email", "b@x.com").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_find_uses_id_column() {
        let (transport, model) = setup();
        transport.push_json(200, json!({"id": "abc"}));

        model.find("abc").unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.query_values("id"), vec!["eq.abc"]);
    }

    #[test]
    fn test_create() {
        let (transport, model) = setup();
        transport.push_json(201, json!({"id": 9, "title": "Hello"}));

        let record = model.create(&json!({"title": "Hello"})).unwrap();
        assert_eq!(record["id"], 9);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.path(), "/rest/v1/posts");
        assert_eq!(request.query_values("select"), vec!["*"]);
        assert_eq!(request.header_value("prefer"), Some("return=representation"));
        assert_eq!(request.body, Some(json!([{"title": "Hello"}])));
    }

    #[test]
    fn test_create_with_struct_payload() {
        #[derive(Serialize)]
        struct NewPost<'a> {
            title: &'a str,
            draft: bool,
        }

        let (transport, model) = setup();
        transport.push_json(201, json!({"id": 1, "title": "Hi", "draft": true}));

        model
            .create(&NewPost {
                title: "Hi",
                draft: true,
            })
            .unwrap();
        assert_eq!(
            transport.last_request().unwrap().body,
            Some(json!([{"title": "Hi", "draft": true}]))
        );
    }

    #[test]
    fn test_create_error_is_write_error() {
        let (transport, model) = setup();
        transport.push_json(
            409,
            json!({"code": "23505", "message": "duplicate key value violates unique constraint"}),
        );

        let err = model.create(&json!({"title": "dup"})).unwrap_err();
        assert!(matches!(err, ModelError::RemoteWrite { .. }));
        assert_eq!(err.client_error().code(), Some("23505"));
    }

    #[test]
    fn test_update() {
        let (transport, model) = setup();
        transport.push_json(200, json!({"id": 3, "title": "New"}));

        let record = model.update(3, &json!({"title": "New"})).unwrap();
        assert_eq!(record["title"], "New");

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.query_values("id"), vec!["eq.3"]);
        assert_eq!(request.body, Some(json!({"title": "New"})));
    }

    #[test]
    fn test_update_missing_row_is_write_error() {
        let (transport, model) = setup();
        transport.push_json(
            406,
            json!({"code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned"}),
        );

        let err = model.update(404, &json!({"title": "x"})).unwrap_err();
        assert!(matches!(err, ModelError::RemoteWrite { .. }));
    }

    #[test]
    fn test_delete() {
        let (transport, model) = setup();
        transport.push_response(204, "");

        assert!(model.delete(5).unwrap());

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.query_values("id"), vec!["eq.5"]);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_delete_error() {
        let (transport, model) = setup();
        transport.push_json(403, json!({"code": "42501", "message": "permission denied"}));

        let err = model.delete(5).unwrap_err();
        assert!(matches!(err, ModelError::RemoteWrite { .. }));
    }

    #[test]
    fn test_writes_ignore_pending_builders() {
        let (transport, model) = setup();
        transport.push_json(200, json!({"id": 1}));
        transport.push_response(204, "");

        let _pending = model.where_eq("author", "ada").limit(1);
        model.update(1, &json!({"title": "t"})).unwrap();
        model.delete(1).unwrap();

        for request in transport.requests() {
            assert!(request.query_values("author").is_empty());
            assert!(request.query_values("limit").is_empty());
            assert_eq!(request.query_values("id"), vec!["eq.1"]);
        }
    }
}
