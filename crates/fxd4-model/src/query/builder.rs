//! The main query builder implementation.

use fxd4_client::{ApiRequest, ApiResponse, ClientError, Method, RemoteClient};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{ModelError, Result},
    query::{
        clause::{Filter, OrderClause, OrderOptions},
        state::QueryState,
        OBJECT_MEDIA_TYPE,
    },
    Record, ID_COLUMN,
};

/// A chainable read against one remote resource.
///
/// Every chain call takes the builder by value and returns the extended
/// builder, so a partially built query can be cloned and branched freely.
/// `get`, `first`, `find` and `find_by` consume the builder; no query state
/// outlives them, whether the call succeeds or fails.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use fxd4_client::{RemoteClient, UreqTransport};
/// use fxd4_model::{OrderOptions, QueryBuilder};
///
/// let client = RemoteClient::new(
///     "https://xyzcompany.supabase.co",
///     "anon-key",
///     Arc::new(UreqTransport::default()),
/// )
/// .unwrap();
///
/// let posts = QueryBuilder::new(client, "posts")
///     .where_eq("published", true)
///     .where_in("category", ["news", "blog"])
///     .order_by("created_at", OrderOptions::desc())
///     .limit(10)
///     .get()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    client: RemoteClient,
    resource: String,
    state: QueryState,
}

impl QueryBuilder {
    /// Starts an empty query on `resource` (e.g. `"users"`).
    pub fn new(client: RemoteClient, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
            state: QueryState::default(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The directives accumulated so far.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Adds an equality predicate. Column existence is not checked.
    ///
    /// A JSON `null` value is sent as `column=is.null` (SQL `IS NULL`), not
    /// `eq.null`, so it matches rows where the column is null.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.push_filter(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a membership predicate.
    pub fn where_in<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.state.push_filter(Filter::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds a raw disjunction in the remote filter syntax, e.g.
    /// `"id.eq.1,id.eq.2"`. The expression is not parsed or validated.
    pub fn where_or(mut self, expression: impl Into<String>) -> Self {
        self.state.push_filter(Filter::Or(expression.into()));
        self
    }

    /// Adds a sort key. Repeated calls sort by each key in call order.
    pub fn order_by(mut self, column: impl Into<String>, options: OrderOptions) -> Self {
        self.state.push_order(OrderClause {
            column: column.into(),
            options,
        });
        self
    }

    /// Caps the number of rows returned.
    pub fn limit(mut self, count: u32) -> Self {
        self.state.set_limit(count);
        self
    }

    /// Builds the read request. With `single`, the server is asked for one
    /// object instead of an array.
    pub fn build_request(&self, single: bool) -> std::result::Result<ApiRequest, ClientError> {
        let mut url = self.client.rest_url(&self.resource)?;
        url.query_pairs_mut().append_pair("select", "*");
        self.state.apply_to(&mut url);

        let request = self.client.request(Method::Get, url);
        Ok(if single {
            request.header("Accept", OBJECT_MEDIA_TYPE)
        } else {
            request
        })
    }

    fn fetch(&self, single: bool) -> std::result::Result<ApiResponse, ClientError> {
        let request = self.build_request(single)?;
        self.client.execute(request)
    }

    /// Executes the query and returns every matching row.
    pub fn get(self) -> Result<Vec<Record>> {
        debug!("fetching rows from {}", self.resource);
        self.fetch(false)
            .and_then(|response| response.json::<Vec<Record>>())
            .map_err(|err| ModelError::query(&self.resource, err))
    }

    /// Executes the query expecting a single row.
    ///
    /// The server's "no rows" answer yields `Ok(None)`; every other failure
    /// is a [`ModelError::RemoteQuery`].
    pub fn first(self) -> Result<Option<Record>> {
        debug!("fetching one row from {}", self.resource);
        match self
            .fetch(true)
            .and_then(|response| response.json::<Option<Record>>())
        {
            Ok(record) => Ok(record),
            Err(err) if err.is_no_rows() => Ok(None),
            Err(err) => Err(ModelError::query(&self.resource, err)),
        }
    }

    /// `where_eq("id", id).first()`.
    pub fn find(self, id: impl Into<Value>) -> Result<Option<Record>> {
        self.where_eq(ID_COLUMN, id).first()
    }

    /// `where_eq(column, value).first()`.
    pub fn find_by(self, column: impl Into<String>, value: impl Into<Value>) -> Result<Option<Record>> {
        self.where_eq(column, value).first()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fxd4_client::RecordingTransport;
    use serde_json::json;

    use super::*;

    fn setup() -> (Arc<RecordingTransport>, QueryBuilder) {
        let transport = Arc::new(RecordingTransport::new());
        let client =
            RemoteClient::new("https://demo.supabase.co", "anon", transport.clone()).unwrap();
        (transport, QueryBuilder::new(client, "users"))
    }

    fn no_rows() -> Value {
        json!({
            "code": "PGRST116",
            "details": "The result contains 0 rows",
            "hint": null,
            "message": "JSON object requested, multiple (or no) rows returned"
        })
    }

    #[test]
    fn test_chain_accumulates_state() {
        let (_, builder) = setup();
        let builder = builder
            .where_eq("role", "admin")
            .where_in("id", [1, 2, 3])
            .where_or("name.eq.a,name.eq.b")
            .order_by("name", OrderOptions::default())
            .limit(2);

        let state = builder.state();
        assert_eq!(state.filters().len(), 3);
        assert_eq!(state.orders().len(), 1);
        assert_eq!(state.limit(), Some(2));
    }

    #[test]
    fn test_branching_is_independent() {
        let (_, builder) = setup();
        let base = builder.where_eq("active", true);
        let admins = base.clone().where_eq("role", "admin");

        assert_eq!(base.state().filters().len(), 1);
        assert_eq!(admins.state().filters().len(), 2);
    }

    #[test]
    fn test_build_request() {
        let (_, builder) = setup();
        let request = builder
            .where_eq("email", "a@x.com")
            .where_in("status", ["new", "open"])
            .where_or("age.lt.18,age.gt.65")
            .order_by("created_at", OrderOptions::desc())
            .limit(20)
            .build_request(false)
            .unwrap();

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url.path(), "/rest/v1/users");
        assert_eq!(request.query_values("select"), vec!["*"]);
        assert_eq!(request.query_values("email"), vec!["eq.a@x.com"]);
        assert_eq!(request.query_values("status"), vec!["in.(new,open)"]);
        assert_eq!(request.query_values("or"), vec!["(age.lt.18,age.gt.65)"]);
        assert_eq!(request.query_values("order"), vec!["created_at.desc"]);
        assert_eq!(request.query_values("limit"), vec!["20"]);
        assert_eq!(request.header_value("accept"), None);
    }

    #[test]
    fn test_where_eq_null_matches_missing_values() {
        let (_, builder) = setup();
        let request = builder
            .where_eq("deleted_at", Value::Null)
            .build_request(false)
            .unwrap();
        assert_eq!(request.query_values("deleted_at"), vec!["is.null"]);
    }

    #[test]
    fn test_get_returns_rows() {
        let (transport, builder) = setup();
        transport.push_json(200, json!([{"id": 1}, {"id": 2}]));

        let rows = builder.where_eq("role", "admin").get().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], 2);
    }

    #[test]
    fn test_get_propagates_remote_error() {
        let (transport, builder) = setup();
        transport.push_json(
            400,
            json!({"code": "42703", "message": "column users.nope does not exist"}),
        );

        let err = builder.where_eq("nope", 1).get().unwrap_err();
        assert!(matches!(err, ModelError::RemoteQuery { .. }));
        assert_eq!(err.client_error().code(), Some("42703"));
    }

    #[test]
    fn test_get_rejects_non_array_body() {
        let (transport, builder) = setup();
        transport.push_json(200, json!({"id": 1}));

        let err = builder.get().unwrap_err();
        assert!(matches!(
            err.client_error(),
            ClientError::Serialization(_)
        ));
    }

    #[test]
    fn test_first_returns_record() {
        let (transport, builder) = setup();
        transport.push_json(200, json!({"id": 1, "email": "a@x.com"}));

        let record = builder.where_eq("email", "a@x.com").first().unwrap().unwrap();
        assert_eq!(record["email"], "a@x.com");

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.header_value("Accept"),
            Some("application/vnd.pgrst.object+json")
        );
        assert_eq!(request.query_values("email"), vec!["eq.a@x.com"]);
    }

    #[test]
    fn test_first_with_no_rows_is_none() {
        let (transport, builder) = setup();
        transport.push_json(406, no_rows());

        let record = builder.where_eq("email", "nobody@x.com").first().unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_first_propagates_other_errors() {
        let (transport, builder) = setup();
        transport.push_json(401, json!({"code": "PGRST301", "message": "JWT expired"}));

        let err = builder.first().unwrap_err();
        assert!(matches!(err, ModelError::RemoteQuery { .. }));
        assert_eq!(err.client_error().status(), Some(401));
    }

    #[test]
    fn test_first_propagates_network_errors() {
        let (transport, builder) = setup();
        transport.push_error(ureq_connection_failed());

        let err = builder.first().unwrap_err();
        assert!(matches!(err.client_error(), ClientError::Network(_)));
    }

    #[test]
    fn test_find_matches_where_id_first() {
        let (transport, builder) = setup();
        transport.push_json(200, json!({"id": 7}));
        transport.push_json(200, json!({"id": 7}));

        let found = builder.clone().find(7).unwrap();
        let chained = builder.where_eq("id", 7).first().unwrap();
        assert_eq!(found, chained);

        let requests = transport.requests();
        assert_eq!(requests[0], requests[1]);
        assert_eq!(requests[0].query_values("id"), vec!["eq.7"]);
    }

    #[test]
    fn test_find_by_keeps_accumulated_filters() {
        let (transport, builder) = setup();
        transport.push_json(406, no_rows());

        let result = builder
            .where_eq("active", true)
            .find_by("email", "a@x.com")
            .unwrap();
        assert!(result.is_none());

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_values("active"), vec!["eq.true"]);
        assert_eq!(request.query_values("email"), vec!["eq.a@x.com"]);
    }

    fn ureq_connection_failed() -> ClientError {
        ClientError::Network(Box::new(ureq::Error::ConnectionFailed))
    }
}
