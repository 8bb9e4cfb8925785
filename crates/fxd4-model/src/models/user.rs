use std::ops::Deref;

use fxd4_client::RemoteClient;

use crate::{error::Result, model::Model, Record};

/// The `users` profile table.
#[derive(Debug, Clone)]
pub struct User {
    model: Model,
}

impl User {
    pub const TABLE: &'static str = "users";

    pub fn new(client: RemoteClient) -> Self {
        Self {
            model: Model::new(client, Self::TABLE),
        }
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<Record>> {
        self.model.find_by("email", email)
    }
}

impl Deref for User {
    type Target = Model;

    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fxd4_client::RecordingTransport;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_find_by_email() {
        let transport = Arc::new(RecordingTransport::new());
        let client =
            RemoteClient::new("https://demo.supabase.co", "anon", transport.clone()).unwrap();
        let users = User::new(client);
        transport.push_json(200, json!({"id": 1, "email": "a@x.com"}));

        let user = users.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(user["id"], 1);

        let request = transport.last_request().unwrap();
        assert_eq!(request.url.path(), "/rest/v1/users");
        assert_eq!(request.query_values("email"), vec!["eq.a@x.com"]);
    }

    #[test]
    fn test_derefs_to_model() {
        let client = RemoteClient::new(
            "https://demo.supabase.co",
            "anon",
            Arc::new(RecordingTransport::new()),
        )
        .unwrap();
        let users = User::new(client);
        assert_eq!(users.resource(), "users");
    }
}
