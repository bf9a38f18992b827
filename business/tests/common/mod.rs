use homecomfort_business::{
    Api, BusinessConfig, CurrentUser, MemorySessionStore, PersistedSession, Session,
    UserTableController,
};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test_token";

/// Mock backend plus a signed-in session and a controller pointed at it.
pub struct TestCtx {
    pub mock_server: MockServer,
    pub api: Api,
    pub store: MemorySessionStore,
    pub session: Session,
    pub controller: UserTableController,
}

impl TestCtx {
    /// Signed in as user `me_id` with token [`TOKEN`].
    pub async fn signed_in_as(me_id: i64) -> Self {
        let store = MemorySessionStore::with(PersistedSession {
            token: Some(TOKEN.to_owned()),
            user: Some(CurrentUser {
                id: me_id,
                email: format!("user{me_id}@example.com"),
                name: None,
            }),
        });
        Self::with_store(store).await
    }

    pub async fn signed_out() -> Self {
        Self::with_store(MemorySessionStore::new()).await
    }

    async fn with_store(store: MemorySessionStore) -> Self {
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri()).expect("mock server uri is a valid base");
        let api = Api::new(config);
        let session = Session::initialize(store.clone());
        let controller = UserTableController::new(api.clone());

        Self {
            mock_server,
            api,
            store,
            session,
            controller,
        }
    }

    /// Mount `GET /users` returning `users`, and load them into the table.
    pub async fn load_users(&mut self, users: Value) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(users))
            .mount(&self.mock_server)
            .await;

        self.controller
            .refresh(&self.session)
            .await
            .expect("initial users fetch should succeed");
    }
}

pub fn user_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("user{id}"),
        "email": format!("user{id}@example.com"),
        "lastLogin": null,
        "status": status,
    })
}
