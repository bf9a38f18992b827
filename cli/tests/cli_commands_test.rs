//! CLI integration tests using mock servers.
//!
//! These tests don't spawn the binary. They drive the command functions
//! against a wiremock backend with the session file in a temp directory.
//! Every call passes its arguments explicitly so no prompt is shown.

use homecomfort_business::{BulkAction, BusinessConfig, FileSessionStore};
use homecomfort_cli::cli::Selection;
use homecomfort_cli::commands::{run_action, run_list, run_login, run_logout};
use homecomfort_cli::context::AppContext;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

const TOKEN: &str = "cli_token";

/// Test context for CLI integration tests.
struct CliTestContext {
    mock_server: MockServer,
    dir: TempDir,
    ctx: AppContext,
}

impl CliTestContext {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let ctx = Self::build(&mock_server, &dir);
        Self {
            mock_server,
            dir,
            ctx,
        }
    }

    fn build(mock_server: &MockServer, dir: &TempDir) -> AppContext {
        let config = BusinessConfig::new(mock_server.uri()).unwrap();
        AppContext::new(config, FileSessionStore::new(dir.path().join("session.json")))
    }

    /// A fresh context over the same session file, as the next invocation
    /// of the binary would see it.
    fn reopen(&self) -> AppContext {
        Self::build(&self.mock_server, &self.dir)
    }

    fn session_file(&self) -> Value {
        let raw = std::fs::read_to_string(self.dir.path().join("session.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    async fn mount_login(&self, user_id: i64) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Status": "Success",
                "token": TOKEN,
                "User": { "id": user_id, "email": "admin@example.com" }
            })))
            .mount(&self.mock_server)
            .await;
    }

    /// Every users command loads the list exactly once.
    async fn mount_users(&self, users: Value) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(users))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    async fn sign_in(&mut self, user_id: i64) {
        self.mount_login(user_id).await;
        run_login(
            &mut self.ctx,
            Some("admin@example.com".to_owned()),
            Some("secret".to_owned()),
        )
        .await
        .unwrap();
    }
}

fn users() -> Value {
    json!([
        { "id": 1, "name": "Ann", "email": "ann@example.com",
          "lastLogin": "2024-05-01T10:00:00Z", "status": "active" },
        { "id": 2, "name": "Bob", "email": "bob@example.com",
          "lastLogin": null, "status": "active" },
        { "id": 3, "name": "Cid", "email": "cid@example.com",
          "lastLogin": "2024-04-01T10:00:00Z", "status": "blocked" }
    ])
}

fn ids(ids: &[i64]) -> Selection {
    Selection {
        ids: ids.to_vec(),
        all: false,
    }
}

#[tokio::test]
async fn test_login_persists_session_for_next_run() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;

    let file = t.session_file();
    assert_eq!(file["authToken"], TOKEN);
    assert_eq!(file["userData"]["id"], 1);

    let next = t.reopen();
    assert!(next.session.is_authenticated());
    assert_eq!(next.session.current_user().map(|u| u.id), Some(1));
}

#[tokio::test]
async fn test_login_rejected_leaves_no_session() {
    let mut t = CliTestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": "Failed" })))
        .mount(&t.mock_server)
        .await;

    let err = run_login(
        &mut t.ctx,
        Some("admin@example.com".to_owned()),
        Some("wrong".to_owned()),
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("Invalid email or password"));
    assert!(!t.ctx.session.is_authenticated());
    assert!(!t.reopen().session.is_authenticated());
}

#[tokio::test]
async fn test_logout_removes_session_file() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;

    run_logout(&mut t.ctx).unwrap();

    assert!(!t.ctx.session.is_authenticated());
    assert!(!t.dir.path().join("session.json").exists());
    assert!(!t.reopen().session.is_authenticated());
}

#[tokio::test]
async fn test_list_users() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;
    t.mount_users(users()).await;

    run_list(&mut t.ctx).await.unwrap();

    t.mock_server.verify().await;
    assert!(t.ctx.session.is_authenticated());
}

#[tokio::test]
async fn test_list_users_backend_error() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&t.mock_server)
        .await;

    let err = run_list(&mut t.ctx).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error fetching users. Please try again later."
    );
}

#[tokio::test]
async fn test_block_selected_ids() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;
    t.mount_users(users()).await;

    Mock::given(method("POST"))
        .and(path("/users/block"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(json!({ "ids": [2, 3] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Users blocked" })),
        )
        .expect(1)
        .mount(&t.mock_server)
        .await;

    // Duplicates collapse to one selection.
    run_action(&mut t.ctx, BulkAction::Block, &ids(&[3, 2, 3]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unblock_all() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;
    t.mount_users(users()).await;

    Mock::given(method("POST"))
        .and(path("/users/unblock"))
        .and(body_json(json!({ "ids": [1, 2, 3] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    let all = Selection {
        ids: Vec::new(),
        all: true,
    };
    run_action(&mut t.ctx, BulkAction::Unblock, &all)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_id_sends_nothing() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;
    t.mount_users(users()).await;

    Mock::given(method("POST"))
        .and(path("/users/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&t.mock_server)
        .await;

    let err = run_action(&mut t.ctx, BulkAction::Delete, &ids(&[2, 42]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("42"));
}

#[tokio::test]
async fn test_failed_action_keeps_session() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;
    t.mount_users(users()).await;

    Mock::given(method("POST"))
        .and(path("/users/delete"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&t.mock_server)
        .await;

    let err = run_action(&mut t.ctx, BulkAction::Delete, &ids(&[1]))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to delete users. Please try again.");
    assert!(t.ctx.session.is_authenticated());
    assert!(t.reopen().session.is_authenticated());
}

#[tokio::test]
async fn test_deleting_own_account_signs_out() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;
    t.mount_users(users()).await;

    Mock::given(method("POST"))
        .and(path("/users/delete"))
        .and(body_json(json!({ "ids": [1, 2] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    run_action(&mut t.ctx, BulkAction::Delete, &ids(&[1, 2]))
        .await
        .unwrap();

    assert!(!t.ctx.session.is_authenticated());
    assert!(!t.reopen().session.is_authenticated());
}

#[tokio::test]
async fn test_deleting_others_keeps_session() {
    let mut t = CliTestContext::new().await;
    t.sign_in(1).await;
    t.mount_users(users()).await;

    Mock::given(method("POST"))
        .and(path("/users/delete"))
        .and(body_json(json!({ "ids": [2] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    run_action(&mut t.ctx, BulkAction::Delete, &ids(&[2]))
        .await
        .unwrap();

    assert!(t.ctx.session.is_authenticated());
}
