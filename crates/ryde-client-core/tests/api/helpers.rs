use ryde_client_core::{AuthOutcome, Client, MemoryStorage};
use ryde_test_helper::spawn_app as spawn_stub_app;

pub use ryde_test_helper::{no_cb, TestUser};

pub type TestApp = ryde_test_helper::TestApp<Client>;

pub async fn spawn_app() -> TestApp {
    spawn_app_with_storage(MemoryStorage::new()).await
}

/// Keep a clone of `storage` to look at the raw keys the client writes
pub async fn spawn_app_with_storage(storage: MemoryStorage) -> TestApp {
    spawn_stub_app(|address| Client::new(address, storage)).await
}

/// Logs in as the user created with the app
pub async fn login(app: &TestApp) -> anyhow::Result<AuthOutcome> {
    login_as(app, &app.test_user).await
}

pub async fn login_as(app: &TestApp, user: &TestUser) -> anyhow::Result<AuthOutcome> {
    app.core_client
        .login(user.login_args(), no_cb)
        .await
        .expect("failed to receive on rx")
}
