use crate::helpers::{login, no_cb, spawn_app, spawn_app_with_storage};
use ryde_client_core::MemoryStorage;

#[tokio::test]
async fn logout_clears_session_and_revokes_refresh_token() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    let refresh = app.core_client.session().refresh_token().unwrap();

    // Act
    app.core_client.logout(no_cb).await.unwrap();

    // Assert
    let session = app.core_client.session();
    assert!(!session.is_authenticated());
    assert!(session.current_identity().is_none());
    assert!(session.authenticated_profile().is_none());
    assert_eq!(app.backend.logged_out_tokens(), vec![refresh.as_str()]);
    assert!(!app.backend.is_refresh_token_valid(refresh.as_str()));
}

#[tokio::test]
async fn logout_without_session_does_not_call_backend() {
    // Arrange
    let app = spawn_app().await;

    // Act
    app.core_client.logout(no_cb).await.unwrap();

    // Assert
    assert!(app.backend.logged_out_tokens().is_empty());
}

#[tokio::test]
async fn logout_succeeds_locally_when_backend_rejects() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    app.backend.revoke_refresh_tokens();

    // Act
    app.core_client.logout(no_cb).await.unwrap();

    // Assert
    assert!(!app.core_client.is_logged_in());
    assert_eq!(app.backend.logged_out_tokens().len(), 1);
}

#[tokio::test]
async fn logout_removes_every_key() {
    // Arrange
    let storage = MemoryStorage::new();
    let app = spawn_app_with_storage(storage.clone()).await;
    login(&app).await.unwrap();
    assert!(!storage.is_empty());

    // Act
    app.core_client.logout(no_cb).await.unwrap();

    // Assert
    assert!(storage.is_empty());
}

#[tokio::test]
async fn logout_no_wait_clears_session_immediately() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();

    // Act
    app.core_client.logout_no_wait();

    // Assert
    assert!(!app.core_client.is_logged_in());
    assert!(app.core_client.session().refresh_token().is_none());
}
