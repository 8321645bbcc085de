use crate::helpers::{login, no_cb, spawn_app, spawn_app_with_storage};
use ryde_client_core::{MemoryStorage, SessionStorage as _};
use ryde_shared::errors::ApiError;

#[tokio::test]
async fn refresh_replaces_access_token_only() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    let session = app.core_client.session();
    let old_access = session.access_token().unwrap();
    let refresh = session.refresh_token().unwrap();
    let identity = session.current_identity();

    // Act
    let new_access = app
        .core_client
        .refresh_access_token(no_cb)
        .await
        .unwrap()
        .unwrap()
        .expect("refresh token was stored");

    // Assert
    assert_ne!(new_access, old_access);
    assert_eq!(session.access_token(), Some(new_access));
    assert_eq!(session.refresh_token(), Some(refresh));
    assert_eq!(session.current_identity(), identity);
    assert_eq!(app.backend.refresh_calls(), 1);
}

#[tokio::test]
async fn refresh_without_refresh_token_does_not_call_backend() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let outcome = app
        .core_client
        .refresh_access_token(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(outcome.is_none());
    assert_eq!(app.backend.refresh_calls(), 0);
    assert!(!app.core_client.is_logged_in());
}

#[tokio::test]
async fn rejected_refresh_clears_session() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    app.backend.revoke_refresh_tokens();

    // Act
    let outcome = app.core_client.refresh_access_token(no_cb).await.unwrap();

    // Assert
    let err = outcome.unwrap_err();
    assert!(err.downcast_ref::<ApiError>().unwrap().is_unauthorized());
    let session = app.core_client.session();
    assert!(!session.is_authenticated());
    assert!(session.refresh_token().is_none());
    assert!(session.current_identity().is_none());
}

#[tokio::test]
async fn refresh_result_is_seen_by_clones() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    let other_tab_view = app.core_client.clone();

    // Act
    let new_access = app
        .core_client
        .refresh_access_token(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(other_tab_view.session().access_token(), new_access);
}

#[tokio::test]
async fn refresh_without_refresh_token_removes_every_key() {
    // Arrange
    let mut storage = MemoryStorage::new();
    let app = spawn_app_with_storage(storage.clone()).await;
    login(&app).await.unwrap();
    storage.remove_item("refresh_token");
    assert!(app.core_client.is_logged_in());

    // Act
    let outcome = app
        .core_client
        .refresh_access_token(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(outcome.is_none());
    assert!(storage.is_empty(), "keys left behind: {storage:?}");
    assert_eq!(app.backend.refresh_calls(), 0);
}

#[tokio::test]
async fn concurrent_refreshes_keep_session_whole() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    let session = app.core_client.session();
    let refresh = session.refresh_token().unwrap();
    let identity = session.current_identity();

    // Act
    let first = app.core_client.refresh_access_token(no_cb);
    let second = app.core_client.refresh_access_token(no_cb);
    let first = first.await.unwrap();
    let second = second.await.unwrap();

    // Assert
    assert!(first.unwrap().is_some());
    assert!(second.unwrap().is_some());
    assert!(session.verify_access_token_shape());
    assert_eq!(session.refresh_token(), Some(refresh));
    assert_eq!(session.current_identity(), identity);
    assert_eq!(app.backend.refresh_calls(), 2);
}

#[tokio::test]
async fn concurrent_rejected_refreshes_clear_everything() {
    // Arrange
    let storage = MemoryStorage::new();
    let app = spawn_app_with_storage(storage.clone()).await;
    login(&app).await.unwrap();
    app.backend.revoke_refresh_tokens();

    // Act
    let first = app.core_client.refresh_access_token(no_cb);
    let second = app.core_client.refresh_access_token(no_cb);
    let first = first.await.unwrap();
    let second = second.await.unwrap();

    // Assert
    assert!(first.is_err());
    assert!(second.is_err());
    assert!(!app.core_client.is_logged_in());
    assert!(storage.is_empty(), "keys left behind: {storage:?}");
}
