use crate::helpers::{login, no_cb, spawn_app};
use ryde_shared::errors::{ApiError, NotLoggedInError};

#[tokio::test]
async fn profile_with_valid_token() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();

    // Act
    let profile = app.core_client.get_profile(no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(profile.first_name, app.test_user.first_name);
    assert_eq!(profile.email.as_deref(), Some(app.test_user.email.as_str()));
    assert_eq!(app.backend.refresh_calls(), 0);
    assert_eq!(app.backend.profile_calls(), 1);
}

#[tokio::test]
async fn profile_requires_login() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let outcome = app.core_client.get_profile(no_cb).await.unwrap();

    // Assert
    assert!(outcome.unwrap_err().is::<NotLoggedInError>());
    assert_eq!(app.backend.profile_calls(), 0);
}

#[tokio::test]
async fn expired_access_token_is_refreshed_and_request_retried_once() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    let stale_access = app.core_client.session().access_token().unwrap();
    app.backend.expire_access_tokens();

    // Act
    let profile = app.core_client.get_profile(no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(profile.last_name, app.test_user.last_name);
    assert_eq!(app.backend.refresh_calls(), 1);
    assert_eq!(app.backend.profile_calls(), 2);
    assert_ne!(
        app.core_client.session().access_token().unwrap(),
        stale_access
    );
}

#[tokio::test]
async fn failed_refresh_during_retry_logs_out() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    app.backend.expire_access_tokens();
    app.backend.revoke_refresh_tokens();

    // Act
    let outcome = app.core_client.get_profile(no_cb).await.unwrap();

    // Assert
    let err = outcome.unwrap_err();
    assert!(err.downcast_ref::<ApiError>().unwrap().is_unauthorized());
    assert!(!app.core_client.is_logged_in());
    assert_eq!(app.backend.profile_calls(), 1);
}
