use crate::helpers::{login, login_as, no_cb, spawn_app, TestUser};
use ryde_client_core::AuthOutcome;
use ryde_shared::{errors::ApiError, uac::UserType};

#[tokio::test]
async fn login_failure_wrong_password() {
    // Arrange
    let app = spawn_app().await;
    let login_args = app.test_user.wrong_password_args();

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    let err = outcome.unwrap_err();
    assert_eq!(
        err.to_string(),
        "No active account found with the given credentials"
    );
    assert!(err.downcast_ref::<ApiError>().unwrap().is_unauthorized());
    assert!(!app.core_client.is_logged_in());
}

#[tokio::test]
async fn login_failure_unknown_user() {
    // Arrange
    let app = spawn_app().await;
    let stranger = TestUser::generate(UserType::Customer);

    // Act
    let outcome = login_as(&app, &stranger).await;

    // Assert
    assert!(outcome.is_err());
    assert!(app.core_client.session().current_identity().is_none());
}

#[tokio::test]
async fn login_establishes_session() {
    // Arrange
    let app = spawn_app().await;
    assert!(
        !app.core_client.is_logged_in(),
        "should not be logged in before logging in"
    );

    // Act
    let outcome = login(&app).await.unwrap();

    // Assert
    let AuthOutcome::SessionEstablished(Some(user)) = outcome else {
        panic!("expected a session with a user but got {outcome:?}");
    };
    let session = app.core_client.session();
    assert!(session.is_authenticated());
    assert!(session.verify_access_token_shape());
    assert_eq!(session.current_identity().as_ref(), Some(&user));
    assert_eq!(user.email.as_deref(), Some(app.test_user.email.as_str()));
    assert_eq!(user.full_name(), "Test customer");
    let profile = session.authenticated_profile().unwrap();
    assert_eq!(profile.user_type, Some(UserType::Customer));
    assert!(!profile.is_admin());
}

#[tokio::test]
async fn second_login_replaces_session() {
    // Arrange
    let app = spawn_app().await;
    let driver = TestUser::generate(UserType::Driver);
    driver.store(&app.backend);
    login(&app).await.unwrap();
    let first_refresh = app.core_client.session().refresh_token().unwrap();

    // Act
    login_as(&app, &driver).await.unwrap();

    // Assert
    let session = app.core_client.session();
    assert_ne!(session.refresh_token().unwrap(), first_refresh);
    assert_eq!(
        session.current_identity().unwrap().user_type,
        Some(UserType::Driver)
    );
}
