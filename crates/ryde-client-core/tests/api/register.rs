use crate::helpers::{no_cb, spawn_app, TestUser};
use ryde_client_core::AuthOutcome;
use ryde_shared::uac::{RegistrationError, ResponderType, UserType};

#[tokio::test]
async fn register_customer_establishes_session() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate(UserType::Customer);

    // Act
    let outcome = app
        .core_client
        .register(&new_user.register_args(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(outcome.is_session_established());
    let identity = app.core_client.session().current_identity().unwrap();
    assert_eq!(identity.email.as_deref(), Some(new_user.email.as_str()));
    let body = app.backend.last_register_body().unwrap();
    assert!(body.get("driver_license").is_none());
    assert!(body.get("responder_type").is_none());
}

#[tokio::test]
async fn register_boda_rider_sends_license() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate(UserType::BodaRider);

    // Act
    app.core_client
        .register(&new_user.register_args(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let body = app.backend.last_register_body().unwrap();
    assert_eq!(body["user_type"], "boda_rider");
    assert_eq!(body["driver_license"], "DL-0001");
    assert_eq!(
        app.core_client
            .session()
            .authenticated_profile()
            .unwrap()
            .user_type,
        Some(UserType::BodaRider)
    );
}

#[tokio::test]
async fn register_responder_sends_responder_type() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate(UserType::EmergencyResponder);

    // Act
    app.core_client
        .register(&new_user.register_args(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let body = app.backend.last_register_body().unwrap();
    assert_eq!(body["responder_type"], ResponderType::Ambulance.to_string());
    assert!(body.get("driver_license").is_none());
}

#[tokio::test]
async fn register_without_tokens_leaves_session_empty() {
    // Arrange
    let app = spawn_app().await;
    app.backend.withhold_tokens_on_register();
    let new_user = TestUser::generate(UserType::Customer);

    // Act
    let outcome = app
        .core_client
        .register(&new_user.register_args(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(outcome, AuthOutcome::NoSession);
    assert!(!app.core_client.is_logged_in());
    assert!(app.core_client.session().current_identity().is_none());
}

#[tokio::test]
async fn register_driver_without_license_is_not_sent() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate(UserType::Driver);
    let mut args = new_user.register_args();
    args.driver_license = None;

    // Act
    let outcome = app.core_client.register(&args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().downcast::<RegistrationError>().unwrap(),
        RegistrationError::MissingDriverLicense(UserType::Driver)
    );
    assert!(app.backend.last_register_body().is_none());
}

#[tokio::test]
async fn register_mismatched_passwords_is_not_sent() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate(UserType::Customer);
    let mut args = new_user.register_args();
    args.password2 = "something else".to_string().into();

    // Act
    let outcome = app.core_client.register(&args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().downcast::<RegistrationError>().unwrap(),
        RegistrationError::PasswordsDoNotMatch
    );
    assert!(app.backend.last_register_body().is_none());
}

#[tokio::test]
async fn register_existing_email_shows_backend_message() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let outcome = app
        .core_client
        .register(&app.test_user.register_args(), no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "user with this email already exists."
    );
    assert!(!app.core_client.is_logged_in());
}
