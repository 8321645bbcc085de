use crate::helpers::{login, login_as, no_cb, spawn_app, TestUser};
use ryde_client_core::{AccessDecision, AccessGate, Destination};
use ryde_shared::uac::UserType;

#[tokio::test]
async fn visitor_is_sent_to_login() {
    // Arrange
    let app = spawn_app().await;
    let gate = AccessGate::new(app.core_client.session());

    // Act + Assert
    assert_eq!(
        gate.navigate(Destination::RequestRide),
        AccessDecision::Redirect(Destination::Login)
    );
    assert!(gate.navigate(Destination::Chatbot).is_allow());
}

#[tokio::test]
async fn customer_lands_on_dashboard_and_is_kept_off_driver_pages() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    let gate = AccessGate::new(app.core_client.session());

    // Act + Assert
    assert_eq!(gate.landing(), Destination::CustomerDashboard);
    assert!(gate.navigate(Destination::MyRides).is_allow());
    assert_eq!(
        gate.navigate(Destination::DriverDashboard),
        AccessDecision::Redirect(Destination::CustomerDashboard)
    );
}

#[tokio::test]
async fn boda_rider_shares_driver_dashboard() {
    // Arrange
    let app = spawn_app().await;
    let rider = TestUser::generate(UserType::BodaRider);
    rider.store(&app.backend);
    login_as(&app, &rider).await.unwrap();
    let gate = AccessGate::new(app.core_client.session());

    // Act + Assert
    assert_eq!(gate.landing(), Destination::DriverDashboard);
    assert!(gate.navigate(Destination::DriverDashboard).is_allow());
    assert_eq!(
        gate.navigate(Destination::RequestRide),
        AccessDecision::Redirect(Destination::DriverDashboard)
    );
}

#[tokio::test]
async fn staff_is_always_sent_to_admin_dashboard() {
    // Arrange
    let app = spawn_app().await;
    let admin = TestUser::generate_staff();
    admin.store(&app.backend);
    login_as(&app, &admin).await.unwrap();
    let gate = AccessGate::new(app.core_client.session());

    // Act + Assert
    assert_eq!(gate.landing(), Destination::AdminDashboard);
    assert!(gate.navigate(Destination::AdminDashboard).is_allow());
    assert_eq!(
        gate.navigate(Destination::CustomerDashboard),
        AccessDecision::Redirect(Destination::AdminDashboard)
    );
}

#[tokio::test]
async fn logout_is_picked_up_on_next_navigation() {
    // Arrange
    let app = spawn_app().await;
    login(&app).await.unwrap();
    let gate = AccessGate::new(app.core_client.session());
    assert!(gate.navigate(Destination::CustomerDashboard).is_allow());

    // Act
    app.core_client.logout(no_cb).await.unwrap();

    // Assert
    assert_eq!(
        gate.navigate(Destination::CustomerDashboard),
        AccessDecision::Redirect(Destination::Login)
    );
}
