#![warn(unused_crate_dependencies)]

use actix_web::web;
use ryde_shared::{
    req_args::{LoginReqArgs, RegisterReqArgs},
    telemetry::{self, get_subscriber, init_subscriber},
    uac::{ResponderType, UserRecord, UserType},
};
use std::fmt::Debug;
use std::ops::Deref;
use std::sync::LazyLock;
use uuid::Uuid;

mod stub_backend;

pub use stub_backend::{spawn_stub_backend, StubBackend};

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub struct TestApp<C> {
    /// Base url of the api, endpoint paths are appended to it
    pub address: String,
    pub backend: web::Data<StubBackend>,
    pub test_user: TestUser,
    pub core_client: C,
}

impl<C> Debug for TestApp<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .field("test_user", &self.test_user)
            .finish()
    }
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

/// Starts a fresh stub backend on a random port with one customer already
/// registered
pub async fn spawn_app<C, F>(build_client: F) -> TestApp<C>
where
    F: FnOnce(String) -> C,
{
    start_tracing();
    let backend = web::Data::new(StubBackend::default());
    let port = spawn_stub_backend(backend.clone(), "127.0.0.1:0")
        .expect("failed to start stub backend");
    let address = port_to_test_address(port);
    let test_user = TestUser::generate(UserType::Customer);
    test_user.store(&backend);
    let core_client = build_client(address.clone());
    TestApp {
        address,
        backend,
        test_user,
        core_client,
    }
}

pub fn port_to_test_address(port: u16) -> String {
    format!("http://127.0.0.1:{port}/api")
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

#[derive(Debug)]
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub is_staff: bool,
}

impl TestUser {
    pub fn generate(user_type: UserType) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            email: format!("{user_type}-{}@example.com", &id[..12]),
            password: Uuid::new_v4().to_string(),
            first_name: "Test".to_string(),
            last_name: user_type.as_str().replace('_', " "),
            user_type,
            is_staff: false,
        }
    }

    pub fn generate_staff() -> Self {
        Self {
            is_staff: true,
            ..Self::generate(UserType::Other("admin".to_string()))
        }
    }

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(self.email.clone(), self.password.clone().into())
    }

    pub fn wrong_password_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(self.email.clone(), Uuid::new_v4().to_string().into())
    }

    /// Arguments that pass client side validation for this user's type
    pub fn register_args(&self) -> RegisterReqArgs {
        let mut result = RegisterReqArgs {
            email: self.email.clone(),
            password: self.password.clone().into(),
            password2: self.password.clone().into(),
            user_type: self.user_type.clone(),
            phone_number: "+254700000000".to_string(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            driver_license: None,
            responder_type: None,
        };
        if self.user_type.is_driver_kind() {
            result.driver_license = Some("DL-0001".to_string());
        }
        if self.user_type == UserType::EmergencyResponder {
            result.responder_type = Some(ResponderType::Ambulance);
        }
        result
    }

    /// Makes the user known to the backend without going through registration
    pub fn store(&self, backend: &StubBackend) {
        let record = UserRecord {
            id: backend.next_user_id(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: Some(self.email.clone()),
            phone_number: None,
            user_type: Some(self.user_type.clone()),
            is_staff: self.is_staff,
            is_superuser: false,
        };
        backend.add_user(&self.email, &self.password, record);
    }
}
