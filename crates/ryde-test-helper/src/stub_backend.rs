//! In process stand in for the Ryde REST backend
//!
//! Only the authentication endpoints the client uses are served. Tokens are
//! opaque strings kept in memory so tests can revoke or expire them at will.

use std::{
    collections::HashMap,
    net::TcpListener,
    sync::{Mutex, MutexGuard},
};

use actix_web::{
    http::header::AUTHORIZATION,
    web::{self, ServiceConfig},
    App, HttpRequest, HttpResponse, HttpServer,
};
use anyhow::Context as _;
use ryde_shared::{
    id::UserId,
    uac::{AuthResponse, CustomerProfile, RefreshResponse, UserRecord, UserType},
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Shared state of the stub, tests inspect and tweak it through [`TestApp`]
///
/// [`TestApp`]: crate::TestApp
#[derive(Debug, Default)]
pub struct StubBackend {
    state: Mutex<StubState>,
}

#[derive(Debug, Default)]
struct StubState {
    users: HashMap<String, StoredUser>,
    access_tokens: HashMap<String, String>,
    refresh_tokens: HashMap<String, String>,
    next_user_id: u64,
    withhold_tokens_on_register: bool,
    last_register_body: Option<serde_json::Value>,
    refresh_calls: usize,
    profile_calls: usize,
    logged_out_tokens: Vec<String>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    password: String,
    record: UserRecord,
}

#[derive(Debug, serde::Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Debug, serde::Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
    password2: String,
    user_type: UserType,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

#[derive(Debug, serde::Deserialize)]
struct RefreshBody {
    refresh: String,
}

impl StubBackend {
    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("mutex poisoned")
    }

    /// Adds a user that can log in straight away
    pub fn add_user(&self, email: &str, password: &str, record: UserRecord) {
        self.lock().users.insert(
            email.to_string(),
            StoredUser {
                password: password.to_string(),
                record,
            },
        );
    }

    pub fn next_user_id(&self) -> UserId {
        let mut state = self.lock();
        state.next_user_id += 1;
        state.next_user_id.into()
    }

    /// Makes every access token issued so far unusable, refresh tokens keep
    /// working
    pub fn expire_access_tokens(&self) {
        self.lock().access_tokens.clear();
    }

    /// Makes every refresh token issued so far unusable
    pub fn revoke_refresh_tokens(&self) {
        self.lock().refresh_tokens.clear();
    }

    /// Registration still succeeds but the body carries no tokens
    pub fn withhold_tokens_on_register(&self) {
        self.lock().withhold_tokens_on_register = true;
    }

    pub fn last_register_body(&self) -> Option<serde_json::Value> {
        self.lock().last_register_body.clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.lock().refresh_calls
    }

    pub fn profile_calls(&self) -> usize {
        self.lock().profile_calls
    }

    /// Refresh tokens sent to the logout endpoint, oldest first
    pub fn logged_out_tokens(&self) -> Vec<String> {
        self.lock().logged_out_tokens.clone()
    }

    pub fn is_refresh_token_valid(&self, refresh: &str) -> bool {
        self.lock().refresh_tokens.contains_key(refresh)
    }

    fn issue_tokens(state: &mut StubState, email: &str) -> (String, String) {
        // Three dot separated segments like a real signed token
        let access = format!("stub.{}.sig", Uuid::new_v4().simple());
        let refresh = format!("refresh-{}", Uuid::new_v4().simple());
        state
            .access_tokens
            .insert(access.clone(), email.to_string());
        state
            .refresh_tokens
            .insert(refresh.clone(), email.to_string());
        (access, refresh)
    }
}

/// Binds to `addr` and starts serving on the current tokio runtime
///
/// Returns the port that was assigned
pub fn spawn_stub_backend(backend: web::Data<StubBackend>, addr: &str) -> anyhow::Result<u16> {
    let listener =
        TcpListener::bind(addr).with_context(|| format!("failed to bind to address: {addr}"))?;
    let port = listener
        .local_addr()
        .context("failed to get local address of listener")?
        .port();
    info!(?port, "Port assigned to the stub backend is {port}");
    let server = HttpServer::new(move || {
        App::new()
            .app_data(backend.clone())
            .service(web::scope("/api").configure(auth_routes))
    })
    .workers(1)
    .listen(listener)
    .context("failed to bind HTTP Server to listener")?
    .run();
    tokio::spawn(server);
    Ok(port)
}

fn auth_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login/", web::post().to(login))
            .route("/register/", web::post().to(register))
            .route("/token/refresh/", web::post().to(refresh))
            .route("/logout/", web::post().to(logout))
            .route("/customer/profile/", web::get().to(profile)),
    );
}

#[tracing::instrument(skip_all, fields(email = %body.email))]
async fn login(
    backend: web::Data<StubBackend>,
    web::Json(body): web::Json<LoginBody>,
) -> HttpResponse {
    let mut state = backend.lock();
    let record = match state.users.get(&body.email) {
        Some(user) if user.password == body.password => user.record.clone(),
        _ => {
            return HttpResponse::Unauthorized()
                .json(json!({ "detail": "No active account found with the given credentials" }))
        }
    };
    let (access, refresh) = StubBackend::issue_tokens(&mut state, &body.email);
    HttpResponse::Ok().json(AuthResponse {
        access: Some(access),
        refresh: Some(refresh),
        user: Some(record),
    })
}

#[tracing::instrument(skip_all)]
async fn register(
    backend: web::Data<StubBackend>,
    web::Json(raw): web::Json<serde_json::Value>,
) -> HttpResponse {
    let mut state = backend.lock();
    state.last_register_body = Some(raw.clone());
    let body: RegisterBody = match serde_json::from_value(raw) {
        Ok(body) => body,
        Err(e) => return HttpResponse::BadRequest().json(json!({ "detail": e.to_string() })),
    };
    if body.password != body.password2 {
        return HttpResponse::BadRequest()
            .json(json!({ "password": ["Password fields didn't match."] }));
    }
    if state.users.contains_key(&body.email) {
        return HttpResponse::BadRequest()
            .json(json!({ "email": ["user with this email already exists."] }));
    }
    state.next_user_id += 1;
    let record = UserRecord {
        id: state.next_user_id.into(),
        first_name: body.first_name,
        last_name: body.last_name,
        email: Some(body.email.clone()),
        phone_number: body.phone_number,
        user_type: Some(body.user_type),
        is_staff: false,
        is_superuser: false,
    };
    state.users.insert(
        body.email.clone(),
        StoredUser {
            password: body.password,
            record: record.clone(),
        },
    );
    let response = if state.withhold_tokens_on_register {
        AuthResponse {
            user: Some(record),
            ..Default::default()
        }
    } else {
        let (access, refresh) = StubBackend::issue_tokens(&mut state, &body.email);
        AuthResponse {
            access: Some(access),
            refresh: Some(refresh),
            user: Some(record),
        }
    };
    HttpResponse::Created().json(response)
}

#[tracing::instrument(skip_all)]
async fn refresh(
    backend: web::Data<StubBackend>,
    web::Json(body): web::Json<RefreshBody>,
) -> HttpResponse {
    let mut state = backend.lock();
    state.refresh_calls += 1;
    let Some(email) = state.refresh_tokens.get(&body.refresh).cloned() else {
        return token_not_valid();
    };
    let access = format!("stub.{}.sig", Uuid::new_v4().simple());
    state.access_tokens.insert(access.clone(), email);
    HttpResponse::Ok().json(RefreshResponse { access })
}

#[tracing::instrument(skip_all)]
async fn logout(
    backend: web::Data<StubBackend>,
    web::Json(body): web::Json<RefreshBody>,
) -> HttpResponse {
    let mut state = backend.lock();
    state.logged_out_tokens.push(body.refresh.clone());
    if state.refresh_tokens.remove(&body.refresh).is_none() {
        return token_not_valid();
    }
    HttpResponse::ResetContent().finish()
}

#[tracing::instrument(skip_all)]
async fn profile(backend: web::Data<StubBackend>, req: HttpRequest) -> HttpResponse {
    let mut state = backend.lock();
    state.profile_calls += 1;
    let email = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|access| state.access_tokens.get(access).cloned());
    let Some(record) = email.and_then(|email| state.users.get(&email).map(|u| u.record.clone()))
    else {
        return token_not_valid();
    };
    HttpResponse::Ok().json(CustomerProfile {
        first_name: record.first_name,
        last_name: record.last_name,
        email: record.email,
        phone_number: record.phone_number,
    })
}

fn token_not_valid() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({
        "detail": "Token is invalid or expired",
        "code": "token_not_valid",
    }))
}
