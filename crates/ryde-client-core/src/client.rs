use anyhow::Context;
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use reqwest::StatusCode;
use ryde_shared::{
    const_config::path::PathSpec,
    errors::ApiError,
    uac::{AuthResponse, UserRecord},
};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::{
    configuration::ClientConfiguration, storage::SessionStorage, MemoryStorage, SessionStore,
};

pub mod api;

pub const DUMMY_ARGUMENT: &[(&str, &str)] = &[("", "")];

/// A handle on one tab's connection to the backend.
///
/// Clones share the same session, so a refresh or logout through one clone is
/// seen by all of them.
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    session: SessionStore,
    inner: Arc<Mutex<ClientInner>>,
}

#[derive(Debug)]
struct ClientInner {
    api_base_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(
            ryde_shared::const_config::client::CLIENT_DEFAULT_API_URL.to_string(),
            MemoryStorage::new(),
        )
    }
}

/// Result of a successful login or registration
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Tokens (and the user if one was sent) are stored
    SessionEstablished(Option<UserRecord>),
    /// The backend accepted the request without issuing tokens
    NoSession,
}

impl AuthOutcome {
    /// Returns `true` if the auth outcome is [`SessionEstablished`].
    ///
    /// [`SessionEstablished`]: AuthOutcome::SessionEstablished
    #[must_use]
    pub fn is_session_established(&self) -> bool {
        matches!(self, Self::SessionEstablished(..))
    }
}

impl ClientInner {
    #[tracing::instrument]
    fn new(api_base_url: String) -> Self {
        Self { api_base_url }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(storage))]
    pub fn new<S: SessionStorage>(api_base_url: String, storage: S) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        Self {
            api_client,
            session: SessionStore::new(storage),
            inner: Arc::new(Mutex::new(ClientInner::new(api_base_url))),
        }
    }

    pub fn from_configuration<S: SessionStorage>(
        configuration: &ClientConfiguration,
        storage: S,
    ) -> Self {
        Self::new(configuration.api.base_url.clone(), storage)
    }

    /// The session backing this client. Reads through it never touch the
    /// network.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }

    #[tracing::instrument(skip(args, on_done))]
    // WARNING: Must skip args as it may contain passwords or tokens
    fn initiate_request<T, F, O>(&self, path_spec: PathSpec, args: &T, on_done: F)
    where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let is_get_method = path_spec.method == reqwest::Method::GET;
        let mut request = self
            .api_client
            .request(path_spec.method, self.path_to_url(path_spec.path));
        if !path_spec.is_public {
            request = request.headers(self.session.auth_header());
        }
        request = if is_get_method {
            request.query(&args)
        } else {
            request.json(&args)
        };
        reqwest_cross::fetch(request, on_done)
    }

    fn send_request_expect_json<T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize + std::fmt::Debug,
        U: Send + std::fmt::Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_json_body(resp).await;
            tx.send(msg).expect("failed to send oneshot msg");
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }

    fn send_request_no_wait<T>(&self, path_spec: PathSpec, args: &T)
    where
        T: serde::Serialize + std::fmt::Debug,
    {
        self.initiate_request(path_spec, args, |resp| async {
            ryde_shared::log_err_as_warn!(process_empty(resp).await);
        });
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!(
            "{}{path}",
            &self
                .inner
                .lock()
                .expect("failed to unlock client mutex")
                .api_base_url
        )
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_empty(response: reqwest::Result<reqwest::Response>) -> anyhow::Result<()> {
    let (response, status) = extract_response(response)?;
    if status.is_success() {
        Ok(())
    } else {
        Err(handle_error(response).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(response: reqwest::Result<reqwest::Response>) -> anyhow::Result<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    if status.is_success() {
        Ok(response
            .json()
            .await
            .context("failed to parse result as json")?)
    } else {
        Err(handle_error(response).await)
    }
}

/// Stores the session if the response carries one
#[tracing::instrument(ret, err(Debug), skip(session))]
async fn process_auth(
    response: reqwest::Result<reqwest::Response>,
    session: SessionStore,
) -> anyhow::Result<AuthOutcome> {
    let auth_response: AuthResponse = process_json_body(response).await?;
    let Some((tokens, user)) = auth_response.into_session_parts() else {
        info!("auth response did not include tokens");
        return Ok(AuthOutcome::NoSession);
    };
    session.establish(&tokens, user.as_ref());
    Ok(AuthOutcome::SessionEstablished(user))
}

/// Converts a failed response into an [`ApiError`] carrying the message the
/// backend sent
#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let Ok(body) = response.text().await else {
        return ApiError::from_body(status, "").into();
    };
    ApiError::from_body(status, &body).into()
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<(reqwest::Response, StatusCode)> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response.context("failed to send request")?;
    let status = response.status();
    Ok((response, status))
}

/// Returns `true` if `err` is the backend rejecting the access token
pub(crate) fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_unauthorized)
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
