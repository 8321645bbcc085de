use anyhow::{bail, Context as _};
use futures::channel::oneshot;
use ryde_shared::{
    const_config::path::{
        PathSpec, PATH_AUTH_CUSTOMER_PROFILE, PATH_AUTH_LOGIN, PATH_AUTH_LOGOUT,
        PATH_AUTH_REGISTER, PATH_AUTH_TOKEN_REFRESH,
    },
    errors::{NotLoggedInError, SessionError},
    req_args::{LoginReqArgs, RegisterReqArgs},
    token::{AccessToken, RefreshToken},
    uac::{CustomerProfile, RefreshResponse},
};
use secrecy::ExposeSecret as _;
use std::fmt::Debug;
use tracing::{info, warn};

use crate::{
    client::{is_unauthorized, process_auth, process_empty, process_json_body, UiCallBack},
    AuthOutcome, Client, SessionStore, DUMMY_ARGUMENT,
};

impl Client {
    /// Stores the returned tokens and user if the backend issues them
    #[tracing::instrument(skip(args, ui_notify), fields(email = %args.email))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<AuthOutcome>> {
        let body = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        self.send_auth_request(PATH_AUTH_LOGIN, &body, ui_notify)
    }

    /// Validates the fields that depend on each other before anything is
    /// sent. On success behaves like [`Client::login`].
    #[tracing::instrument(skip(args, ui_notify), fields(email = %args.email, user_type = %args.user_type))]
    pub fn register<F: UiCallBack>(
        &self,
        args: &RegisterReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<AuthOutcome>> {
        if let Err(err) = args.validate() {
            let (tx, rx) = oneshot::channel();
            tx.send(Err(err.into())).expect("failed to send oneshot msg");
            ui_notify();
            return rx;
        }
        self.send_auth_request(PATH_AUTH_REGISTER, &args.to_json(), ui_notify)
    }

    fn send_auth_request<F: UiCallBack>(
        &self,
        path_spec: PathSpec,
        body: &serde_json::Value,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<AuthOutcome>> {
        let (tx, rx) = oneshot::channel();
        let session = self.session.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_auth(resp, session).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(path_spec, body, on_done);
        rx
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Resolves to `None` without touching the network if there is no
    /// refresh token, the session is cleared in that case. Any failure also
    /// clears the session and is returned.
    #[tracing::instrument(skip(ui_notify))]
    pub fn refresh_access_token<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Option<AccessToken>>> {
        let (tx, rx) = oneshot::channel();
        let Some(refresh) = self.session.refresh_token() else {
            info!(reason = %SessionError::NoRefreshToken, "clearing session");
            self.session.clear();
            tx.send(Ok(None)).expect("failed to send oneshot msg");
            ui_notify();
            return rx;
        };
        let body = serde_json::json!({ "refresh": refresh.as_str() });
        let session = self.session.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_refresh(resp, session, refresh).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(PATH_AUTH_TOKEN_REFRESH, &body, on_done);
        rx
    }

    /// Clears the session right away then lets the backend know. The
    /// receiver resolves once the backend was notified, a failure to notify
    /// is only logged.
    #[tracing::instrument(skip(ui_notify))]
    pub fn logout<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let refresh = self.session.refresh_token();
        self.session.clear(); // Clear even if the backend is unreachable
        let Some(refresh) = refresh else {
            tx.send(()).expect("failed to send oneshot msg");
            ui_notify();
            return rx;
        };
        let body = serde_json::json!({ "refresh": refresh.as_str() });
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            ryde_shared::log_err_as_warn!(process_empty(resp).await);
            tx.send(()).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(PATH_AUTH_LOGOUT, &body, on_done);
        rx
    }

    #[tracing::instrument]
    pub fn logout_no_wait(&self) {
        let refresh = self.session.refresh_token();
        self.session.clear(); // Clear even if the backend is unreachable
        if let Some(refresh) = refresh {
            let body = serde_json::json!({ "refresh": refresh.as_str() });
            self.send_request_no_wait(PATH_AUTH_LOGOUT, &body);
        }
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_profile<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<CustomerProfile>> {
        self.send_authorized_expect_json(PATH_AUTH_CUSTOMER_PROFILE, DUMMY_ARGUMENT, ui_notify)
    }

    /// Sends a request that needs the access token. If the backend rejects
    /// the token the access token is refreshed once and the request is
    /// retried exactly once.
    fn send_authorized_expect_json<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        F: UiCallBack,
        T: serde::Serialize + Debug + Clone + Send + 'static,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        if !self.session.is_authenticated() {
            tx.send(Err(NotLoggedInError.into()))
                .expect("failed to send oneshot msg");
            ui_notify();
            return rx;
        }
        let client = self.clone();
        let retry_spec = path_spec.clone();
        let retry_args = args.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let first = process_json_body(resp).await;
            let msg = client
                .retry_once_if_unauthorized(first, retry_spec, retry_args)
                .await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(path_spec, &args, on_done);
        rx
    }

    async fn retry_once_if_unauthorized<T, U>(
        &self,
        first: anyhow::Result<U>,
        path_spec: PathSpec,
        args: T,
    ) -> anyhow::Result<U>
    where
        T: serde::Serialize + Debug,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        let err = match first {
            Err(err) if is_unauthorized(&err) => err,
            other => return other,
        };
        info!(?err, "access token rejected, refreshing before retrying once");
        let refreshed = self
            .refresh_access_token(no_cb)
            .await
            .context("token refresh was cancelled")??;
        if refreshed.is_none() {
            bail!(NotLoggedInError);
        }
        self.send_request_expect_json(path_spec, &args)
            .await
            .context("retried request was cancelled")?
    }
}

#[tracing::instrument(ret, err(Debug), skip(session))]
async fn process_refresh(
    response: reqwest::Result<reqwest::Response>,
    session: SessionStore,
    used: RefreshToken,
) -> anyhow::Result<Option<AccessToken>> {
    let access = match parse_refresh_response(response).await {
        Ok(access) => access,
        Err(err) => {
            warn!(?err, "token refresh failed, clearing session");
            session.clear_if_current(&used);
            return Err(err);
        }
    };
    session.replace_access_token(&used, &access)?;
    Ok(Some(access))
}

async fn parse_refresh_response(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<AccessToken> {
    let body: RefreshResponse = process_json_body(response).await?;
    AccessToken::try_from(body.access).context("refresh response held an empty access token")
}

fn no_cb() {}
