use anyhow::Context as _;
use ryde_client_core::{AccessDecision, AccessGate, AuthOutcome, Client, Destination};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};
use tracing::{info, warn};

use crate::command::{Command, CommandName};

/// Whether the loop should keep reading after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Reads commands line by line until `quit` or the end of `input`
pub async fn run<R>(client: &Client, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    println!("Type `help` to see the available commands");
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e:#}");
                continue;
            }
        };
        match execute(client, command).await {
            Ok(Flow::Continue(output)) => println!("{output}"),
            Ok(Flow::Quit) => break,
            Err(e) => {
                warn!(?e, "command failed");
                println!("Error: {e:#}");
            }
        }
    }
    info!("leaving the command loop");
    Ok(())
}

#[tracing::instrument(skip(client))]
pub async fn execute(client: &Client, command: Command) -> anyhow::Result<Flow> {
    let output = match command {
        Command::Login(args) => {
            let outcome = client
                .login(args, no_cb)
                .await
                .context("login was cancelled")??;
            describe_auth(client, outcome)
        }
        Command::Register(args) => {
            let outcome = client
                .register(&args, no_cb)
                .await
                .context("registration was cancelled")??;
            describe_auth(client, outcome)
        }
        Command::Logout => {
            client.logout(no_cb).await.context("logout was cancelled")?;
            "Logged out".to_string()
        }
        Command::Refresh => {
            match client
                .refresh_access_token(no_cb)
                .await
                .context("refresh was cancelled")??
            {
                Some(_) => "Access token refreshed".to_string(),
                None => "No session to refresh".to_string(),
            }
        }
        Command::Whoami => describe_identity(client),
        Command::Profile => {
            let profile = client
                .get_profile(no_cb)
                .await
                .context("profile request was cancelled")??;
            format!(
                "{} {} <{}> {}",
                profile.first_name,
                profile.last_name,
                profile.email.as_deref().unwrap_or("no email"),
                profile.phone_number.as_deref().unwrap_or("no phone number"),
            )
        }
        Command::Visit(path) => visit(client, &path),
        Command::Verify => {
            if client.session().verify_access_token_shape() {
                "Access token looks valid".to_string()
            } else {
                "Access token missing or malformed, session cleared".to_string()
            }
        }
        Command::Help => format!("Commands:\n{}", CommandName::help_text()),
        Command::Quit => return Ok(Flow::Quit),
    };
    Ok(Flow::Continue(output))
}

fn describe_auth(client: &Client, outcome: AuthOutcome) -> String {
    match outcome {
        AuthOutcome::SessionEstablished(user) => {
            let landing = AccessGate::new(client.session()).landing();
            let name = user
                .map(|user| user.full_name())
                .unwrap_or_else(|| "unknown user".to_string());
            format!("Welcome {name}, landing on {}", landing.path())
        }
        AuthOutcome::NoSession => "Registration accepted, please log in".to_string(),
    }
}

fn describe_identity(client: &Client) -> String {
    let session = client.session();
    let Some(profile) = session.authenticated_profile() else {
        return "Not logged in".to_string();
    };
    let name = session
        .current_identity()
        .map(|user| user.full_name())
        .unwrap_or_else(|| "unknown user".to_string());
    let user_type = profile
        .user_type
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string());
    format!(
        "{name} (user type: {user_type}, staff: {}, superuser: {})",
        profile.is_staff, profile.is_superuser
    )
}

fn visit(client: &Client, path: &str) -> String {
    let Some(destination) = Destination::from_path(path) else {
        return format!("No page at {path}");
    };
    match AccessGate::new(client.session()).navigate(destination) {
        AccessDecision::Allow => format!("Showing {}", destination.path()),
        AccessDecision::Redirect(to) => format!("Redirected to {}", to.path()),
    }
}

fn no_cb() {}
