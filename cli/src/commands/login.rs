//! Login command implementation.

use anyhow::{Context as _, Result};
use homecomfort_business::{Credentials, sign_in};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{error, info, instrument};

use crate::context::AppContext;
use crate::output::Output;

pub(crate) fn prompt_email(default: Option<&str>) -> Result<String> {
    let mut prompt = Text::new("Email:");
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    prompt.prompt().context("Failed to read email")
}

pub(crate) fn prompt_password(confirm: bool) -> Result<String> {
    let mut prompt = Password::new("Password:").with_display_mode(PasswordDisplayMode::Masked);
    if !confirm {
        prompt = prompt.without_confirmation();
    }
    prompt.prompt().context("Failed to read password")
}

/// Signs in with the given credentials, prompting for whatever is missing.
#[instrument(skip_all, name = "login")]
pub async fn run_login(
    ctx: &mut AppContext,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let out = Output::new();

    let email = match email {
        Some(email) => email,
        None => {
            out.header("Sign in to HomeComfort");
            out.newline();
            prompt_email(None)?
        }
    };
    let password = match password {
        Some(password) => password,
        None => prompt_password(false)?,
    };

    info!(email = %email, "Attempting login");

    let credentials = Credentials::new(email, password);
    match sign_in(&ctx.api, &mut ctx.session, &credentials).await {
        Ok(_) => {
            let who = ctx
                .session
                .current_user()
                .map(|u| u.email.clone())
                .unwrap_or(credentials.email);
            out.success(format!("Signed in as {who}"));
            out.dim(format!("Session saved to {}", ctx.session_path.display()));
            Ok(())
        }
        Err(e) => {
            error!("Login failed: {e}");
            Err(anyhow::Error::new(e).context("Login failed"))
        }
    }
}
