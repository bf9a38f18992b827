//! Register command implementation.

use std::io::IsTerminal as _;

use anyhow::{Context as _, Result};
use homecomfort_business::{RegistrationForm, register};
use inquire::{Confirm, Text};
use tracing::{error, instrument};

use crate::commands::login::{prompt_email, prompt_password, run_login};
use crate::context::AppContext;
use crate::output::Output;

/// Creates an account; on an interactive terminal offers to sign in with the
/// new credentials right away.
#[instrument(skip_all, name = "register")]
pub async fn run_register(
    ctx: &mut AppContext,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let out = Output::new();

    if username.is_none() || email.is_none() || password.is_none() {
        out.header("Create a HomeComfort account");
        out.newline();
    }

    let username = match username {
        Some(username) => username,
        None => Text::new("Name:")
            .prompt()
            .context("Failed to read name")?,
    };
    let email = match email {
        Some(email) => email,
        None => prompt_email(None)?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt_password(true)?,
    };

    let form = RegistrationForm {
        username,
        email,
        password,
    };

    let prefill = match register(&ctx.api, &form).await {
        Ok(prefill) => prefill,
        Err(e) => {
            error!("Registration failed: {e}");
            return Err(anyhow::Error::new(e).context("Registration failed"));
        }
    };

    out.success(format!("Account created for {}", prefill.email));

    if !std::io::stdin().is_terminal() {
        out.dim("Run 'homecomfort login' to sign in.");
        return Ok(());
    }

    let sign_in_now = Confirm::new("Sign in now?")
        .with_default(true)
        .prompt()
        .context("Failed to read answer")?;
    if sign_in_now {
        run_login(ctx, Some(prefill.email), Some(prefill.password)).await?;
    }

    Ok(())
}
