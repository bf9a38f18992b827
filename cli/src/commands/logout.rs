//! Logout command implementation.

use anyhow::{Context as _, Result};
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "logout")]
pub fn run_logout(ctx: &mut AppContext) -> Result<()> {
    let out = Output::new();

    if !ctx.session.is_authenticated() {
        out.dim("Not signed in.");
        return Ok(());
    }

    ctx.session
        .logout()
        .context("Failed to remove saved session")?;
    out.success("Signed out");
    Ok(())
}
