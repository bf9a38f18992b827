//! Per-invocation application context: configuration, API client and session.

use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use homecomfort_business::{Api, BusinessConfig, FileSessionStore, Guarded, Route, Session};
use tracing::{info, instrument};

use crate::commands::login::run_login;
use crate::output::Output;

pub struct AppContext {
    pub api: Api,
    pub session: Session,
    pub session_path: PathBuf,
}

impl AppContext {
    pub fn new(config: BusinessConfig, store: FileSessionStore) -> Self {
        let session_path = store.path().to_path_buf();
        Self {
            api: Api::new(config),
            session: Session::initialize(store),
            session_path,
        }
    }

    /// Context for a normal run: `--api-url` (or the environment) and the
    /// session file in the user's home directory.
    pub fn from_args(api_url: Option<&str>) -> Result<Self> {
        let config = match api_url {
            Some(url) => BusinessConfig::new(url),
            None => BusinessConfig::from_env(),
        }
        .context("Invalid API configuration")?;

        let store =
            FileSessionStore::default_location().context("Failed to locate session file")?;
        info!(api = config.api_base_url(), "using backend");

        Ok(Self::new(config, store))
    }
}

/// Gate for commands that need a session.
///
/// Signed out on an interactive terminal: prompts for a login. Otherwise
/// fails with a hint to run `homecomfort login`.
#[instrument(skip_all, name = "ensure_authenticated")]
pub async fn ensure_authenticated(ctx: &mut AppContext) -> Result<()> {
    if let Guarded::View(_) = ctx.session.guard(Route::Home) {
        return Ok(());
    }

    let out = Output::new();
    out.warning("Not signed in. Please login to continue.");
    out.newline();

    if !std::io::stdin().is_terminal() {
        bail!("Cannot prompt for login: stdin is not a terminal. Run 'homecomfort login' first.");
    }

    run_login(ctx, None, None).await
}
