//! `users` subcommands: list, block, unblock, delete.

use std::collections::BTreeSet;
use std::io::IsTerminal as _;

use anyhow::{Context as _, Result};
use homecomfort_business::{
    ActionError, BulkAction, Navigation, UserStatus, UserTableController, UserTableState,
};
use inquire::MultiSelect;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{error, instrument};

use crate::cli::Selection;
use crate::context::{AppContext, ensure_authenticated};
use crate::output::Output;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Last Login")]
    last_login: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

/// Renders the list as a table, most recent sign-in first.
pub fn render_table(table: &UserTableState) -> String {
    let rows: Vec<UserRow> = table
        .sorted_by_last_login(true)
        .into_iter()
        .map(|user| UserRow {
            id: user.id,
            name: truncate_str(&user.name, 24),
            email: truncate_str(&user.email, 32),
            last_login: user.last_login.to_string(),
            status: user.status.to_string(),
        })
        .collect();

    let mut rendered = Table::new(&rows);
    rendered.with(Style::rounded());
    rendered.to_string()
}

fn print_table(out: &Output, table: &UserTableState) {
    if table.users().is_empty() {
        out.dim("No users found.");
        return;
    }
    let blocked = table
        .users()
        .iter()
        .filter(|u| u.status == UserStatus::Blocked)
        .count();
    out.newline();
    out.print(render_table(table));
    out.total(table.users().len(), blocked);
}

async fn load(ctx: &mut AppContext) -> Result<UserTableController> {
    ensure_authenticated(ctx).await?;

    let mut controller = UserTableController::new(ctx.api.clone());
    if let Err(e) = controller.refresh(&ctx.session).await {
        error!("Loading users failed: {e}");
        let message = e.user_message();
        return Err(anyhow::Error::new(e).context(message));
    }
    Ok(controller)
}

#[instrument(skip_all, name = "users_list")]
pub async fn run_list(ctx: &mut AppContext) -> Result<()> {
    let out = Output::new();
    let controller = load(ctx).await?;
    print_table(&out, controller.table());
    Ok(())
}

/// Applies the command line selection to the freshly loaded list.
///
/// Without ids or `--all`, an interactive terminal gets a picker; otherwise
/// the selection stays empty and the action reports it.
fn apply_selection(controller: &mut UserTableController, selection: &Selection) -> Result<()> {
    if selection.all {
        controller.toggle_all();
        return Ok(());
    }

    let ids: BTreeSet<i64> = if selection.ids.is_empty() && std::io::stdin().is_terminal() {
        pick_users(controller.table())?
    } else {
        selection.ids.iter().copied().collect()
    };

    for id in ids {
        controller
            .toggle_one(id)
            .with_context(|| format!("Cannot select user {id}"))?;
    }
    Ok(())
}

fn pick_users(table: &UserTableState) -> Result<BTreeSet<i64>> {
    let options: Vec<String> = table
        .sorted_by_last_login(true)
        .into_iter()
        .map(|u| format!("{} <{}> {} [{}]", u.name, u.email, u.status, u.id))
        .collect();
    if options.is_empty() {
        return Ok(BTreeSet::new());
    }

    let picked = MultiSelect::new("Select users:", options)
        .with_help_message("Space to toggle, Enter to confirm")
        .prompt_skippable()
        .context("Failed to select users")?
        .unwrap_or_default();

    Ok(picked
        .iter()
        .filter_map(|entry| {
            let start = entry.rfind('[')?;
            entry[start + 1..entry.len() - 1].parse().ok()
        })
        .collect())
}

#[instrument(skip_all, name = "users_action", fields(action = %action))]
pub async fn run_action(
    ctx: &mut AppContext,
    action: BulkAction,
    selection: &Selection,
) -> Result<()> {
    let out = Output::new();
    let mut controller = load(ctx).await?;
    apply_selection(&mut controller, selection)?;

    let outcome = match controller.run(action, &mut ctx.session).await {
        Ok(outcome) => outcome,
        Err(e @ ActionError::NoSelection) => {
            out.warning(e.user_message());
            return Ok(());
        }
        Err(e) => {
            let message = e.user_message();
            return Err(anyhow::Error::new(e).context(message));
        }
    };

    let default_message = match action {
        BulkAction::Block => "Users blocked successfully",
        BulkAction::Unblock => "Users unblocked successfully",
        BulkAction::Delete => "Users deleted successfully",
    };
    out.success(outcome.message.as_deref().unwrap_or(default_message));

    if outcome.navigation == Navigation::ToLogin {
        out.warning("Your own account was deleted. You have been signed out.");
        return Ok(());
    }

    print_table(&out, controller.table());
    Ok(())
}

#[cfg(test)]
mod tests {
    use homecomfort_business::{LastLogin, UserRecord};

    use super::*;

    fn user(id: i64, name: &str, last_login: LastLogin) -> UserRecord {
        UserRecord {
            id,
            name: name.to_owned(),
            email: format!("{name}@example.com"),
            last_login,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn test_render_table_orders_by_last_login() {
        let early = "2024-01-01T00:00:00Z".parse().unwrap();
        let late = "2024-06-01T00:00:00Z".parse().unwrap();

        let mut table = UserTableState::new();
        table.set_list(vec![
            user(1, "never", LastLogin::Never),
            user(2, "early", LastLogin::At(early)),
            user(3, "late", LastLogin::At(late)),
        ]);

        let rendered = render_table(&table);
        let late_at = rendered.find("late@").unwrap();
        let early_at = rendered.find("early@").unwrap();
        let never_at = rendered.find("never@").unwrap();
        assert!(late_at < early_at);
        assert!(early_at < never_at);
        assert!(rendered.contains("Never"));
        assert!(rendered.contains("Last Login"));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a very long name indeed", 10), "a very ...");
    }
}
