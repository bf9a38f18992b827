//! Bulk actions on the selected users.
//
// Block, unblock and delete share one flow in `UserTableController::run`:
//
// - refuse an empty selection or a missing token without touching the network
// - POST the selected ids with the session's bearer token
// - on 2xx, reconcile the local list and clear the selection
// - on failure, leave list and selection alone so the user can retry
//
// Delete additionally signs the session out when the acting user removed
// their own account.

use std::collections::BTreeSet;
use std::fmt;

use log::{error, info};

use crate::api::{self, Api, ApiError};
use crate::session::Session;
use crate::types::{UserRecord, UserStatus};
use crate::users::state::{SelectionError, UserTableState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    Block,
    Unblock,
    Delete,
}

impl BulkAction {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Block => api::USERS_BLOCK,
            Self::Unblock => api::USERS_UNBLOCK,
            Self::Delete => api::USERS_DELETE,
        }
    }

    /// Status the affected rows take on success; `None` for delete.
    fn resulting_status(self) -> Option<UserStatus> {
        match self {
            Self::Block => Some(UserStatus::Blocked),
            Self::Unblock => Some(UserStatus::Active),
            Self::Delete => None,
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Block => "block",
            Self::Unblock => "unblock",
            Self::Delete => "delete",
        })
    }
}

/// Where the front end should go once an action has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Navigation {
    #[default]
    Stay,
    ToLogin,
}

/// Result of a successful bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: BulkAction,
    pub ids: Vec<i64>,
    /// Acknowledgement text from the backend, when it sent one.
    pub message: Option<String>,
    pub navigation: Navigation,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("no users selected")]
    NoSelection,

    #[error("not signed in")]
    NotAuthenticated,

    #[error("failed to {action} users: {source}")]
    Failed {
        action: BulkAction,
        #[source]
        source: ApiError,
    },

    #[error("failed to fetch users: {0}")]
    Fetch(#[source] ApiError),
}

impl ActionError {
    /// Short text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoSelection => "No users selected.".to_owned(),
            Self::NotAuthenticated => "Please sign in first.".to_owned(),
            Self::Failed { action, .. } => {
                format!("Failed to {action} users. Please try again.")
            }
            Self::Fetch(_) => "Error fetching users. Please try again later.".to_owned(),
        }
    }
}

/// Progress of the most recent bulk action, for disabling triggers and
/// showing feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BulkActionState {
    #[default]
    Idle,
    InFlight {
        action: BulkAction,
        ids: Vec<i64>,
    },
    Succeeded {
        action: BulkAction,
        ids: Vec<i64>,
        message: Option<String>,
    },
    Failed {
        action: BulkAction,
        message: String,
    },
}

/// Marks a bulk request as running for as long as it lives.
///
/// Dropped without [`InFlight::finish`] (the request future was cancelled),
/// it puts the state back to `Idle`.
struct InFlight<'a> {
    state: &'a mut BulkActionState,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn start(state: &'a mut BulkActionState, action: BulkAction, ids: Vec<i64>) -> Self {
        *state = BulkActionState::InFlight { action, ids };
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, next: BulkActionState) {
        *self.state = next;
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            info!("bulk request abandoned before completion");
            *self.state = BulkActionState::Idle;
        }
    }
}

/// Owns the user table and performs the network side of selection actions.
#[derive(Debug, Default)]
pub struct UserTableController {
    api: Api,
    table: UserTableState,
    action: BulkActionState,
}

impl UserTableController {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            table: UserTableState::new(),
            action: BulkActionState::Idle,
        }
    }

    pub fn table(&self) -> &UserTableState {
        &self.table
    }

    pub fn action_state(&self) -> &BulkActionState {
        &self.action
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.action, BulkActionState::InFlight { .. })
    }

    pub fn toggle_one(&mut self, id: i64) -> Result<(), SelectionError> {
        self.table.toggle_one(id)
    }

    pub fn toggle_all(&mut self) {
        self.table.toggle_all();
    }

    pub fn set_list(&mut self, users: Vec<UserRecord>) {
        self.table.set_list(users);
    }

    /// Re-fetches `GET /users` and replaces the list. On failure the current
    /// list is kept.
    pub async fn refresh(&mut self, session: &Session) -> Result<usize, ActionError> {
        let token = session.token().ok_or(ActionError::NotAuthenticated)?;
        let users = self
            .api
            .list_users(token)
            .await
            .map_err(ActionError::Fetch)?;
        let count = users.len();
        self.table.set_list(users);
        info!("loaded {count} users");
        Ok(count)
    }

    pub async fn block_selected(
        &mut self,
        session: &mut Session,
    ) -> Result<ActionOutcome, ActionError> {
        self.run(BulkAction::Block, session).await
    }

    pub async fn unblock_selected(
        &mut self,
        session: &mut Session,
    ) -> Result<ActionOutcome, ActionError> {
        self.run(BulkAction::Unblock, session).await
    }

    /// Deletes the selected users. If the signed-in user is among them, the
    /// session is logged out and the outcome asks for the login page.
    pub async fn delete_selected(
        &mut self,
        session: &mut Session,
    ) -> Result<ActionOutcome, ActionError> {
        self.run(BulkAction::Delete, session).await
    }

    pub async fn run(
        &mut self,
        action: BulkAction,
        session: &mut Session,
    ) -> Result<ActionOutcome, ActionError> {
        if !self.table.has_selection() {
            info!("{action}: no users selected");
            return Err(ActionError::NoSelection);
        }
        let token = session
            .token()
            .ok_or(ActionError::NotAuthenticated)?
            .to_owned();

        let selected: BTreeSet<i64> = self.table.selected_ids().clone();
        let ids: Vec<i64> = selected.iter().copied().collect();
        let deletes_self = action == BulkAction::Delete
            && session
                .current_user()
                .is_some_and(|me| selected.contains(&me.id));

        let in_flight = InFlight::start(&mut self.action, action, ids.clone());

        let reply = match self.api.post_ids(action.endpoint(), &token, &ids).await {
            Ok(reply) => reply,
            Err(source) => {
                error!("{action} of {ids:?} failed: {source}");
                let err = ActionError::Failed { action, source };
                in_flight.finish(BulkActionState::Failed {
                    action,
                    message: err.user_message(),
                });
                return Err(err);
            }
        };

        match action.resulting_status() {
            Some(status) => self.table.set_status(&selected, status),
            None => self.table.remove(&selected),
        }
        self.table.clear_selection();
        info!("{action} applied to {} users", ids.len());

        let mut navigation = Navigation::Stay;
        if deletes_self {
            info!("signed-in user deleted their own account, signing out");
            if let Err(e) = session.logout() {
                error!("failed to clear stored session after self-delete: {e}");
            }
            navigation = Navigation::ToLogin;
        }

        in_flight.finish(BulkActionState::Succeeded {
            action,
            ids: ids.clone(),
            message: reply.message.clone(),
        });

        Ok(ActionOutcome {
            action,
            ids,
            message: reply.message,
            navigation,
        })
    }
}
