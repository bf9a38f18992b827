//! Selection bookkeeping for the user table.
//!
//! `select_all` is never assigned directly by callers; every mutation of the
//! list or the selection ends in [`UserTableState::sync_select_all`].

use std::collections::BTreeSet;

use crate::types::{UserRecord, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("user {0} is not in the current list")]
    UnknownUser(i64),
}

/// The fetched user list plus which rows are ticked.
#[derive(Debug, Clone, Default)]
pub struct UserTableState {
    users: Vec<UserRecord>,
    selected_ids: BTreeSet<i64>,
    select_all: bool,
}

impl UserTableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn user(&self, id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.user(id).is_some()
    }

    pub fn selected_ids(&self) -> &BTreeSet<i64> {
        &self.selected_ids
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected_ids.contains(&id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_ids.is_empty()
    }

    /// True exactly when every row of a non-empty list is selected.
    pub fn select_all(&self) -> bool {
        self.select_all
    }

    /// Replaces the list. The selection never survives a refresh.
    pub fn set_list(&mut self, users: Vec<UserRecord>) {
        self.users = users;
        self.selected_ids.clear();
        self.sync_select_all();
    }

    /// Ticks or unticks one row. Ids outside the current list are rejected.
    pub fn toggle_one(&mut self, id: i64) -> Result<(), SelectionError> {
        if !self.contains(id) {
            return Err(SelectionError::UnknownUser(id));
        }
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
        self.sync_select_all();
        Ok(())
    }

    /// Header checkbox: clears a full selection, otherwise selects every row.
    pub fn toggle_all(&mut self) {
        if self.select_all {
            self.selected_ids.clear();
        } else {
            self.selected_ids = self.users.iter().map(|u| u.id).collect();
        }
        self.sync_select_all();
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
        self.sync_select_all();
    }

    /// Rows ordered by last sign-in; users who never signed in count as oldest.
    pub fn sorted_by_last_login(&self, descending: bool) -> Vec<&UserRecord> {
        let mut rows: Vec<&UserRecord> = self.users.iter().collect();
        rows.sort_by_key(|u| u.last_login);
        if descending {
            rows.reverse();
        }
        rows
    }

    pub(crate) fn set_status(&mut self, ids: &BTreeSet<i64>, status: UserStatus) {
        for user in self.users.iter_mut().filter(|u| ids.contains(&u.id)) {
            user.status = status;
        }
    }

    pub(crate) fn remove(&mut self, ids: &BTreeSet<i64>) {
        self.users.retain(|u| !ids.contains(&u.id));
        self.selected_ids.retain(|id| !ids.contains(id));
        self.sync_select_all();
    }

    fn sync_select_all(&mut self) {
        self.select_all = !self.users.is_empty()
            && self.selected_ids.len() == self.users.len()
            && self.users.iter().all(|u| self.selected_ids.contains(&u.id));
    }
}
