//! User management table.
//!
//! - `state`: the fetched list and the selection over it (pure, no IO)
//! - `action`: refresh and the block / unblock / delete bulk actions

pub mod action;
pub mod state;

pub use action::{
    ActionError, ActionOutcome, BulkAction, BulkActionState, Navigation, UserTableController,
};
pub use state::{SelectionError, UserTableState};
