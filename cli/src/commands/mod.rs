//! Command implementations for the HomeComfort CLI.

pub mod completions;
pub mod login;
pub mod logout;
pub mod register;
pub mod status;
pub mod users;

pub use completions::generate_completions;
pub use login::run_login;
pub use logout::run_logout;
pub use register::run_register;
pub use status::run_status;
pub use users::{run_action, run_list};
