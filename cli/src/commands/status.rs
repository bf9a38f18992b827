//! Status command: who is signed in and against which backend.

use homecomfort_business::AuthStatus;

use crate::context::AppContext;
use crate::output::Output;

pub fn run_status(ctx: &AppContext) {
    let out = Output::new();

    out.header("HomeComfort");
    out.labeled("Backend", ctx.api.config().api_base_url());
    out.labeled("Session file", ctx.session_path.display());

    match ctx.session.status() {
        AuthStatus::Authenticated => {
            out.labeled("Status", "signed in");
            if let Some(user) = ctx.session.current_user() {
                out.labeled("Email", &user.email);
                out.labeled("User ID", user.id);
                if let Some(name) = &user.name {
                    out.labeled("Name", name);
                }
            }
        }
        AuthStatus::Unauthenticated => {
            out.labeled("Status", "signed out");
            out.dim("Run 'homecomfort login' to sign in.");
        }
    }
}
