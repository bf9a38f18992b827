use clap::{Parser, Subcommand};
use clap_complete::Shell;
use homecomfort_business::API_URL_ENV;

#[derive(Parser)]
#[command(name = "homecomfort")]
#[command(about = "Admin console for HomeComfort", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Prompted for when omitted
        #[arg(long, short = 'p')]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long, short = 'u')]
        username: Option<String>,

        #[arg(long, short = 'e')]
        email: Option<String>,

        #[arg(long, short = 'p')]
        password: Option<String>,
    },
    /// Sign out and remove the saved session
    Logout,
    /// Show who is signed in
    Status,
    /// Manage users
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List users, most recent sign-in first
    List,
    /// Block users
    Block(Selection),
    /// Unblock users
    Unblock(Selection),
    /// Delete users
    Delete(Selection),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct Selection {
    /// User ids to act on
    pub ids: Vec<i64>,

    /// Act on every user in the list
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,
}
