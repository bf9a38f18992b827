use anyhow::Result;
use clap::Parser as _;
use homecomfort_business::BulkAction;
use homecomfort_cli::cli::{Cli, Commands, UsersCommand};
use homecomfort_cli::commands::{
    generate_completions, run_action, run_list, run_login, run_logout, run_register, run_status,
};
use homecomfort_cli::context::AppContext;
use homecomfort_cli::timing;

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `--api-url` can fall back to a value from `.env`.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let mut ctx = AppContext::from_args(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Login { email, password } => run_login(&mut ctx, email, password).await,
        Commands::Register {
            username,
            email,
            password,
        } => run_register(&mut ctx, username, email, password).await,
        Commands::Logout => run_logout(&mut ctx),
        Commands::Status => {
            run_status(&ctx);
            Ok(())
        }
        Commands::Users { command } => match command {
            UsersCommand::List => run_list(&mut ctx).await,
            UsersCommand::Block(selection) => {
                run_action(&mut ctx, BulkAction::Block, &selection).await
            }
            UsersCommand::Unblock(selection) => {
                run_action(&mut ctx, BulkAction::Unblock, &selection).await
            }
            UsersCommand::Delete(selection) => {
                run_action(&mut ctx, BulkAction::Delete, &selection).await
            }
        },
        Commands::Completions { .. } => Ok(()),
    }
}
