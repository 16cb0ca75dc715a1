mod config;
mod logging;
mod prompt;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use url::Url;
use users::{
    ConfirmPrompt, DeleteOutcome, Failure, UserDraft, UserId, UserListController, UserListState,
    UsersModule,
};

use crate::config::{AppConfig, CliOverrides};
use crate::prompt::{AlwaysConfirm, StderrNotifier, StdinConfirm};

/// Roster - manage users on a remote user store
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster - manage users on a remote user store")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL override for the user store (overrides config)
    #[arg(long, global = true)]
    base_url: Option<Url>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the server greeting
    Hello,
    /// List all users
    List,
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Update a user; omitted fields keep their current value
    Update {
        id: UserId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user after confirmation
    Delete {
        id: UserId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (ROSTER__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        base_url: cli.base_url,
        verbose: cli.verbose,
    })?;

    logging::init_logging(&config.logging);
    tracing::debug!(base_url = %config.users.base_url, "roster starting");

    let confirm: Arc<dyn ConfirmPrompt> = match &cli.command {
        Commands::Delete { yes: true, .. } => Arc::new(AlwaysConfirm),
        _ => Arc::new(StdinConfirm),
    };

    let init_module =
        || UsersModule::init(&config.users, confirm.clone(), Arc::new(StderrNotifier));

    match cli.command {
        Commands::Check => check_config(&config),
        Commands::Hello => {
            let module = init_module()?;
            println!("{}", module.greeting().load().await);
            Ok(())
        }
        Commands::List => {
            let module = init_module()?;
            let controller = module.controller();
            controller.refresh().await?;
            print_users(&controller.snapshot());
            Ok(())
        }
        Commands::Create { name, email } => {
            let module = init_module()?;
            let controller = module.controller();
            controller.request_new();
            submit(&controller, UserDraft::new(name, email)).await
        }
        Commands::Update { id, name, email } => {
            let module = init_module()?;
            let controller = module.controller();
            controller.refresh().await?;
            let current = controller
                .snapshot()
                .users
                .into_iter()
                .find(|u| u.id == id)
                .ok_or_else(|| anyhow!("user {id} not found"))?;

            let draft = UserDraft::new(
                name.unwrap_or_else(|| current.name.clone()),
                email.unwrap_or_else(|| current.email.clone()),
            );
            controller.request_edit(current);
            submit(&controller, draft).await
        }
        Commands::Delete { id, .. } => {
            let module = init_module()?;
            let controller = module.controller();
            match controller.delete_user(id).await? {
                DeleteOutcome::Cancelled => println!("Deletion cancelled."),
                DeleteOutcome::Deleted => print_users(&controller.snapshot()),
            }
            Ok(())
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

/// Submit the open form and report the form error the way the screen would.
async fn submit(controller: &UserListController, draft: UserDraft) -> Result<()> {
    match controller.submit_form(draft).await {
        Ok(()) => {
            print_users(&controller.snapshot());
            Ok(())
        }
        Err(failure) => Err(form_error(&controller.snapshot(), &failure)),
    }
}

fn form_error(state: &UserListState, failure: &Failure) -> anyhow::Error {
    match &state.form.error {
        Some(message) => anyhow!("{message}"),
        None => anyhow!("{failure}"),
    }
}

fn print_users(state: &UserListState) {
    if state.users.is_empty() {
        println!("No users.");
        return;
    }
    for user in &state.users {
        println!("{}\t{}\t{}", user.id, user.name, user.email);
    }
}
