//! Task Vault CLI - save and load password-encrypted state from the terminal
//!
//! The vault lives in the user's data directory unless `--data-dir` is given.
//! The password comes from `--password`, `TASK_VAULT_PASSWORD`, or a prompt.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use vault_cli::{open_vault, parse_payload, resolve_password, CliError};

/// Task Vault - local encrypted storage for application state
#[derive(Parser, Debug)]
#[command(name = "task-vault")]
#[command(version)]
#[command(about = "Task Vault - password-protected local state")]
struct Args {
    /// Directory holding settings.json and the data/ envelope directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Vault password (prompted for when absent)
    #[arg(long, global = true, env = "TASK_VAULT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt and save a JSON payload (inline, or @file)
    Save { payload: String },
    /// Decrypt and print the saved payload
    Load,
    /// Show whether saved data exists
    Status,
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (mut vault, data_dir) = open_vault(args.data_dir)?;
    let password =
        || resolve_password(args.password, || rpassword::prompt_password("Vault password: "));

    match args.command {
        Command::Save { payload } => {
            let payload = parse_payload(&payload)?;
            let password = password()?;
            let ts = vault_cli::save(&mut vault, &password, &payload).await?;
            info!("Saved vault at {}", ts);
            println!("{}", ts);
        }
        Command::Load => {
            let password = password()?;
            let payload = vault_cli::load(&mut vault, &password).await;
            if let Err(CliError::Vault(e)) = &payload {
                if e.requires_password() {
                    eprintln!("Check the password and try again.");
                }
            }
            println!("{}", serde_json::to_string_pretty(&payload?)?);
        }
        Command::Status => {
            let status = vault_cli::status(&vault, &data_dir).await?;
            println!("storage key: {}", status.storage_key);
            println!("data dir:    {}", status.data_dir.display());
            println!("saved data:  {}", if status.has_data { "yes" } else { "no" });
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for payloads
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
