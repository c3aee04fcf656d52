//! Casedesk control - CLI client for the Casedesk daemon.

use anyhow::Result;
use clap::Parser;

use casedeskctl::cli::{CaseCommands, Cli, Commands, LoadCommands, UserCommands};
use casedeskctl::commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let socket = cli.socket.as_deref();

    match cli.command {
        Commands::Status => commands::status(socket).await,
        Commands::Loads { action } => match action {
            LoadCommands::List => commands::loads_list(socket).await,
            LoadCommands::Process { load_id, priority } => {
                commands::loads_process(socket, &load_id, priority).await
            }
            LoadCommands::ProcessAll => commands::loads_process_all(socket).await,
        },
        Commands::Cases { action } => match action {
            CaseCommands::List { status, assignee } => {
                commands::cases_list(socket, status, assignee).await
            }
            CaseCommands::Breached => commands::cases_breached(socket).await,
            CaseCommands::SetStatus { case_id, status } => {
                commands::cases_set_status(socket, &case_id, &status).await
            }
            CaseCommands::Reassign { case_id, psid } => {
                commands::cases_reassign(socket, &case_id, &psid).await
            }
            CaseCommands::Note { case_id, text } => {
                commands::cases_note(socket, &case_id, &text).await
            }
        },
        Commands::Users { action } => match action {
            UserCommands::List => commands::users_list(socket).await,
            UserCommands::Activate { psid } => commands::users_set_active(socket, &psid, true).await,
            UserCommands::Deactivate { psid } => {
                commands::users_set_active(socket, &psid, false).await
            }
        },
        Commands::Config { set } => commands::config(socket, set).await,
        Commands::Report => commands::report(socket).await,
    }
}
