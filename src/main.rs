mod channel;
mod client;
mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use intrack_core::interview::{InterviewId, InterviewResult, UserId};
use intrack_core::invitation::InvitationAction;

use crate::config::TrackerConfig;

#[derive(Parser)]
#[command(name = "intrack")]
#[command(about = "Track your interview schedule and follow it live")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show your interview schedule
    List,

    /// Show a month grid of your schedule, or a calendar shared with you
    Calendar {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Show the calendar of this user instead of your own
        #[arg(short, long)]
        user: Option<UserId>,
    },

    /// Schedule a new interview
    New {
        /// Who the interview is with
        counterpart: String,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Local time (HH:MM)
        #[arg(short, long)]
        time: String,

        #[arg(short, long)]
        position: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Move an interview to a new date/time
    Reschedule {
        id: InterviewId,

        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// New local time (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
    },

    /// Mark an interview as completed
    Complete { id: InterviewId },

    /// Cancel an interview
    Cancel { id: InterviewId },

    /// Record the outcome of a completed interview
    Result {
        id: InterviewId,

        /// One of: passed, failed, pending
        #[arg(value_parser = parse_result)]
        result: InterviewResult,
    },

    /// Delete an interview
    Delete { id: InterviewId },

    /// Accept a pending invitation
    Accept { id: InterviewId },

    /// Decline a pending invitation
    Decline { id: InterviewId },

    /// Manage calendar sharing
    Access {
        #[command(subcommand)]
        command: AccessCommands,
    },

    /// Follow your schedule live over the push channel
    Watch {
        /// Also watch the calendar of this user (requires a grant)
        #[arg(short, long)]
        user: Option<UserId>,
    },
}

#[derive(Subcommand)]
enum AccessCommands {
    /// Show who you share with and who shares with you
    List,
    /// Share your calendar with a user
    Grant { user: UserId },
    /// Revoke a grant you issued
    Revoke { grant: i64 },
}

fn parse_result(raw: &str) -> Result<InterviewResult, String> {
    match raw {
        "passed" => Ok(InterviewResult::Passed),
        "failed" => Ok(InterviewResult::Failed),
        "pending" => Ok(InterviewResult::Pending),
        other => Err(format!("expected passed, failed or pending, got '{other}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "intrack=warn".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = TrackerConfig::load()?;

    match cli.command {
        Commands::List => commands::list::run(&config).await,
        Commands::Calendar { month, user } => commands::calendar::run(&config, month, user).await,
        Commands::New {
            counterpart,
            date,
            time,
            position,
            notes,
        } => commands::new::run(&config, counterpart, date, time, position, notes).await,
        Commands::Reschedule { id, date, time } => {
            commands::modify::reschedule(&config, id, date, time).await
        }
        Commands::Complete { id } => commands::modify::complete(&config, id).await,
        Commands::Cancel { id } => commands::modify::cancel(&config, id).await,
        Commands::Result { id, result } => commands::modify::result(&config, id, result).await,
        Commands::Delete { id } => commands::modify::delete(&config, id).await,
        Commands::Accept { id } => {
            commands::invitation::run(&config, id, InvitationAction::Accept).await
        }
        Commands::Decline { id } => {
            commands::invitation::run(&config, id, InvitationAction::Decline).await
        }
        Commands::Access { command } => match command {
            AccessCommands::List => commands::access::list(&config).await,
            AccessCommands::Grant { user } => commands::access::grant(&config, user).await,
            AccessCommands::Revoke { grant } => commands::access::revoke(&config, grant).await,
        },
        Commands::Watch { user } => commands::watch::run(&config, user).await,
    }
}
