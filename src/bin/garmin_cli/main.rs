// ABOUTME: garmin-cli - command-line access to Garmin Connect through the guarded client
// ABOUTME: Runs health/smoke/live checks and displays or exports activity data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Verify login and that recent activities are reachable
//! garmin-cli healthcheck
//!
//! # End-to-end checks against the account
//! garmin-cli smoke
//! garmin-cli live-check
//!
//! # Display activities in a date range (optionally filtered by type)
//! garmin-cli activities --start 2025-01-01 --end 2025-01-31 --type running
//!
//! # Display one activity, or its details
//! garmin-cli activity 123456789 --details
//!
//! # Export a range to your_data/january.json
//! garmin-cli export --start 2025-01-01 --end 2025-01-31 --name january
//!
//! # Display the user profile
//! garmin-cli profile
//! ```

mod commands;
mod helpers;

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use garmin_client::logging::LoggingConfig;
use tracing::{debug, error};

use helpers::report::CliError;

#[derive(Parser)]
#[command(
    name = "garmin-cli",
    about = "Garmin Connect client CLI",
    long_about = "Log in to Garmin Connect (with MFA and token reuse), run account checks, and display or export activity data."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Log in and confirm recent activities are reachable
    Healthcheck,

    /// Log in, list activities, and fetch the first one
    Smoke,

    /// Smoke checks plus a response structure check
    LiveCheck,

    /// Display activities between two dates
    Activities {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Activity type filter (defaults to `GARMIN_ACTIVITY_TYPE`)
        #[arg(long = "type")]
        activity_type: Option<String>,
    },

    /// Display a single activity
    Activity {
        /// Activity ID
        activity_id: u64,

        /// Fetch the detailed activity instead of the summary
        #[arg(long)]
        details: bool,
    },

    /// Save activities between two dates as JSON in the export directory
    Export {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// File name without the `.json` extension
        #[arg(long)]
        name: String,

        /// Write compact JSON instead of indented
        #[arg(long)]
        compact: bool,
    },

    /// Display the logged-in user's profile
    Profile,
}

impl Command {
    const fn failure_label(&self) -> &'static str {
        match self {
            Self::Healthcheck => "Healthcheck failed",
            Self::Smoke => "SMOKE FAILED",
            Self::LiveCheck => "FAILURE",
            Self::Activities { .. }
            | Self::Activity { .. }
            | Self::Export { .. }
            | Self::Profile => "Command failed",
        }
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Healthcheck => commands::checks::healthcheck().await,
        Command::Smoke => commands::checks::smoke().await,
        Command::LiveCheck => commands::checks::live_check().await,
        Command::Activities {
            start,
            end,
            activity_type,
        } => commands::data::activities(start, end, activity_type).await,
        Command::Activity {
            activity_id,
            details,
        } => commands::data::activity(activity_id, details).await,
        Command::Export {
            start,
            end,
            name,
            compact,
        } => commands::data::export(start, end, &name, compact).await,
        Command::Profile => commands::data::profile().await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = LoggingConfig::for_cli(cli.verbose).init() {
        eprintln!("❌ Logging setup failed: {e}");
        return ExitCode::FAILURE;
    }
    debug!("garmin-cli starting");

    let label = cli.command.failure_label();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "{label}");
            println!("\n❌ {label}: {e}");
            ExitCode::FAILURE
        }
    }
}
