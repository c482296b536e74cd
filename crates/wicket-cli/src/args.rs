use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wicket", version, about = "Gate endpoint for the Wicket access engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a gate: read credential ids from stdin, print one decision per
    /// line.
    Gate {
        /// Path to the gate configuration file.
        #[arg(long, default_value = "wicket.yaml")]
        config: PathBuf,

        /// Decide locally from the schedule section of the config file
        /// instead of calling the remote authorization service.
        #[arg(long)]
        local: bool,
    },

    /// Evaluate the configured schedule for one credential at a given
    /// date and time, without touching any service.
    CheckSchedule {
        /// Path to the gate configuration file.
        #[arg(long, default_value = "wicket.yaml")]
        config: PathBuf,

        /// Credential id, raw reader form accepted (e.g. "04 a3 f0 11").
        #[arg(long)]
        id: String,

        /// Date to check (YYYY-MM-DD); only its weekday matters.
        #[arg(long)]
        date: NaiveDate,

        /// Time of day to check (HH:MM or HH:MM:SS).
        #[arg(long)]
        time: String,
    },
}
