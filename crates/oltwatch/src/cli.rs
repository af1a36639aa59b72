use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// SNMP monitoring daemon for GPON OLTs and ONTs.
#[derive(Debug, Parser)]
#[command(name = "oltwatch", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file (defaults to the platform config dir).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the monitoring daemon until interrupted.
    Run,

    /// One-shot connectivity probe and discovery against a device.
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Device address (IP or hostname).
    pub host: String,

    /// SNMP community string.
    #[arg(long, default_value = "public")]
    pub community: String,

    /// SNMP UDP port.
    #[arg(long, default_value_t = 161)]
    pub port: u16,

    /// SNMP version (1 or 2c).
    #[arg(long, default_value = "2c")]
    pub version: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Retry count after a timeout.
    #[arg(long, default_value_t = 3)]
    pub retries: u32,
}
