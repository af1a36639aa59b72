use miette::Diagnostic;
use thiserror::Error;

/// CLI-level errors with exit codes.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] oltwatch_config::ConfigError),

    #[error(transparent)]
    Core(#[from] oltwatch_core::CoreError),

    #[error(transparent)]
    Snmp(#[from] oltwatch_snmp::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Core(_) | Self::Snmp(_) => 1,
        }
    }
}
