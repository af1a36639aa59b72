// ── Core error types ──
//
// Task bodies and store implementations surface failures through
// `CoreError`. Transport-layer errors from `oltwatch-snmp` are wrapped,
// not re-exposed raw; per-device failures inside a task are logged and
// isolated rather than propagated (see monitor.rs).

use thiserror::Error;

use crate::model::DeviceId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Inventory ────────────────────────────────────────────────────
    #[error("device not found: {device}")]
    DeviceNotFound { device: DeviceId },

    #[error("device {device} is unreachable")]
    DeviceUnreachable { device: DeviceId },

    // ── Transport ────────────────────────────────────────────────────
    #[error("SNMP failure: {0}")]
    Snmp(#[from] oltwatch_snmp::Error),

    // ── Stores ───────────────────────────────────────────────────────
    #[error("store error: {message}")]
    Store { message: String },

    // ── Scheduler ────────────────────────────────────────────────────
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the failure points at the device rather than at us: the
    /// health check maps these to `Unreachable` instead of `Error`.
    pub fn is_device_unreachable(&self) -> bool {
        match self {
            Self::DeviceUnreachable { .. } => true,
            Self::Snmp(err) => err.is_transport(),
            _ => false,
        }
    }
}
