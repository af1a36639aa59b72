use thiserror::Error;

use crate::client::SnmpVersion;
use crate::pdu::ErrorStatus;

/// Top-level error type for the `oltwatch-snmp` crate.
///
/// Covers transport failures (socket errors, exhausted retries) and
/// protocol failures (device-reported error status, unparseable PDUs).
/// `oltwatch-core` maps these into domain-level absence or task failure.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Socket-level failure (bind, connect, send, recv).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No response after the full retry budget.
    #[error("request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    // ── Protocol ────────────────────────────────────────────────────
    /// Response bytes did not parse as an SNMP message.
    #[error("malformed SNMP message: {reason}")]
    Malformed { reason: String },

    /// The agent reported a non-zero error status.
    #[error("SNMP error status {status} (index {index})")]
    ErrorStatus { status: ErrorStatus, index: u32 },

    // ── Configuration ───────────────────────────────────────────────
    /// Requested protocol version is not implemented by this client.
    #[error("SNMP version {0} is not supported")]
    UnsupportedVersion(SnmpVersion),

    /// OID string failed to parse.
    #[error("invalid OID: {0}")]
    InvalidOid(String),
}

impl Error {
    /// Whether the failure is a transport-level one worth a fresh session.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Timeout { .. })
    }

    /// Whether the agent answered but rejected the request.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::ErrorStatus { .. } | Self::Malformed { .. })
    }
}
