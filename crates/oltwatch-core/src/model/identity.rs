// ── Core identity types ──
//
// DeviceId names a device in the external inventory; SourceId extends it
// down to ports and ONTs and keys every metric sample and alarm.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── DeviceId ────────────────────────────────────────────────────────

/// Opaque inventory identifier for a device.
///
/// The inventory store owns the format (database key, UUID, hostname);
/// the core only compares and displays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── SourceId ────────────────────────────────────────────────────────

/// What a metric sample or alarm is about: a device, one of its PON
/// ports, or an ONT hanging off a port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceId {
    Device { device: DeviceId },
    Port { device: DeviceId, slot: u32, port: u32 },
    Ont { device: DeviceId, slot: u32, port: u32, ont: u32 },
}

impl SourceId {
    pub fn device(device: DeviceId) -> Self {
        Self::Device { device }
    }

    pub fn port(device: DeviceId, slot: u32, port: u32) -> Self {
        Self::Port { device, slot, port }
    }

    pub fn ont(device: DeviceId, slot: u32, port: u32, ont: u32) -> Self {
        Self::Ont {
            device,
            slot,
            port,
            ont,
        }
    }

    /// The device this source belongs to.
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::Device { device }
            | Self::Port { device, .. }
            | Self::Ont { device, .. } => device,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device { device } => write!(f, "{device}"),
            Self::Port { device, slot, port } => write!(f, "{device}/{slot}/{port}"),
            Self::Ont {
                device,
                slot,
                port,
                ont,
            } => write!(f, "{device}/{slot}/{port}:{ont}"),
        }
    }
}
