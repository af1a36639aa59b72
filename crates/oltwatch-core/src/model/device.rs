// ── Device, port, and ONT domain types ──
//
// All three are owned by the external inventory store. The core reads
// them at the start of each task run and writes back discovered
// attributes and reachability status, never creating or deleting devices.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oltwatch_snmp::{SnmpCredentials, SnmpTarget, SnmpVersion};

use super::identity::DeviceId;

/// Device reachability as maintained by the health-check task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceStatus {
    Online,
    Unreachable,
    Error,
    /// Operator-set; excluded from polling.
    Maintenance,
}

/// Transport parameters for one device, with per-device overrides of the
/// global SNMP defaults.
#[derive(Debug, Clone)]
pub struct SnmpSettings {
    pub port: u16,
    pub version: SnmpVersion,
    pub credentials: SnmpCredentials,
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for SnmpSettings {
    fn default() -> Self {
        Self {
            port: 161,
            version: SnmpVersion::V2c,
            credentials: SnmpCredentials::community("public"),
            timeout: Duration::from_secs(5),
            retries: 3,
        }
    }
}

/// Identity and firmware facts refreshed by the discovery task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredInfo {
    pub system_name: Option<String>,
    pub system_description: Option<String>,
    pub uptime_ticks: Option<u64>,
    pub firmware_version: Option<String>,
    pub hardware_version: Option<String>,
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
}

/// One device as read from the inventory store.
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub name: String,
    pub host: String,
    pub snmp: SnmpSettings,
    pub status: DeviceStatus,
    pub last_seen: Option<DateTime<Utc>>,
    pub info: DiscoveredInfo,
}

impl DeviceRecord {
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            host: host.into(),
            snmp: SnmpSettings::default(),
            status: DeviceStatus::Unreachable,
            last_seen: None,
            info: DiscoveredInfo::default(),
        }
    }

    /// Build the transport target from address + per-device settings.
    pub fn snmp_target(&self) -> SnmpTarget {
        SnmpTarget {
            host: self.host.clone(),
            port: self.snmp.port,
            version: self.snmp.version,
            credentials: self.snmp.credentials.clone(),
            timeout: self.snmp.timeout,
            retries: self.snmp.retries,
        }
    }

    pub fn is_pollable(&self) -> bool {
        self.status != DeviceStatus::Maintenance
    }
}

// ── Ports ───────────────────────────────────────────────────────────

/// PON port operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PortStatus {
    Up,
    Down,
}

/// Discovered state of one PON port, written back via the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortRecord {
    pub device: DeviceId,
    pub slot: u32,
    pub port: u32,
    pub admin_enabled: bool,
    pub oper_status: PortStatus,
    pub ont_count: u32,
    pub max_ont_count: u32,
    pub optical_power_tx_dbm: f64,
    pub optical_power_rx_dbm: f64,
    pub temperature_c: f64,
    pub voltage_v: f64,
    pub bias_current_ma: f64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub last_seen: DateTime<Utc>,
}

// ── ONTs ────────────────────────────────────────────────────────────

/// ONT operational status, decoded from the vendor status code.
/// Unrecognized codes become `Unknown`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OntStatus {
    Online,
    Offline,
    DyingGasp,
    LossOfSignal,
    Unknown,
}

impl OntStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Online,
            2 => Self::Offline,
            3 => Self::DyingGasp,
            4 => Self::LossOfSignal,
            _ => Self::Unknown,
        }
    }
}

/// Discovered state of one ONT, written back via the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntRecord {
    pub device: DeviceId,
    pub slot: u32,
    pub port: u32,
    pub ont_id: u32,
    pub serial_number: String,
    pub status: OntStatus,
    pub distance_m: u32,
    pub rx_power_dbm: f64,
    pub tx_power_dbm: f64,
    pub voltage_v: f64,
    pub temperature_c: f64,
    pub firmware_version: String,
    pub hardware_version: String,
    pub mac_address: String,
    pub uptime_ticks: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub last_seen: DateTime<Utc>,
}
