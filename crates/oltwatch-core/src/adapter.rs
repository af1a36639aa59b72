// ── ZTE C320 protocol adapter ──
//
// Maps the named metric catalog onto the C320 OID tree and decodes raw
// SNMP values into typed domain structs. Vendor fixed-point encodings:
// optical power and temperature columns carry value × 100, voltage and
// bias current carry value × 1000.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use oltwatch_snmp::{Oid, SnmpClient, SnmpTarget, Value};

use crate::error::CoreError;
use crate::model::{DeviceId, DiscoveredInfo, OntRecord, OntStatus, PortRecord, PortStatus};

// ── OID catalog ─────────────────────────────────────────────────────

// MIB-II system group.
const SYSTEM_NAME: &[u32] = &[1, 3, 6, 1, 2, 1, 1, 5, 0];
const SYSTEM_DESCR: &[u32] = &[1, 3, 6, 1, 2, 1, 1, 1, 0];
const SYSTEM_UPTIME: &[u32] = &[1, 3, 6, 1, 2, 1, 1, 3, 0];

// Hardware identity.
const FIRMWARE_VERSION: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 1, 1, 1, 2];
const HARDWARE_VERSION: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 1, 1, 1, 3];
const SERIAL_NUMBER: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 1, 1, 1, 4];
const MAC_ADDRESS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 1, 1, 1, 5];

// Shelf performance.
const CPU_USAGE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 2, 1, 1, 2];
const MEMORY_USAGE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 2, 1, 1, 3];
const TEMPERATURE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 2, 1, 1, 4];
const FAN_SPEED: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 2, 1, 1, 5];
const POWER_CONSUMPTION: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 1, 2, 1, 1, 6];

// PON port table, indexed by (slot, port).
const PORT_ADMIN_STATUS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 3];
const PORT_OPER_STATUS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 4];
const PORT_ONT_COUNT: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 5];
const PORT_MAX_ONT: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 6];
const PORT_OPTICAL_TX: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 7];
const PORT_OPTICAL_RX: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 8];
const PORT_TEMPERATURE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 9];
const PORT_VOLTAGE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 10];
const PORT_BIAS_CURRENT: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 11];
const PORT_ENABLE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 1, 1, 20];

// PON port counters, indexed by (slot, port).
const PORT_RX_BYTES: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 2, 1, 2];
const PORT_TX_BYTES: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 2, 1, 3];
const PORT_RX_PACKETS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 2, 1, 4];
const PORT_TX_PACKETS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 2, 1, 5];
const PORT_RX_ERRORS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 2, 1, 6];
const PORT_TX_ERRORS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 2, 1, 7];

// ONT table, indexed by (slot, port, ont).
const ONT_SERIAL: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 3];
const ONT_STATUS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 10];
const ONT_DISTANCE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 11];
const ONT_RX_POWER: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 12];
const ONT_TX_POWER: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 13];
const ONT_VOLTAGE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 14];
const ONT_TEMPERATURE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 15];
const ONT_FIRMWARE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 16];
const ONT_HARDWARE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 17];
const ONT_MAC: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 18];
const ONT_UPTIME: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1, 19];

// ONT counters, indexed by (slot, port, ont).
const ONT_RX_BYTES: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 13, 1, 1, 2];
const ONT_TX_BYTES: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 13, 1, 1, 3];
const ONT_RX_PACKETS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 13, 1, 1, 4];
const ONT_TX_PACKETS: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 13, 1, 1, 5];

// Provisioning columns.
const ONT_PROVISION: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 11, 2, 1, 1];
const ONT_REBOOT: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 11, 3, 1, 1];

fn o(arcs: &[u32]) -> Oid {
    Oid::new(arcs.to_vec())
}

// ── Decoded operation results ───────────────────────────────────────

/// Shelf-level identity and performance readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OltInfo {
    pub system_name: String,
    pub system_description: String,
    pub uptime_ticks: u64,
    pub firmware_version: String,
    pub hardware_version: String,
    pub serial_number: String,
    pub mac_address: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub temperature: f64,
    pub fan_speed: i64,
    pub power_consumption: f64,
}

impl OltInfo {
    /// Write-back payload for the inventory, with empty strings dropped.
    pub fn discovered_info(&self) -> DiscoveredInfo {
        fn some(s: &str) -> Option<String> {
            (!s.is_empty()).then(|| s.to_owned())
        }
        DiscoveredInfo {
            system_name: some(&self.system_name),
            system_description: some(&self.system_description),
            uptime_ticks: (self.uptime_ticks > 0).then_some(self.uptime_ticks),
            firmware_version: some(&self.firmware_version),
            hardware_version: some(&self.hardware_version),
            serial_number: some(&self.serial_number),
            mac_address: some(&self.mac_address),
        }
    }
}

/// One PON port's decoded state.
#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
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
}

impl PortInfo {
    pub fn into_record(self, device: DeviceId) -> PortRecord {
        PortRecord {
            device,
            slot: self.slot,
            port: self.port,
            admin_enabled: self.admin_enabled,
            oper_status: self.oper_status,
            ont_count: self.ont_count,
            max_ont_count: self.max_ont_count,
            optical_power_tx_dbm: self.optical_power_tx_dbm,
            optical_power_rx_dbm: self.optical_power_rx_dbm,
            temperature_c: self.temperature_c,
            voltage_v: self.voltage_v,
            bias_current_ma: self.bias_current_ma,
            rx_bytes: self.rx_bytes,
            tx_bytes: self.tx_bytes,
            rx_packets: self.rx_packets,
            tx_packets: self.tx_packets,
            rx_errors: self.rx_errors,
            tx_errors: self.tx_errors,
            last_seen: Utc::now(),
        }
    }
}

/// One ONT's decoded state.
#[derive(Debug, Clone, PartialEq)]
pub struct OntInfo {
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
}

impl OntInfo {
    pub fn into_record(self, device: DeviceId, slot: u32, port: u32) -> OntRecord {
        OntRecord {
            device,
            slot,
            port,
            ont_id: self.ont_id,
            serial_number: self.serial_number,
            status: self.status,
            distance_m: self.distance_m,
            rx_power_dbm: self.rx_power_dbm,
            tx_power_dbm: self.tx_power_dbm,
            voltage_v: self.voltage_v,
            temperature_c: self.temperature_c,
            firmware_version: self.firmware_version,
            hardware_version: self.hardware_version,
            mac_address: self.mac_address,
            uptime_ticks: self.uptime_ticks,
            rx_bytes: self.rx_bytes,
            tx_bytes: self.tx_bytes,
            rx_packets: self.rx_packets,
            tx_packets: self.tx_packets,
            last_seen: Utc::now(),
        }
    }
}

// ── Decode helpers ──────────────────────────────────────────────────

fn text(map: &HashMap<Oid, Value>, oid: &Oid) -> String {
    map.get(oid).map(ToString::to_string).unwrap_or_default()
}

fn int(map: &HashMap<Oid, Value>, oid: &Oid) -> i64 {
    map.get(oid).and_then(Value::as_i64).unwrap_or(0)
}

fn uint(map: &HashMap<Oid, Value>, oid: &Oid) -> u64 {
    map.get(oid).and_then(Value::as_u64).unwrap_or(0)
}

/// Fixed-point decode: raw integer ÷ divisor.
#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn scaled(map: &HashMap<Oid, Value>, oid: &Oid, divisor: f64) -> f64 {
    int(map, oid) as f64 / divisor
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn float(map: &HashMap<Oid, Value>, oid: &Oid) -> f64 {
    int(map, oid) as f64
}

fn narrow(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

// ── Adapter ─────────────────────────────────────────────────────────

/// Typed operations against one C320 OLT.
#[derive(Debug)]
pub struct OltClient {
    snmp: SnmpClient,
}

impl OltClient {
    /// Open an SNMP session to the device.
    pub async fn connect(target: SnmpTarget) -> Result<Self, CoreError> {
        let snmp = SnmpClient::connect(target).await?;
        Ok(Self { snmp })
    }

    /// Wrap an already-connected transport client.
    pub fn from_snmp(snmp: SnmpClient) -> Self {
        Self { snmp }
    }

    fn host(&self) -> &str {
        &self.snmp.target().host
    }

    // ── Discovery / reads ────────────────────────────────────────────

    /// Shelf identity plus performance readings, two bulk GETs.
    pub async fn discover_device_info(&self) -> Result<OltInfo, CoreError> {
        let system_oids = [
            o(SYSTEM_NAME),
            o(SYSTEM_DESCR),
            o(SYSTEM_UPTIME),
            o(FIRMWARE_VERSION),
            o(HARDWARE_VERSION),
            o(SERIAL_NUMBER),
            o(MAC_ADDRESS),
        ];
        let system = self.snmp.get_many(&system_oids).await?;

        let perf_oids = [
            o(CPU_USAGE),
            o(MEMORY_USAGE),
            o(TEMPERATURE),
            o(FAN_SPEED),
            o(POWER_CONSUMPTION),
        ];
        let perf = self.snmp.get_many(&perf_oids).await?;

        let info = OltInfo {
            system_name: text(&system, &o(SYSTEM_NAME)),
            system_description: text(&system, &o(SYSTEM_DESCR)),
            uptime_ticks: uint(&system, &o(SYSTEM_UPTIME)),
            firmware_version: text(&system, &o(FIRMWARE_VERSION)),
            hardware_version: text(&system, &o(HARDWARE_VERSION)),
            serial_number: text(&system, &o(SERIAL_NUMBER)),
            mac_address: text(&system, &o(MAC_ADDRESS)),
            cpu_usage: float(&perf, &o(CPU_USAGE)),
            memory_usage: float(&perf, &o(MEMORY_USAGE)),
            temperature: float(&perf, &o(TEMPERATURE)),
            fan_speed: int(&perf, &o(FAN_SPEED)),
            power_consumption: float(&perf, &o(POWER_CONSUMPTION)),
        };
        debug!(host = %self.host(), system_name = %info.system_name, "device info read");
        Ok(info)
    }

    /// One port's full state in a single bulk GET. `Ok(None)` when the
    /// device answers but knows nothing about the index.
    pub async fn get_port_info(&self, slot: u32, port: u32) -> Result<Option<PortInfo>, CoreError> {
        let index = [slot, port];
        let oids = [
            o(PORT_ADMIN_STATUS).extend(&index),
            o(PORT_OPER_STATUS).extend(&index),
            o(PORT_ONT_COUNT).extend(&index),
            o(PORT_MAX_ONT).extend(&index),
            o(PORT_OPTICAL_TX).extend(&index),
            o(PORT_OPTICAL_RX).extend(&index),
            o(PORT_TEMPERATURE).extend(&index),
            o(PORT_VOLTAGE).extend(&index),
            o(PORT_BIAS_CURRENT).extend(&index),
            o(PORT_RX_BYTES).extend(&index),
            o(PORT_TX_BYTES).extend(&index),
            o(PORT_RX_PACKETS).extend(&index),
            o(PORT_TX_PACKETS).extend(&index),
            o(PORT_RX_ERRORS).extend(&index),
            o(PORT_TX_ERRORS).extend(&index),
        ];
        let map = self.snmp.get_many(&oids).await?;
        if map.is_empty() {
            return Ok(None);
        }

        Ok(Some(PortInfo {
            slot,
            port,
            admin_enabled: int(&map, &o(PORT_ADMIN_STATUS).extend(&index)) == 1,
            oper_status: if int(&map, &o(PORT_OPER_STATUS).extend(&index)) == 1 {
                PortStatus::Up
            } else {
                PortStatus::Down
            },
            ont_count: narrow(uint(&map, &o(PORT_ONT_COUNT).extend(&index))),
            max_ont_count: narrow(uint(&map, &o(PORT_MAX_ONT).extend(&index))),
            optical_power_tx_dbm: scaled(&map, &o(PORT_OPTICAL_TX).extend(&index), 100.0),
            optical_power_rx_dbm: scaled(&map, &o(PORT_OPTICAL_RX).extend(&index), 100.0),
            temperature_c: scaled(&map, &o(PORT_TEMPERATURE).extend(&index), 100.0),
            voltage_v: scaled(&map, &o(PORT_VOLTAGE).extend(&index), 1000.0),
            bias_current_ma: scaled(&map, &o(PORT_BIAS_CURRENT).extend(&index), 1000.0),
            rx_bytes: uint(&map, &o(PORT_RX_BYTES).extend(&index)),
            tx_bytes: uint(&map, &o(PORT_TX_BYTES).extend(&index)),
            rx_packets: uint(&map, &o(PORT_RX_PACKETS).extend(&index)),
            tx_packets: uint(&map, &o(PORT_TX_PACKETS).extend(&index)),
            rx_errors: uint(&map, &o(PORT_RX_ERRORS).extend(&index)),
            tx_errors: uint(&map, &o(PORT_TX_ERRORS).extend(&index)),
        }))
    }

    /// One ONT's full state in a single bulk GET.
    pub async fn get_ont_info(
        &self,
        slot: u32,
        port: u32,
        ont_id: u32,
    ) -> Result<Option<OntInfo>, CoreError> {
        let index = [slot, port, ont_id];
        let oids = [
            o(ONT_STATUS).extend(&index),
            o(ONT_DISTANCE).extend(&index),
            o(ONT_RX_POWER).extend(&index),
            o(ONT_TX_POWER).extend(&index),
            o(ONT_VOLTAGE).extend(&index),
            o(ONT_TEMPERATURE).extend(&index),
            o(ONT_SERIAL).extend(&index),
            o(ONT_FIRMWARE).extend(&index),
            o(ONT_HARDWARE).extend(&index),
            o(ONT_MAC).extend(&index),
            o(ONT_UPTIME).extend(&index),
            o(ONT_RX_BYTES).extend(&index),
            o(ONT_TX_BYTES).extend(&index),
            o(ONT_RX_PACKETS).extend(&index),
            o(ONT_TX_PACKETS).extend(&index),
        ];
        let map = self.snmp.get_many(&oids).await?;
        if map.is_empty() {
            return Ok(None);
        }

        Ok(Some(OntInfo {
            ont_id,
            serial_number: text(&map, &o(ONT_SERIAL).extend(&index)),
            status: OntStatus::from_code(int(&map, &o(ONT_STATUS).extend(&index))),
            distance_m: narrow(uint(&map, &o(ONT_DISTANCE).extend(&index))),
            rx_power_dbm: scaled(&map, &o(ONT_RX_POWER).extend(&index), 100.0),
            tx_power_dbm: scaled(&map, &o(ONT_TX_POWER).extend(&index), 100.0),
            voltage_v: scaled(&map, &o(ONT_VOLTAGE).extend(&index), 1000.0),
            temperature_c: scaled(&map, &o(ONT_TEMPERATURE).extend(&index), 100.0),
            firmware_version: text(&map, &o(ONT_FIRMWARE).extend(&index)),
            hardware_version: text(&map, &o(ONT_HARDWARE).extend(&index)),
            mac_address: text(&map, &o(ONT_MAC).extend(&index)),
            uptime_ticks: uint(&map, &o(ONT_UPTIME).extend(&index)),
            rx_bytes: uint(&map, &o(ONT_RX_BYTES).extend(&index)),
            tx_bytes: uint(&map, &o(ONT_TX_BYTES).extend(&index)),
            rx_packets: uint(&map, &o(ONT_RX_PACKETS).extend(&index)),
            tx_packets: uint(&map, &o(ONT_TX_PACKETS).extend(&index)),
        }))
    }

    /// Walk the port table index, then fetch each port's detail.
    /// One failed detail fetch is logged and skipped, not fatal.
    pub async fn discover_all_ports(&self) -> Result<Vec<PortInfo>, CoreError> {
        let root = o(PORT_ADMIN_STATUS);
        let index_rows = self.snmp.walk(&root).await?;

        let mut ports = Vec::new();
        for oid in index_rows.keys() {
            let Some(&[slot, port]) = oid.index_after(&root) else {
                continue;
            };
            match self.get_port_info(slot, port).await {
                Ok(Some(info)) => ports.push(info),
                Ok(None) => {}
                Err(err) => {
                    warn!(host = %self.host(), slot, port, error = %err, "port detail fetch failed");
                }
            }
        }

        info!(host = %self.host(), count = ports.len(), "discovered ports");
        Ok(ports)
    }

    /// Walk the ONT status column under one port, then fetch each ONT's
    /// detail. Same isolation semantics as port discovery.
    pub async fn discover_all_onts(&self, slot: u32, port: u32) -> Result<Vec<OntInfo>, CoreError> {
        let root = o(ONT_STATUS).extend(&[slot, port]);
        let index_rows = self.snmp.walk(&root).await?;

        let mut onts = Vec::new();
        for oid in index_rows.keys() {
            let Some(&[ont_id]) = oid.index_after(&root) else {
                continue;
            };
            match self.get_ont_info(slot, port, ont_id).await {
                Ok(Some(info)) => onts.push(info),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        host = %self.host(),
                        slot,
                        port,
                        ont_id,
                        error = %err,
                        "ont detail fetch failed"
                    );
                }
            }
        }

        info!(host = %self.host(), slot, port, count = onts.len(), "discovered onts");
        Ok(onts)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Register an ONT by serial number. Retries beyond the transport's
    /// built-in budget are the caller's policy.
    pub async fn provision_ont(&self, slot: u32, port: u32, ont_id: u32, serial: &str) -> bool {
        let oid = o(ONT_PROVISION).extend(&[slot, port, ont_id]);
        let ok = self
            .snmp
            .set(&oid, Value::OctetString(serial.as_bytes().to_vec()))
            .await
            .is_ok();
        if ok {
            info!(host = %self.host(), slot, port, ont_id, serial, "ont provisioned");
        } else {
            warn!(host = %self.host(), slot, port, ont_id, serial, "ont provisioning failed");
        }
        ok
    }

    pub async fn reboot_ont(&self, slot: u32, port: u32, ont_id: u32) -> bool {
        let oid = o(ONT_REBOOT).extend(&[slot, port, ont_id]);
        let ok = self.snmp.set(&oid, Value::Integer(1)).await.is_ok();
        if ok {
            info!(host = %self.host(), slot, port, ont_id, "ont reboot requested");
        } else {
            warn!(host = %self.host(), slot, port, ont_id, "ont reboot failed");
        }
        ok
    }

    /// Admin status column: 1 = enabled, 2 = disabled.
    pub async fn set_port_enabled(&self, slot: u32, port: u32, enabled: bool) -> bool {
        let oid = o(PORT_ENABLE).extend(&[slot, port]);
        let value = if enabled { 1 } else { 2 };
        let ok = self.snmp.set(&oid, Value::Integer(value)).await.is_ok();
        if ok {
            info!(host = %self.host(), slot, port, enabled, "port admin status set");
        } else {
            warn!(host = %self.host(), slot, port, enabled, "port admin status change failed");
        }
        ok
    }

    // ── Liveness ─────────────────────────────────────────────────────

    /// Lightweight probe: one GET of sysName. Never errors.
    pub async fn test_connection(&self) -> bool {
        matches!(self.snmp.get(&o(SYSTEM_NAME)).await, Ok(Some(_)))
    }
}
