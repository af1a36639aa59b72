//! Shared configuration for the oltwatch daemon.
//!
//! TOML file + `OLTWATCH_` environment overrides, translated into the
//! core's runtime types: `MonitorConfig`, seed `DeviceRecord`s, and the
//! `ThresholdTable`. The core never reads config files itself.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use oltwatch_core::thresholds::{Direction, Threshold, ThresholdTable};
use oltwatch_core::{DeviceRecord, MetricKind, MonitorConfig, SnmpSettings};
use oltwatch_snmp::{SnmpCredentials, SnmpVersion};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level daemon configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub snmp: SnmpDefaults,

    /// Seed inventory for the in-memory store.
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,

    /// Threshold overrides, applied on top of the stock table.
    #[serde(default)]
    pub thresholds: Vec<ThresholdEntry>,
}

/// Scheduler cadence, in seconds.
#[derive(Debug, Deserialize, Serialize)]
pub struct ServiceSettings {
    #[serde(default = "default_tick")]
    pub tick_seconds: u64,

    #[serde(default = "default_discovery")]
    pub discovery_interval_seconds: u64,

    #[serde(default = "default_performance")]
    pub performance_interval_seconds: u64,

    #[serde(default = "default_health")]
    pub health_check_interval_seconds: u64,

    #[serde(default = "default_threshold")]
    pub threshold_check_interval_seconds: u64,

    #[serde(default = "default_alarm")]
    pub alarm_monitoring_interval_seconds: u64,

    #[serde(default = "default_cooldown")]
    pub notification_cooldown_seconds: u64,

    #[serde(default = "default_window")]
    pub sample_window_seconds: u64,

    #[serde(default = "default_max_errors")]
    pub max_task_errors: u32,
}

fn default_tick() -> u64 {
    10
}
fn default_discovery() -> u64 {
    600
}
fn default_performance() -> u64 {
    300
}
fn default_health() -> u64 {
    300
}
fn default_threshold() -> u64 {
    120
}
fn default_alarm() -> u64 {
    60
}
fn default_cooldown() -> u64 {
    3600
}
fn default_window() -> u64 {
    600
}
fn default_max_errors() -> u32 {
    5
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick(),
            discovery_interval_seconds: default_discovery(),
            performance_interval_seconds: default_performance(),
            health_check_interval_seconds: default_health(),
            threshold_check_interval_seconds: default_threshold(),
            alarm_monitoring_interval_seconds: default_alarm(),
            notification_cooldown_seconds: default_cooldown(),
            sample_window_seconds: default_window(),
            max_task_errors: default_max_errors(),
        }
    }
}

/// Global SNMP defaults, overridable per device.
#[derive(Debug, Deserialize, Serialize)]
pub struct SnmpDefaults {
    #[serde(default = "default_community")]
    pub community: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_community() -> String {
    "public".into()
}
fn default_version() -> String {
    "2c".into()
}
fn default_port() -> u16 {
    161
}
fn default_timeout() -> u64 {
    5
}
fn default_retries() -> u32 {
    3
}

impl Default for SnmpDefaults {
    fn default() -> Self {
        Self {
            community: default_community(),
            version: default_version(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            retries: default_retries(),
        }
    }
}

/// One monitored device.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeviceEntry {
    pub id: String,
    pub name: Option<String>,
    pub host: String,
    pub community: Option<String>,
    pub version: Option<String>,
    pub port: Option<u16>,
    pub timeout_seconds: Option<u64>,
    pub retries: Option<u32>,
}

/// One threshold override.
#[derive(Debug, Deserialize, Serialize)]
pub struct ThresholdEntry {
    pub metric: MetricKind,
    pub warning: f64,
    pub critical: f64,
    pub direction: Direction,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Default config file location (`~/.config/oltwatch/config.toml` on
/// Linux).
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("io", "oltwatch", "oltwatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("oltwatch.toml"))
}

/// Load configuration: built-in defaults, then the TOML file (if it
/// exists), then `OLTWATCH_`-prefixed environment variables.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = path.map_or_else(default_config_path, Path::to_path_buf);
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed("OLTWATCH_").split("__"))
        .extract()?;
    Ok(config)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Everything the daemon needs to construct the monitor service.
pub struct Resolved {
    pub monitor: MonitorConfig,
    pub devices: Vec<DeviceRecord>,
    pub thresholds: ThresholdTable,
}

impl Config {
    /// Validate and translate into core runtime types.
    pub fn resolve(self) -> Result<Resolved, ConfigError> {
        if self.service.tick_seconds == 0 {
            return Err(invalid("service.tick_seconds", "must be greater than zero"));
        }

        let monitor = MonitorConfig {
            tick: Duration::from_secs(self.service.tick_seconds),
            discovery_interval: Duration::from_secs(self.service.discovery_interval_seconds),
            performance_interval: Duration::from_secs(self.service.performance_interval_seconds),
            health_check_interval: Duration::from_secs(self.service.health_check_interval_seconds),
            threshold_check_interval: Duration::from_secs(
                self.service.threshold_check_interval_seconds,
            ),
            alarm_monitoring_interval: Duration::from_secs(
                self.service.alarm_monitoring_interval_seconds,
            ),
            notification_cooldown: Duration::from_secs(self.service.notification_cooldown_seconds),
            sample_window: Duration::from_secs(self.service.sample_window_seconds),
            max_task_errors: self.service.max_task_errors,
        };

        let default_version = parse_version("snmp.version", &self.snmp.version)?;

        let mut seen = HashSet::new();
        let mut devices = Vec::with_capacity(self.devices.len());
        for entry in self.devices {
            let DeviceEntry {
                id,
                name,
                host,
                community,
                version,
                port,
                timeout_seconds,
                retries,
            } = entry;

            if !seen.insert(id.clone()) {
                return Err(invalid("devices", format!("duplicate device id '{id}'")));
            }
            if host.is_empty() {
                return Err(invalid(format!("devices.{id}.host"), "must not be empty"));
            }

            let version = match &version {
                Some(raw) => parse_version(format!("devices.{id}.version"), raw)?,
                None => default_version,
            };
            let community = community.unwrap_or_else(|| self.snmp.community.clone());

            let snmp = SnmpSettings {
                port: port.unwrap_or(self.snmp.port),
                version,
                credentials: SnmpCredentials::Community(SecretString::from(community)),
                timeout: Duration::from_secs(timeout_seconds.unwrap_or(self.snmp.timeout_seconds)),
                retries: retries.unwrap_or(self.snmp.retries),
            };

            let name = name.unwrap_or_else(|| id.clone());
            let mut device = DeviceRecord::new(id.as_str(), name, host);
            device.snmp = snmp;
            devices.push(device);
        }

        let mut thresholds = ThresholdTable::default();
        for entry in self.thresholds {
            if entry.direction == Direction::Above && entry.warning > entry.critical {
                return Err(invalid(
                    "thresholds",
                    format!("{}: warning bound above critical bound", entry.metric),
                ));
            }
            if entry.direction == Direction::Below && entry.warning < entry.critical {
                return Err(invalid(
                    "thresholds",
                    format!("{}: warning bound below critical bound", entry.metric),
                ));
            }
            thresholds.set(
                entry.metric,
                Threshold {
                    warning: entry.warning,
                    critical: entry.critical,
                    direction: entry.direction,
                },
            );
        }

        Ok(Resolved {
            monitor,
            devices,
            thresholds,
        })
    }
}

fn parse_version(field: impl Into<String>, raw: &str) -> Result<SnmpVersion, ConfigError> {
    raw.parse()
        .map_err(|_| invalid(field, format!("unknown SNMP version '{raw}'")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_resolve_cleanly() {
        let resolved = Config::default().resolve().unwrap();
        assert_eq!(resolved.monitor.tick, Duration::from_secs(10));
        assert_eq!(resolved.monitor.discovery_interval, Duration::from_secs(600));
        assert_eq!(resolved.monitor.alarm_monitoring_interval, Duration::from_secs(60));
        assert!(resolved.devices.is_empty());
        assert!(resolved.thresholds.get(MetricKind::CpuUsage).is_some());
    }

    #[test]
    fn file_and_env_are_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [service]
                    tick_seconds = 5

                    [snmp]
                    community = "lab"

                    [[devices]]
                    id = "olt-1"
                    host = "192.0.2.10"

                    [[devices]]
                    id = "olt-2"
                    host = "192.0.2.11"
                    community = "special"
                    port = 1161
                "#,
            )?;
            jail.set_env("OLTWATCH_SERVICE__MAX_TASK_ERRORS", "7");

            let config = load(Some(Path::new("config.toml"))).expect("load");
            assert_eq!(config.service.tick_seconds, 5);
            assert_eq!(config.service.max_task_errors, 7);

            let resolved = config.resolve().expect("resolve");
            assert_eq!(resolved.monitor.max_task_errors, 7);
            assert_eq!(resolved.devices.len(), 2);
            assert_eq!(resolved.devices[0].snmp.port, 161);
            assert_eq!(resolved.devices[1].snmp.port, 1161);
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.service.tick_seconds, 10);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn duplicate_device_ids_are_rejected() {
        let mut config = Config::default();
        for _ in 0..2 {
            config.devices.push(DeviceEntry {
                id: "olt-1".into(),
                name: None,
                host: "192.0.2.10".into(),
                community: None,
                version: None,
                port: None,
                timeout_seconds: None,
                retries: None,
            });
        }
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn unknown_snmp_version_is_rejected() {
        let mut config = Config::default();
        config.snmp.version = "4".into();
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn zero_tick_is_rejected() {
        let mut config = Config::default();
        config.service.tick_seconds = 0;
        assert!(config.resolve().is_err());
    }

    #[test]
    fn threshold_overrides_extend_the_stock_table() {
        let mut config = Config::default();
        config.thresholds.push(ThresholdEntry {
            metric: MetricKind::Temperature,
            warning: 60.0,
            critical: 75.0,
            direction: Direction::Above,
        });

        let resolved = config.resolve().unwrap();
        let temp = resolved.thresholds.get(MetricKind::Temperature).unwrap();
        assert_eq!(temp.warning, 60.0);
        assert_eq!(temp.critical, 75.0);
        // Untouched entries keep their stock bounds.
        let cpu = resolved.thresholds.get(MetricKind::CpuUsage).unwrap();
        assert_eq!(cpu.critical, 95.0);
    }

    #[test]
    fn inverted_threshold_bounds_are_rejected() {
        let mut config = Config::default();
        config.thresholds.push(ThresholdEntry {
            metric: MetricKind::CpuUsage,
            warning: 99.0,
            critical: 80.0,
            direction: Direction::Above,
        });
        assert!(config.resolve().is_err());
    }
}
