//! Device-monitoring core for oltwatch.
//!
//! This crate owns the background polling pipeline between the SNMP
//! transport (`oltwatch-snmp`) and the external CRUD layer:
//!
//! - **[`MonitorService`]** — Central facade managing the scheduler
//!   lifecycle: [`start()`](MonitorService::start) installs the default
//!   task set and spawns the coordinating loop; tasks run concurrently
//!   each tick with per-task failure budgets and self-disable on
//!   exhaustion. Constructed once at process startup and passed by
//!   handle -- no global singletons.
//!
//! - **[`OltClient`]** — ZTE C320 protocol adapter: maps the named
//!   metric catalog onto vendor OID trees, decodes fixed-point values,
//!   and isolates per-entity fetch failures during discovery.
//!
//! - **[`ThresholdEngine`]** — evaluates metric samples against static
//!   warning/critical bounds, deduplicates alarms per (source, type),
//!   and clears them when values recover.
//!
//! - **Store traits** ([`store`]) — narrow seams to the external
//!   inventory, metric, alarm, and notification collaborators, with
//!   in-memory implementations for the daemon default and tests.
//!
//! - **Domain model** ([`model`]) — devices, ports, ONTs, metric
//!   samples, alarms, and notification events.

pub mod adapter;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod store;
pub mod thresholds;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapter::{OltClient, OltInfo, OntInfo, PortInfo};
pub use config::MonitorConfig;
pub use error::CoreError;
pub use monitor::{
    MonitorService, MonitorTask, ServiceStats, TaskKind, TaskListener, TaskResult, TaskScope,
};
pub use store::{
    AlarmStore, BroadcastNotifier, Inventory, MemoryAlarmStore, MemoryInventory, MemoryMetricStore,
    MetricStore, NotificationSink,
};
pub use thresholds::{Direction, Threshold, ThresholdEngine, ThresholdTable};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alarm, AlarmSeverity, AlarmStatus, DataSource, DeviceId, DeviceRecord, DeviceStatus,
    DiscoveredInfo, MetricKind, MetricSample, MonitorEvent, OntRecord, OntStatus, PortRecord,
    PortStatus, SnmpSettings, SourceId,
};
