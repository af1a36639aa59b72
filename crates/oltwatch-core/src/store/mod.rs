// ── External store boundaries ──
//
// The CRUD layer owns persistence; the core talks to it through these
// narrow traits. The in-memory implementations in `memory` back the
// daemon's default runtime and the test suite.

mod memory;

pub use memory::{BroadcastNotifier, MemoryAlarmStore, MemoryInventory, MemoryMetricStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::model::{
    Alarm, DeviceId, DeviceRecord, DeviceStatus, DiscoveredInfo, MetricSample, MonitorEvent,
    OntRecord, PortRecord, SourceId,
};

/// Read/write access to the device inventory.
///
/// Devices are read fresh at the start of every task run -- the core
/// never caches inventory across runs, since device configuration may
/// change between ticks.
#[async_trait]
pub trait Inventory: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, CoreError>;

    async fn get_device(&self, id: &DeviceId) -> Result<Option<DeviceRecord>, CoreError>;

    /// Write back identity/firmware facts found by discovery.
    async fn update_discovered_info(
        &self,
        id: &DeviceId,
        info: DiscoveredInfo,
    ) -> Result<(), CoreError>;

    /// Flip reachability status and optionally refresh last-seen.
    async fn update_device_status(
        &self,
        id: &DeviceId,
        status: DeviceStatus,
        last_seen: Option<DateTime<Utc>>,
    ) -> Result<(), CoreError>;

    async fn upsert_port(&self, record: PortRecord) -> Result<(), CoreError>;

    async fn upsert_ont(&self, record: OntRecord) -> Result<(), CoreError>;

    /// Known ports of a device, for per-port collection.
    async fn list_ports(&self, device: &DeviceId) -> Result<Vec<PortRecord>, CoreError>;
}

/// Durable sink plus short-window read-back for metric samples.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Fire-and-forget durable write; must not block significantly.
    async fn append_sample(&self, sample: MetricSample) -> Result<(), CoreError>;

    /// Samples with a collection timestamp at or after `since`, for the
    /// threshold-check task.
    async fn recent_samples(&self, since: DateTime<Utc>) -> Result<Vec<MetricSample>, CoreError>;
}

/// Alarm persistence.
///
/// Implementations must make find-then-create/update atomic per
/// (source, alarm_type) -- the engine relies on the store to uphold the
/// at-most-one-ACTIVE-alarm invariant under concurrent evaluations and
/// does not add its own locking.
#[async_trait]
pub trait AlarmStore: Send + Sync {
    async fn find_active_alarm(
        &self,
        source: &SourceId,
        alarm_type: &str,
    ) -> Result<Option<Alarm>, CoreError>;

    async fn create_alarm(&self, alarm: Alarm) -> Result<(), CoreError>;

    async fn update_alarm(&self, alarm: Alarm) -> Result<(), CoreError>;

    async fn list_active_alarms(&self) -> Result<Vec<Alarm>, CoreError>;
}

/// Outbound event fan-out. Delivery guarantees are the sink's concern.
pub trait NotificationSink: Send + Sync {
    fn publish(&self, event: MonitorEvent);
}
