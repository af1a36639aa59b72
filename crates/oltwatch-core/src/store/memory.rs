// ── In-memory store implementations ──
//
// DashMap-backed stand-ins for the external CRUD layer. The daemon runs
// on these when no database is wired up, and the test suite uses them
// throughout.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use super::{AlarmStore, Inventory, MetricStore, NotificationSink};
use crate::error::CoreError;
use crate::model::{
    Alarm, AlarmStatus, DeviceId, DeviceRecord, DeviceStatus, DiscoveredInfo, MetricSample,
    MonitorEvent, OntRecord, PortRecord, SourceId,
};

// ── Inventory ───────────────────────────────────────────────────────

/// In-memory device/port/ONT inventory.
#[derive(Default)]
pub struct MemoryInventory {
    devices: DashMap<DeviceId, DeviceRecord>,
    ports: DashMap<(DeviceId, u32, u32), PortRecord>,
    onts: DashMap<(DeviceId, u32, u32, u32), OntRecord>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a device (configuration load, tests).
    pub fn add_device(&self, device: DeviceRecord) {
        self.devices.insert(device.id.clone(), device);
    }

    pub fn ports_snapshot(&self) -> Vec<PortRecord> {
        self.ports.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn onts_snapshot(&self) -> Vec<OntRecord> {
        self.onts.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[async_trait]
impl Inventory for MemoryInventory {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, CoreError> {
        Ok(self
            .devices
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get_device(&self, id: &DeviceId) -> Result<Option<DeviceRecord>, CoreError> {
        Ok(self.devices.get(id).map(|entry| entry.value().clone()))
    }

    async fn update_discovered_info(
        &self,
        id: &DeviceId,
        info: DiscoveredInfo,
    ) -> Result<(), CoreError> {
        if let Some(mut entry) = self.devices.get_mut(id) {
            entry.info = info;
            entry.last_seen = Some(Utc::now());
        }
        Ok(())
    }

    async fn update_device_status(
        &self,
        id: &DeviceId,
        status: DeviceStatus,
        last_seen: Option<DateTime<Utc>>,
    ) -> Result<(), CoreError> {
        if let Some(mut entry) = self.devices.get_mut(id) {
            entry.status = status;
            if last_seen.is_some() {
                entry.last_seen = last_seen;
            }
        }
        Ok(())
    }

    async fn upsert_port(&self, record: PortRecord) -> Result<(), CoreError> {
        let key = (record.device.clone(), record.slot, record.port);
        self.ports.insert(key, record);
        Ok(())
    }

    async fn upsert_ont(&self, record: OntRecord) -> Result<(), CoreError> {
        let key = (record.device.clone(), record.slot, record.port, record.ont_id);
        self.onts.insert(key, record);
        Ok(())
    }

    async fn list_ports(&self, device: &DeviceId) -> Result<Vec<PortRecord>, CoreError> {
        Ok(self
            .ports
            .iter()
            .filter(|entry| &entry.value().device == device)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

// ── Metrics ─────────────────────────────────────────────────────────

/// Bounded in-memory sample buffer.
pub struct MemoryMetricStore {
    samples: Mutex<VecDeque<MetricSample>>,
    max_samples: usize,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self::with_capacity(100_000)
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
            max_samples,
        }
    }
}

impl Default for MemoryMetricStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricStore for MemoryMetricStore {
    async fn append_sample(&self, sample: MetricSample) -> Result<(), CoreError> {
        let mut samples = self.samples.lock().await;
        if samples.len() >= self.max_samples {
            samples.pop_front();
        }
        samples.push_back(sample);
        Ok(())
    }

    async fn recent_samples(&self, since: DateTime<Utc>) -> Result<Vec<MetricSample>, CoreError> {
        let samples = self.samples.lock().await;
        Ok(samples
            .iter()
            .filter(|sample| sample.timestamp >= since)
            .cloned()
            .collect())
    }
}

// ── Alarms ──────────────────────────────────────────────────────────

/// In-memory alarm store upholding the at-most-one-ACTIVE invariant.
///
/// The active map is keyed by (source, alarm_type); `create_alarm` on an
/// occupied slot merges into the existing record instead of inserting a
/// duplicate, which makes racing find-then-create sequences safe. Alarms
/// leaving the ACTIVE state move to a retained history.
#[derive(Default)]
pub struct MemoryAlarmStore {
    active: DashMap<(SourceId, String), Alarm>,
    history: Mutex<Vec<Alarm>>,
}

impl MemoryAlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All non-active alarms ever recorded (acknowledged and cleared).
    pub async fn history_snapshot(&self) -> Vec<Alarm> {
        self.history.lock().await.clone()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[async_trait]
impl AlarmStore for MemoryAlarmStore {
    async fn find_active_alarm(
        &self,
        source: &SourceId,
        alarm_type: &str,
    ) -> Result<Option<Alarm>, CoreError> {
        let key = (source.clone(), alarm_type.to_owned());
        Ok(self.active.get(&key).map(|entry| entry.value().clone()))
    }

    async fn create_alarm(&self, alarm: Alarm) -> Result<(), CoreError> {
        let key = (alarm.source.clone(), alarm.alarm_type.clone());
        match self.active.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                // Lost a create/create race: fold into the survivor.
                let existing = occupied.get_mut();
                existing.record_occurrence(
                    alarm.severity,
                    alarm.message,
                    alarm.last_occurrence,
                );
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                debug!(source = %alarm.source, alarm_type = %alarm.alarm_type, "alarm raised");
                vacant.insert(alarm);
            }
        }
        Ok(())
    }

    async fn update_alarm(&self, alarm: Alarm) -> Result<(), CoreError> {
        let key = (alarm.source.clone(), alarm.alarm_type.clone());
        if alarm.status == AlarmStatus::Active {
            self.active.insert(key, alarm);
        } else {
            self.active.remove(&key);
            self.history.lock().await.push(alarm);
        }
        Ok(())
    }

    async fn list_active_alarms(&self) -> Result<Vec<Alarm>, CoreError> {
        Ok(self
            .active
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}

// ── Notifications ───────────────────────────────────────────────────

/// Notification sink backed by a tokio broadcast channel.
///
/// Subscribers that lag simply miss events -- delivery guarantees are
/// explicitly not the core's responsibility.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Arc<MonitorEvent>>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<MonitorEvent>> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl NotificationSink for BroadcastNotifier {
    fn publish(&self, event: MonitorEvent) {
        // No receivers is fine -- send only fails when nobody listens.
        let _ = self.tx.send(Arc::new(event));
    }
}
