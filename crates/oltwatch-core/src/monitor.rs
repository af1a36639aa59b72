// ── Monitoring scheduler ──
//
// One coordinating loop, five task kinds, per-task failure budgets.
// Due tasks launch concurrently each tick; every execution is caught at
// the task boundary so one failure never stalls the loop or its peers.
// Per-device work inside a task fans out too, with failures isolated
// per device.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapter::OltClient;
use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::{
    DeviceId, DeviceRecord, DeviceStatus, MetricKind, MetricSample, MonitorEvent, SourceId,
};
use crate::store::{AlarmStore, Inventory, MetricStore, NotificationSink};
use crate::thresholds::{ThresholdEngine, ThresholdTable};

// ── Tasks ───────────────────────────────────────────────────────────

/// The five recurring task kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    Discovery,
    PerformanceCollection,
    HealthCheck,
    AlarmMonitoring,
    ThresholdCheck,
}

/// What a task run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskScope {
    AllDevices,
    Device(DeviceId),
}

/// Explicit outcome of one task execution.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub success: bool,
    pub error: Option<String>,
}

impl TaskResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// In-memory scheduling unit. Lives for the process lifetime, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorTask {
    pub id: String,
    pub kind: TaskKind,
    pub scope: TaskScope,
    #[serde(skip)]
    pub interval: Duration,
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: DateTime<Utc>,
    pub error_count: u32,
    pub max_errors: u32,
}

impl MonitorTask {
    /// New tasks are due immediately.
    pub fn new(
        id: impl Into<String>,
        kind: TaskKind,
        scope: TaskScope,
        interval: Duration,
        max_errors: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            scope,
            interval,
            enabled: true,
            last_run: None,
            next_run: Utc::now(),
            error_count: 0,
            max_errors,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.next_run <= now
    }

    pub fn is_healthy(&self) -> bool {
        self.error_count < self.max_errors
    }

    fn mark_success(&mut self, now: DateTime<Utc>) {
        self.last_run = Some(now);
        self.error_count = 0;
        self.next_run = advance(now, self.interval);
    }

    fn mark_error(&mut self, now: DateTime<Utc>) {
        self.last_run = Some(now);
        self.error_count += 1;
        if self.error_count >= self.max_errors {
            self.enabled = false;
            warn!(task = %self.id, errors = self.error_count, "task disabled: error budget exhausted");
        } else {
            self.next_run = advance(now, self.interval);
        }
    }
}

fn advance(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(interval).map_or(now, |delta| now + delta)
}

/// Observer for task completions (stats exporters, tests).
pub trait TaskListener: Send + Sync {
    fn on_task_complete(&self, task: &MonitorTask, result: &TaskResult);
}

/// Service-level counters exposed to operators.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub running: bool,
    pub total_tasks: usize,
    pub enabled_tasks: usize,
    pub healthy_tasks: usize,
    pub due_tasks: usize,
    pub sessions: usize,
}

// ── Service ─────────────────────────────────────────────────────────

/// The monitoring service. Constructed once at startup and passed by
/// handle; cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct MonitorService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    config: MonitorConfig,
    inventory: Arc<dyn Inventory>,
    metrics: Arc<dyn MetricStore>,
    alarms: Arc<dyn AlarmStore>,
    notifier: Arc<dyn NotificationSink>,
    engine: ThresholdEngine,
    tasks: Mutex<HashMap<String, MonitorTask>>,
    /// Session cache: one adapter per reachable device, evicted when a
    /// liveness probe fails.
    sessions: DashMap<DeviceId, Arc<OltClient>>,
    listener: Mutex<Option<Arc<dyn TaskListener>>>,
    running: AtomicBool,
    cancel: CancellationToken,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl MonitorService {
    pub fn new(
        config: MonitorConfig,
        thresholds: ThresholdTable,
        inventory: Arc<dyn Inventory>,
        metrics: Arc<dyn MetricStore>,
        alarms: Arc<dyn AlarmStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let engine = ThresholdEngine::new(thresholds, Arc::clone(&alarms));
        Self {
            inner: Arc::new(ServiceInner {
                config,
                inventory,
                metrics,
                alarms,
                notifier,
                engine,
                tasks: Mutex::new(HashMap::new()),
                sessions: DashMap::new(),
                listener: Mutex::new(None),
                running: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                loop_handle: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Install the default task set and spawn the coordinating loop.
    pub async fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return;
        }

        for task in self.default_tasks() {
            self.add_task(task).await;
        }

        let service = self.clone();
        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(async move {
            service.monitor_loop(cancel).await;
        });
        *self.inner.loop_handle.lock().await = Some(handle);

        info!("monitor service started");
    }

    /// Cancel the loop and wait for in-flight executions to finish.
    pub async fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }

        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.loop_handle.lock().await.take() {
            let _ = handle.await;
        }

        info!("monitor service stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    fn default_tasks(&self) -> Vec<MonitorTask> {
        let config = &self.inner.config;
        let max_errors = config.max_task_errors;
        vec![
            MonitorTask::new(
                "global_device_discovery",
                TaskKind::Discovery,
                TaskScope::AllDevices,
                config.discovery_interval,
                max_errors,
            ),
            MonitorTask::new(
                "global_performance_collection",
                TaskKind::PerformanceCollection,
                TaskScope::AllDevices,
                config.performance_interval,
                max_errors,
            ),
            MonitorTask::new(
                "global_health_check",
                TaskKind::HealthCheck,
                TaskScope::AllDevices,
                config.health_check_interval,
                max_errors,
            ),
            MonitorTask::new(
                "global_threshold_check",
                TaskKind::ThresholdCheck,
                TaskScope::AllDevices,
                config.threshold_check_interval,
                max_errors,
            ),
            MonitorTask::new(
                "global_alarm_monitoring",
                TaskKind::AlarmMonitoring,
                TaskScope::AllDevices,
                config.alarm_monitoring_interval,
                max_errors,
            ),
        ]
    }

    // ── Task management ──────────────────────────────────────────────

    pub async fn add_task(&self, task: MonitorTask) {
        info!(task = %task.id, kind = %task.kind, "task added");
        self.inner.tasks.lock().await.insert(task.id.clone(), task);
    }

    pub async fn remove_task(&self, task_id: &str) -> bool {
        let removed = self.inner.tasks.lock().await.remove(task_id).is_some();
        if removed {
            info!(task = task_id, "task removed");
        }
        removed
    }

    pub async fn get_task(&self, task_id: &str) -> Option<MonitorTask> {
        self.inner.tasks.lock().await.get(task_id).cloned()
    }

    pub async fn tasks(&self) -> Vec<MonitorTask> {
        self.inner.tasks.lock().await.values().cloned().collect()
    }

    /// Re-arm a self-disabled task. This is the only recovery path once
    /// the error budget is exhausted.
    pub async fn enable_task(&self, task_id: &str) -> Result<(), CoreError> {
        let mut tasks = self.inner.tasks.lock().await;
        let task = tasks.get_mut(task_id).ok_or_else(|| CoreError::TaskNotFound {
            id: task_id.to_owned(),
        })?;
        task.enabled = true;
        task.error_count = 0;
        task.next_run = Utc::now();
        info!(task = task_id, "task re-enabled");
        Ok(())
    }

    pub async fn set_listener(&self, listener: Arc<dyn TaskListener>) {
        *self.inner.listener.lock().await = Some(listener);
    }

    pub async fn service_stats(&self) -> ServiceStats {
        let now = Utc::now();
        let tasks = self.inner.tasks.lock().await;
        ServiceStats {
            running: self.is_running(),
            total_tasks: tasks.len(),
            enabled_tasks: tasks.values().filter(|t| t.enabled).count(),
            healthy_tasks: tasks.values().filter(|t| t.is_healthy()).count(),
            due_tasks: tasks.values().filter(|t| t.is_due(now)).count(),
            sessions: self.inner.sessions.len(),
        }
    }

    // ── Coordinating loop ────────────────────────────────────────────

    async fn monitor_loop(&self, cancel: CancellationToken) {
        let mut tick = tokio::time::interval(self.inner.config.tick);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tick.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = tick.tick() => {
                    self.run_due_tasks().await;
                }
            }
        }

        debug!("monitor loop exited");
    }

    /// Launch all due tasks concurrently and apply their outcomes once
    /// every execution has finished. Task state is only mutated here, so
    /// the due-check never reads a torn update.
    async fn run_due_tasks(&self) {
        let now = Utc::now();
        let due: Vec<MonitorTask> = {
            let tasks = self.inner.tasks.lock().await;
            tasks
                .values()
                .filter(|task| task.is_due(now) && task.is_healthy())
                .cloned()
                .collect()
        };
        if due.is_empty() {
            return;
        }

        debug!(count = due.len(), "executing due tasks");
        let executions = due.iter().map(|task| {
            let service = self.clone();
            let task = task.clone();
            tokio::spawn(async move { service.execute(&task).await })
        });
        let results = join_all(executions).await;

        let finished = Utc::now();
        let listener = self.inner.listener.lock().await.clone();
        let mut tasks = self.inner.tasks.lock().await;
        for (snapshot, joined) in due.iter().zip(results) {
            // A panicking task body still only burns its own error budget.
            let result = joined.unwrap_or_else(|err| TaskResult::failed(format!("task panicked: {err}")));
            if let Some(task) = tasks.get_mut(&snapshot.id) {
                if result.success {
                    task.mark_success(finished);
                } else {
                    task.mark_error(finished);
                }
                if let Some(listener) = &listener {
                    listener.on_task_complete(task, &result);
                }
            }
        }
    }

    /// Execute one task immediately, outside the schedule, and apply the
    /// outcome to its error budget.
    pub async fn run_task_now(&self, task_id: &str) -> Result<TaskResult, CoreError> {
        let task = self
            .get_task(task_id)
            .await
            .ok_or_else(|| CoreError::TaskNotFound {
                id: task_id.to_owned(),
            })?;

        let result = self.execute(&task).await;

        let now = Utc::now();
        let listener = self.inner.listener.lock().await.clone();
        let mut tasks = self.inner.tasks.lock().await;
        if let Some(task) = tasks.get_mut(task_id) {
            if result.success {
                task.mark_success(now);
            } else {
                task.mark_error(now);
            }
            if let Some(listener) = &listener {
                listener.on_task_complete(task, &result);
            }
        }
        Ok(result)
    }

    /// The task-execution boundary: every failure below this point is
    /// converted into a `TaskResult`, never propagated.
    async fn execute(&self, task: &MonitorTask) -> TaskResult {
        debug!(task = %task.id, kind = %task.kind, "executing task");
        let outcome = match task.kind {
            TaskKind::Discovery => self.run_discovery(&task.scope).await,
            TaskKind::PerformanceCollection => self.run_performance_collection(&task.scope).await,
            TaskKind::HealthCheck => self.run_health_check(&task.scope).await,
            TaskKind::AlarmMonitoring => self.run_alarm_monitoring().await,
            TaskKind::ThresholdCheck => self.run_threshold_check().await,
        };
        match outcome {
            Ok(()) => TaskResult::ok(),
            Err(err) => {
                warn!(task = %task.id, error = %err, "task execution failed");
                TaskResult::failed(err)
            }
        }
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Cached adapter session for a device, created (and liveness-probed)
    /// on first use.
    async fn session(&self, device: &DeviceRecord) -> Result<Arc<OltClient>, CoreError> {
        if let Some(existing) = self.inner.sessions.get(&device.id) {
            return Ok(Arc::clone(existing.value()));
        }

        let client = OltClient::connect(device.snmp_target()).await?;
        if !client.test_connection().await {
            return Err(CoreError::DeviceUnreachable {
                device: device.id.clone(),
            });
        }

        let client = Arc::new(client);
        self.inner
            .sessions
            .insert(device.id.clone(), Arc::clone(&client));
        debug!(device = %device.id, host = %device.host, "session established");
        Ok(client)
    }

    fn evict_session(&self, device: &DeviceId) {
        if self.inner.sessions.remove(device).is_some() {
            debug!(device = %device, "session evicted");
        }
    }

    /// Fresh inventory read for a task run. Never cached across runs.
    async fn devices_in_scope(&self, scope: &TaskScope) -> Result<Vec<DeviceRecord>, CoreError> {
        match scope {
            TaskScope::AllDevices => Ok(self
                .inner
                .inventory
                .list_devices()
                .await?
                .into_iter()
                .filter(DeviceRecord::is_pollable)
                .collect()),
            TaskScope::Device(id) => {
                let device = self
                    .inner
                    .inventory
                    .get_device(id)
                    .await?
                    .ok_or_else(|| CoreError::DeviceNotFound { device: id.clone() })?;
                Ok(device.is_pollable().then_some(device).into_iter().collect())
            }
        }
    }

    // ── Task bodies ──────────────────────────────────────────────────

    /// Refresh device identity, ports, and ONTs, writing results back to
    /// the inventory. One device failing never aborts the others.
    async fn run_discovery(&self, scope: &TaskScope) -> Result<(), CoreError> {
        let devices = self.devices_in_scope(scope).await?;
        join_all(devices.iter().map(|device| self.discover_device(device))).await;
        Ok(())
    }

    async fn discover_device(&self, device: &DeviceRecord) {
        let client = match self.session(device).await {
            Ok(client) => client,
            Err(err) => {
                warn!(device = %device.id, error = %err, "discovery: no session");
                return;
            }
        };

        match client.discover_device_info().await {
            Ok(info) => {
                let discovered = info.discovered_info();
                if let Err(err) = self
                    .inner
                    .inventory
                    .update_discovered_info(&device.id, discovered.clone())
                    .await
                {
                    warn!(device = %device.id, error = %err, "discovery: inventory write failed");
                }
                self.inner.notifier.publish(MonitorEvent::DeviceDiscovered {
                    device: device.id.clone(),
                    system_name: discovered.system_name,
                    firmware_version: discovered.firmware_version,
                    serial_number: discovered.serial_number,
                });
            }
            Err(err) => {
                warn!(device = %device.id, error = %err, "discovery: device info fetch failed");
            }
        }

        let ports = match client.discover_all_ports().await {
            Ok(ports) => ports,
            Err(err) => {
                warn!(device = %device.id, error = %err, "discovery: port walk failed");
                return;
            }
        };

        for port_info in ports {
            let (slot, port) = (port_info.slot, port_info.port);
            if let Err(err) = self
                .inner
                .inventory
                .upsert_port(port_info.into_record(device.id.clone()))
                .await
            {
                warn!(device = %device.id, slot, port, error = %err, "discovery: port write failed");
            }

            match client.discover_all_onts(slot, port).await {
                Ok(onts) => {
                    for ont_info in onts {
                        if let Err(err) = self
                            .inner
                            .inventory
                            .upsert_ont(ont_info.into_record(device.id.clone(), slot, port))
                            .await
                        {
                            warn!(device = %device.id, slot, port, error = %err, "discovery: ont write failed");
                        }
                    }
                }
                Err(err) => {
                    warn!(device = %device.id, slot, port, error = %err, "discovery: ont walk failed");
                }
            }
        }
    }

    /// Pull CPU/memory/temperature for each device and optical/traffic
    /// counters for each known port, appending metric samples.
    async fn run_performance_collection(&self, scope: &TaskScope) -> Result<(), CoreError> {
        let devices = self.devices_in_scope(scope).await?;
        join_all(devices.iter().map(|device| self.collect_device(device))).await;
        Ok(())
    }

    async fn collect_device(&self, device: &DeviceRecord) {
        let client = match self.session(device).await {
            Ok(client) => client,
            Err(err) => {
                warn!(device = %device.id, error = %err, "collection: no session");
                return;
            }
        };

        let mut samples = Vec::new();
        let source = SourceId::device(device.id.clone());

        match client.discover_device_info().await {
            Ok(info) => {
                samples.push(MetricSample::now(
                    source.clone(),
                    MetricKind::CpuUsage,
                    info.cpu_usage,
                ));
                samples.push(MetricSample::now(
                    source.clone(),
                    MetricKind::MemoryUsage,
                    info.memory_usage,
                ));
                samples.push(MetricSample::now(
                    source.clone(),
                    MetricKind::Temperature,
                    info.temperature,
                ));
                samples.push(MetricSample::now(
                    source.clone(),
                    MetricKind::PowerConsumption,
                    info.power_consumption,
                ));
            }
            Err(err) => {
                warn!(device = %device.id, error = %err, "collection: device metrics unavailable");
            }
        }

        let ports = match self.inner.inventory.list_ports(&device.id).await {
            Ok(ports) => ports,
            Err(err) => {
                warn!(device = %device.id, error = %err, "collection: port list unavailable");
                Vec::new()
            }
        };

        for port in &ports {
            match client.get_port_info(port.slot, port.port).await {
                Ok(Some(info)) => {
                    let port_source = SourceId::port(device.id.clone(), port.slot, port.port);
                    samples.push(MetricSample::now(
                        port_source.clone(),
                        MetricKind::OpticalPowerRx,
                        info.optical_power_rx_dbm,
                    ));
                    samples.push(MetricSample::now(
                        port_source.clone(),
                        MetricKind::OpticalPowerTx,
                        info.optical_power_tx_dbm,
                    ));
                    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
                    {
                        samples.push(MetricSample::now(
                            port_source.clone(),
                            MetricKind::RxBytes,
                            info.rx_bytes as f64,
                        ));
                        samples.push(MetricSample::now(
                            port_source,
                            MetricKind::TxBytes,
                            info.tx_bytes as f64,
                        ));
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        device = %device.id,
                        slot = port.slot,
                        port = port.port,
                        error = %err,
                        "collection: port metrics unavailable"
                    );
                }
            }
        }

        if samples.is_empty() {
            return;
        }
        for sample in &samples {
            if let Err(err) = self.inner.metrics.append_sample(sample.clone()).await {
                warn!(device = %device.id, error = %err, "collection: sample write failed");
            }
        }
        self.inner.notifier.publish(MonitorEvent::MetricBatch {
            source,
            samples,
        });
    }

    /// Probe each device and flip its reachability status. Bounded per
    /// device by the transport's timeout × retries.
    async fn run_health_check(&self, scope: &TaskScope) -> Result<(), CoreError> {
        let devices = self.devices_in_scope(scope).await?;
        join_all(devices.iter().map(|device| self.check_device(device))).await;
        Ok(())
    }

    async fn check_device(&self, device: &DeviceRecord) {
        let status = match self.session(device).await {
            Ok(client) => {
                if client.test_connection().await {
                    DeviceStatus::Online
                } else {
                    self.evict_session(&device.id);
                    DeviceStatus::Unreachable
                }
            }
            Err(err) if err.is_device_unreachable() => DeviceStatus::Unreachable,
            Err(err) => {
                warn!(device = %device.id, error = %err, "health check error");
                DeviceStatus::Error
            }
        };

        let last_seen = (status == DeviceStatus::Online).then(Utc::now);
        if let Err(err) = self
            .inner
            .inventory
            .update_device_status(&device.id, status, last_seen)
            .await
        {
            warn!(device = %device.id, error = %err, "health: status write failed");
            return;
        }

        if status != device.status {
            info!(device = %device.id, from = %device.status, to = %status, "device status changed");
            self.inner
                .notifier
                .publish(MonitorEvent::DeviceStatusChanged {
                    device: device.id.clone(),
                    status,
                    last_seen,
                });
        }
    }

    /// Re-notify alarms still active past the notification cooldown.
    /// This deduplicates outbound noise; alarm creation dedup lives in
    /// the threshold engine and alarm store.
    async fn run_alarm_monitoring(&self) -> Result<(), CoreError> {
        let active = self.inner.alarms.list_active_alarms().await?;
        let now = Utc::now();
        let cooldown = chrono::Duration::from_std(self.inner.config.notification_cooldown)
            .unwrap_or_else(|_| chrono::Duration::hours(1));

        for mut alarm in active {
            let due = alarm
                .last_notification
                .is_none_or(|sent| now - sent >= cooldown);
            if !due {
                continue;
            }
            alarm.last_notification = Some(now);
            self.inner.alarms.update_alarm(alarm.clone()).await?;
            self.inner
                .notifier
                .publish(MonitorEvent::AlarmRaised { alarm });
        }
        Ok(())
    }

    /// Evaluate recently collected samples against the threshold table.
    async fn run_threshold_check(&self) -> Result<(), CoreError> {
        let window = chrono::Duration::from_std(self.inner.config.sample_window)
            .unwrap_or_else(|_| chrono::Duration::minutes(10));
        let since = Utc::now() - window;

        let samples = self.inner.metrics.recent_samples(since).await?;
        debug!(count = samples.len(), "threshold check over recent samples");
        for sample in &samples {
            self.inner.engine.evaluate(sample).await?;
        }
        Ok(())
    }
}
