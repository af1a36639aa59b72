// ── Threshold evaluation and alarm correlation ──
//
// Static per-metric warning/critical bounds. Critical wins when both
// bounds are breached. A persisting condition updates the existing
// ACTIVE alarm in place; a sample back inside bounds clears it
// (clear-on-recovery). Metrics without a configured threshold are
// ignored entirely.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{Alarm, AlarmSeverity, MetricKind, MetricSample};
use crate::store::AlarmStore;

/// Which direction is dangerous for a metric.
///
/// CPU and temperature alarm on high values; received optical power
/// alarms on *low* values -- a weak signal, not a strong one, is the
/// problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Above,
    Below,
}

/// Warning/critical bound pair for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub warning: f64,
    pub critical: f64,
    pub direction: Direction,
}

impl Threshold {
    pub fn above(warning: f64, critical: f64) -> Self {
        Self {
            warning,
            critical,
            direction: Direction::Above,
        }
    }

    pub fn below(warning: f64, critical: f64) -> Self {
        Self {
            warning,
            critical,
            direction: Direction::Below,
        }
    }

    fn breaches(&self, value: f64, bound: f64) -> bool {
        match self.direction {
            Direction::Above => value >= bound,
            Direction::Below => value <= bound,
        }
    }

    /// Critical takes precedence over warning when both trigger.
    pub fn classify(&self, value: f64) -> Option<AlarmSeverity> {
        if self.breaches(value, self.critical) {
            Some(AlarmSeverity::Critical)
        } else if self.breaches(value, self.warning) {
            Some(AlarmSeverity::Warning)
        } else {
            None
        }
    }
}

/// Per-metric threshold configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    entries: HashMap<MetricKind, Threshold>,
}

impl ThresholdTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn set(&mut self, metric: MetricKind, threshold: Threshold) {
        self.entries.insert(metric, threshold);
    }

    pub fn get(&self, metric: MetricKind) -> Option<&Threshold> {
        self.entries.get(&metric)
    }

    pub fn remove(&mut self, metric: MetricKind) -> Option<Threshold> {
        self.entries.remove(&metric)
    }
}

impl Default for ThresholdTable {
    /// The stock table: utilization and temperature alarm high, optical
    /// power alarms low.
    fn default() -> Self {
        let mut table = Self::empty();
        table.set(MetricKind::CpuUsage, Threshold::above(80.0, 95.0));
        table.set(MetricKind::MemoryUsage, Threshold::above(85.0, 95.0));
        table.set(MetricKind::Temperature, Threshold::above(70.0, 85.0));
        table.set(MetricKind::OpticalPowerRx, Threshold::below(-25.0, -30.0));
        table.set(MetricKind::OpticalPowerTx, Threshold::below(-3.0, -5.0));
        table
    }
}

/// Evaluates samples against the table and correlates alarms through the
/// alarm store. The store's per-(source, type) atomicity guarantee keeps
/// concurrent evaluations from double-raising.
pub struct ThresholdEngine {
    table: ThresholdTable,
    alarms: Arc<dyn AlarmStore>,
}

impl ThresholdEngine {
    pub fn new(table: ThresholdTable, alarms: Arc<dyn AlarmStore>) -> Self {
        Self { table, alarms }
    }

    pub fn table(&self) -> &ThresholdTable {
        &self.table
    }

    /// Evaluate one sample. Returns the severity raised, if any.
    pub async fn evaluate(&self, sample: &MetricSample) -> Result<Option<AlarmSeverity>, CoreError> {
        let Some(threshold) = self.table.get(sample.metric) else {
            return Ok(None);
        };

        let alarm_type = format!("threshold_{}", sample.metric);
        match threshold.classify(sample.value) {
            Some(severity) => {
                self.raise_or_update(sample, &alarm_type, severity, threshold)
                    .await?;
                Ok(Some(severity))
            }
            None => {
                self.clear_on_recovery(sample, &alarm_type).await?;
                Ok(None)
            }
        }
    }

    async fn raise_or_update(
        &self,
        sample: &MetricSample,
        alarm_type: &str,
        severity: AlarmSeverity,
        threshold: &Threshold,
    ) -> Result<(), CoreError> {
        let bound = match severity {
            AlarmSeverity::Critical => threshold.critical,
            _ => threshold.warning,
        };
        let message = format!(
            "{} {severity} threshold breached: {:.2} {} (bound {bound})",
            sample.metric, sample.value, sample.unit,
        );

        if let Some(mut existing) = self
            .alarms
            .find_active_alarm(&sample.source, alarm_type)
            .await?
        {
            existing.record_occurrence(severity, message, sample.timestamp);
            self.alarms.update_alarm(existing).await?;
            debug!(source = %sample.source, alarm_type, %severity, "alarm updated");
        } else {
            let alarm = Alarm::new(sample.source.clone(), alarm_type, severity, message);
            info!(source = %sample.source, alarm_type, %severity, "alarm raised");
            self.alarms.create_alarm(alarm).await?;
        }
        Ok(())
    }

    async fn clear_on_recovery(
        &self,
        sample: &MetricSample,
        alarm_type: &str,
    ) -> Result<(), CoreError> {
        if let Some(mut alarm) = self
            .alarms
            .find_active_alarm(&sample.source, alarm_type)
            .await?
        {
            alarm.clear();
            alarm.last_occurrence = sample.timestamp;
            self.alarms.update_alarm(alarm).await?;
            info!(source = %sample.source, alarm_type, "alarm cleared on recovery");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AlarmStatus, DeviceId, SourceId};
    use crate::store::MemoryAlarmStore;

    fn engine_with_store() -> (ThresholdEngine, Arc<MemoryAlarmStore>) {
        let store = Arc::new(MemoryAlarmStore::new());
        let engine = ThresholdEngine::new(ThresholdTable::default(), store.clone());
        (engine, store)
    }

    fn cpu_sample(value: f64) -> MetricSample {
        MetricSample::now(
            SourceId::device(DeviceId::new("olt-1")),
            MetricKind::CpuUsage,
            value,
        )
    }

    #[tokio::test]
    async fn repeated_breach_yields_one_alarm() {
        let (engine, store) = engine_with_store();

        for _ in 0..3 {
            let raised = engine.evaluate(&cpu_sample(96.0)).await.unwrap();
            assert_eq!(raised, Some(AlarmSeverity::Critical));
        }

        let active = store.list_active_alarms().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].occurrence_count, 3);
        assert!(active[0].last_occurrence >= active[0].first_occurrence);
    }

    #[tokio::test]
    async fn critical_wins_over_warning() {
        let (engine, store) = engine_with_store();

        // 97 breaches both the 80 warning and the 95 critical bound.
        let raised = engine.evaluate(&cpu_sample(97.0)).await.unwrap();
        assert_eq!(raised, Some(AlarmSeverity::Critical));

        let active = store.list_active_alarms().await.unwrap();
        assert_eq!(active[0].severity, AlarmSeverity::Critical);
    }

    #[tokio::test]
    async fn warning_band_raises_warning() {
        let (engine, store) = engine_with_store();

        let raised = engine.evaluate(&cpu_sample(85.0)).await.unwrap();
        assert_eq!(raised, Some(AlarmSeverity::Warning));
        assert_eq!(
            store.list_active_alarms().await.unwrap()[0].severity,
            AlarmSeverity::Warning
        );
    }

    #[tokio::test]
    async fn unconfigured_metric_is_a_noop() {
        let (engine, store) = engine_with_store();

        let sample = MetricSample::now(
            SourceId::device(DeviceId::new("olt-1")),
            MetricKind::RxBytes,
            1e12,
        );
        let raised = engine.evaluate(&sample).await.unwrap();
        assert_eq!(raised, None);
        assert_eq!(store.active_count(), 0);
        assert!(store.history_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn low_optical_power_alarms_below_bound() {
        let (engine, store) = engine_with_store();
        let source = SourceId::port(DeviceId::new("olt-1"), 1, 2);

        let warn = MetricSample::now(source.clone(), MetricKind::OpticalPowerRx, -26.0);
        assert_eq!(
            engine.evaluate(&warn).await.unwrap(),
            Some(AlarmSeverity::Warning)
        );

        let crit = MetricSample::now(source, MetricKind::OpticalPowerRx, -31.0);
        assert_eq!(
            engine.evaluate(&crit).await.unwrap(),
            Some(AlarmSeverity::Critical)
        );

        let active = store.list_active_alarms().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].severity, AlarmSeverity::Critical);
    }

    #[tokio::test]
    async fn recovery_clears_the_active_alarm() {
        let (engine, store) = engine_with_store();

        engine.evaluate(&cpu_sample(96.0)).await.unwrap();
        assert_eq!(store.active_count(), 1);

        engine.evaluate(&cpu_sample(40.0)).await.unwrap();
        assert_eq!(store.active_count(), 0);

        let history = store.history_snapshot().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, AlarmStatus::Cleared);
    }

    #[tokio::test]
    async fn recovery_without_alarm_is_silent() {
        let (engine, store) = engine_with_store();
        engine.evaluate(&cpu_sample(10.0)).await.unwrap();
        assert_eq!(store.active_count(), 0);
        assert!(store.history_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn distinct_sources_get_distinct_alarms() {
        let (engine, store) = engine_with_store();

        let a = MetricSample::now(
            SourceId::device(DeviceId::new("olt-1")),
            MetricKind::CpuUsage,
            96.0,
        );
        let b = MetricSample::now(
            SourceId::device(DeviceId::new("olt-2")),
            MetricKind::CpuUsage,
            96.0,
        );
        engine.evaluate(&a).await.unwrap();
        engine.evaluate(&b).await.unwrap();

        assert_eq!(store.active_count(), 2);
    }
}
