// ── Metric samples ──
//
// Immutable facts produced by the performance-collection task. The
// timestamp is always the collection time -- device uptime clocks are
// not trusted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::SourceId;

/// The fixed catalog of metrics the adapter knows how to read.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricKind {
    CpuUsage,
    MemoryUsage,
    Temperature,
    PowerConsumption,
    OpticalPowerRx,
    OpticalPowerTx,
    RxBytes,
    TxBytes,
    RxPackets,
    TxPackets,
    RxErrors,
    TxErrors,
}

impl MetricKind {
    /// Canonical unit string stored alongside each sample.
    pub fn unit(self) -> &'static str {
        match self {
            Self::CpuUsage | Self::MemoryUsage => "percent",
            Self::Temperature => "celsius",
            Self::PowerConsumption => "watts",
            Self::OpticalPowerRx | Self::OpticalPowerTx => "dbm",
            Self::RxBytes | Self::TxBytes => "bytes",
            Self::RxPackets | Self::TxPackets | Self::RxErrors | Self::TxErrors => "packets",
        }
    }
}

/// Where a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum DataSource {
    Snmp,
}

/// One collected measurement. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub source: SourceId,
    pub metric: MetricKind,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub data_source: DataSource,
}

impl MetricSample {
    /// Stamp a sample with the current collection time.
    pub fn now(source: SourceId, metric: MetricKind, value: f64) -> Self {
        Self {
            source,
            metric,
            value,
            unit: metric.unit().to_owned(),
            timestamp: Utc::now(),
            data_source: DataSource::Snmp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceId;

    #[test]
    fn metric_names_are_snake_case() {
        assert_eq!(MetricKind::CpuUsage.to_string(), "cpu_usage");
        assert_eq!(MetricKind::OpticalPowerRx.to_string(), "optical_power_rx");
    }

    #[test]
    fn sample_carries_canonical_unit() {
        let sample = MetricSample::now(
            SourceId::device(DeviceId::new("olt-1")),
            MetricKind::Temperature,
            41.5,
        );
        assert_eq!(sample.unit, "celsius");
        assert_eq!(sample.data_source, DataSource::Snmp);
    }
}
