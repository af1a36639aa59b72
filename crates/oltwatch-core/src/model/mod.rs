//! Canonical domain types for the monitoring core.

pub mod alarm;
pub mod device;
pub mod event;
pub mod identity;
pub mod metric;

pub use alarm::{Alarm, AlarmSeverity, AlarmStatus};
pub use device::{
    DeviceRecord, DeviceStatus, DiscoveredInfo, OntRecord, OntStatus, PortRecord, PortStatus,
    SnmpSettings,
};
pub use event::MonitorEvent;
pub use identity::{DeviceId, SourceId};
pub use metric::{DataSource, MetricKind, MetricSample};
