// ── Notification events ──
//
// What the core hands to the notification sink. Delivery, ordering, and
// retry are the sink's problem, not ours.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alarm::Alarm;
use super::device::DeviceStatus;
use super::identity::{DeviceId, SourceId};
use super::metric::MetricSample;

/// Events published to the notification sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    AlarmRaised {
        alarm: Alarm,
    },
    MetricBatch {
        source: SourceId,
        samples: Vec<MetricSample>,
    },
    DeviceStatusChanged {
        device: DeviceId,
        status: DeviceStatus,
        last_seen: Option<DateTime<Utc>>,
    },
    DeviceDiscovered {
        device: DeviceId,
        system_name: Option<String>,
        firmware_version: Option<String>,
        serial_number: Option<String>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let event = MonitorEvent::DeviceStatusChanged {
            device: DeviceId::new("olt-1"),
            status: DeviceStatus::Online,
            last_seen: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "device_status_changed");
        assert_eq!(json["status"], "online");
    }
}
