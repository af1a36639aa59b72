// ── Runtime configuration for the monitor service ──
//
// Built by the config crate (or by hand in tests) and handed to
// `MonitorService::new` -- the core never reads config files.

use std::time::Duration;

/// Scheduler cadence and policy knobs.
///
/// Intervals are defaults, not constants: alarm and threshold checks run
/// much more often than discovery on purpose, reflecting urgency.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Coordinating loop wake-up period.
    pub tick: Duration,
    /// Device/port/ONT re-discovery interval.
    pub discovery_interval: Duration,
    /// Performance sample collection interval.
    pub performance_interval: Duration,
    /// Reachability probe interval.
    pub health_check_interval: Duration,
    /// Threshold evaluation interval.
    pub threshold_check_interval: Duration,
    /// Active-alarm re-notification sweep interval.
    pub alarm_monitoring_interval: Duration,
    /// Do not re-notify the same active alarm more often than this.
    pub notification_cooldown: Duration,
    /// Threshold checks look at samples no older than this.
    pub sample_window: Duration,
    /// Consecutive failures before a task disables itself.
    pub max_task_errors: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(10),
            discovery_interval: Duration::from_secs(600),
            performance_interval: Duration::from_secs(300),
            health_check_interval: Duration::from_secs(300),
            threshold_check_interval: Duration::from_secs(120),
            alarm_monitoring_interval: Duration::from_secs(60),
            notification_cooldown: Duration::from_secs(3600),
            sample_window: Duration::from_secs(600),
            max_task_errors: 5,
        }
    }
}
