// ── Alarm state machine ──
//
// ACTIVE → ACKNOWLEDGED → CLEARED, with an orthogonal escalation level.
// The alarm store enforces at most one ACTIVE alarm per (source, type);
// this type only models a single alarm's lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::SourceId;

/// Severity ladder. Derived `Ord` follows declaration order, so
/// `Info < Warning < Minor < Major < Critical`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmSeverity {
    Info,
    Warning,
    Minor,
    Major,
    Critical,
}

impl AlarmSeverity {
    /// One step up the ladder, capped at critical.
    pub fn escalated(self) -> Self {
        match self {
            Self::Info => Self::Warning,
            Self::Warning => Self::Minor,
            Self::Minor => Self::Major,
            Self::Major | Self::Critical => Self::Critical,
        }
    }
}

/// Alarm lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmStatus {
    Active,
    Acknowledged,
    Cleared,
}

/// One alarm record. Created by the threshold engine or a status
/// transition; updated in place while the condition persists; cleared on
/// recovery or by an operator. Never physically deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub id: Uuid,
    pub source: SourceId,
    /// Dedup key together with `source`, e.g. `threshold_cpu_usage`.
    pub alarm_type: String,
    pub severity: AlarmSeverity,
    pub status: AlarmStatus,
    pub message: String,
    pub first_occurrence: DateTime<Utc>,
    pub last_occurrence: DateTime<Utc>,
    pub occurrence_count: u32,
    pub escalation_level: u32,
    pub last_notification: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub cleared_at: Option<DateTime<Utc>>,
}

impl Alarm {
    pub fn new(
        source: SourceId,
        alarm_type: impl Into<String>,
        severity: AlarmSeverity,
        message: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            source,
            alarm_type: alarm_type.into(),
            severity,
            status: AlarmStatus::Active,
            message: message.into(),
            first_occurrence: now,
            last_occurrence: now,
            occurrence_count: 1,
            escalation_level: 0,
            last_notification: None,
            acknowledged_by: None,
            acknowledged_at: None,
            cleared_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AlarmStatus::Active
    }

    /// Record another occurrence of the same ongoing condition.
    pub fn record_occurrence(
        &mut self,
        severity: AlarmSeverity,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) {
        self.severity = severity;
        self.message = message.into();
        self.last_occurrence = at;
        self.occurrence_count += 1;
    }

    pub fn acknowledge(&mut self, user: impl Into<String>) {
        self.acknowledged_by = Some(user.into());
        self.acknowledged_at = Some(Utc::now());
        if self.status == AlarmStatus::Active {
            self.status = AlarmStatus::Acknowledged;
        }
    }

    pub fn clear(&mut self) {
        self.status = AlarmStatus::Cleared;
        self.cleared_at = Some(Utc::now());
    }

    /// Bump the escalation level and promote severity one step.
    /// The level counter keeps incrementing past critical.
    pub fn escalate(&mut self) {
        self.escalation_level += 1;
        self.severity = self.severity.escalated();
    }
}
