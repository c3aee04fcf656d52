//! Case types.
//!
//! Cases are created only by processing a daily load. They are never
//! deleted, only moved through the status lifecycle. Status is a
//! closed enumeration; unrecognized wire values are rejected at the
//! parse boundary instead of leaking arbitrary strings into state.

use crate::error::CasedeskError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Case lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Open,
    InProgress,
    OnHold,
    Resolved,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Open,
        CaseStatus::InProgress,
        CaseStatus::OnHold,
        CaseStatus::Resolved,
    ];
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::InProgress => write!(f, "In Progress"),
            Self::OnHold => write!(f, "On Hold"),
            Self::Resolved => write!(f, "Resolved"),
        }
    }
}

impl FromStr for CaseStatus {
    type Err = CasedeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "open" => Ok(Self::Open),
            "in progress" | "inprogress" => Ok(Self::InProgress),
            "on hold" | "onhold" => Ok(Self::OnHold),
            "resolved" => Ok(Self::Resolved),
            _ => Err(CasedeskError::InvalidTransition(s.to_string())),
        }
    }
}

/// One timestamped entry in a case's note log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNote {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// A customer case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Unique case identifier (e.g. "CASE-001")
    pub case_id: String,
    pub customer_id: String,
    pub customer_name: String,
    /// PSID of the current assignee, None until assigned
    pub assigned_to: Option<String>,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    /// Local calendar day of the originating load
    pub load_date: NaiveDate,
    /// Service-level deadline, derived at creation
    pub sla_due_at: DateTime<Utc>,
    /// Incremented on every reassignment
    pub reassigned_count: u32,
    /// Ordered audit trail, oldest first
    #[serde(default)]
    pub notes: Vec<CaseNote>,
}

impl Case {
    /// SLA breach check: past deadline and still unresolved.
    ///
    /// Pure function of current state. Monotonic over `now` for a
    /// fixed status: once breached, a case stays breached unless it
    /// is resolved.
    pub fn is_breached(&self, now: DateTime<Utc>) -> bool {
        now > self.sla_due_at && self.status != CaseStatus::Resolved
    }

    /// Append an audit note.
    pub fn push_note(&mut self, now: DateTime<Utc>, text: impl Into<String>) {
        self.notes.push(CaseNote {
            at: now,
            text: text.into(),
        });
    }
}
