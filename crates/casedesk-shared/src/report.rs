//! Report types computed from live daemon state.
//!
//! Mirrors the origin dashboard and reports pages: KPI tiles, status
//! distribution, per-user workload, and per-user performance rows.

use crate::case::CaseStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSummary {
    pub open_cases: usize,
    pub sla_breaches: usize,
    pub unprocessed_loads: usize,
    pub active_users: usize,
    /// Resolved / total, 0.0 when there are no cases
    pub resolution_rate: f64,
}

/// One slice of the status distribution chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSlice {
    pub status: CaseStatus,
    pub count: usize,
}

/// Current workload for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWorkload {
    pub psid: String,
    pub user_name: String,
    pub active_case_count: u32,
    pub today_new_count: u32,
    pub max_daily_new: u32,
}

/// Lifetime performance row for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPerformance {
    pub psid: String,
    pub user_name: String,
    pub total_assigned: usize,
    pub resolved: usize,
    pub sla_breaches: usize,
}

/// Full report payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub kpis: KpiSummary,
    pub status_distribution: Vec<StatusSlice>,
    pub workload: Vec<UserWorkload>,
    pub performance: Vec<UserPerformance>,
}
