//! Daemon state management.
//!
//! One `RwLock` guards the whole mutation domain (roster, cases,
//! loads, config). Every mutating operation runs under the write lock
//! for its full duration, so a load is never processed twice, batch
//! loops never interleave, and caps cannot be over-assigned by
//! concurrent requests.

use std::sync::Arc;
use std::time::Instant;

use casedesk_shared::case::{Case, CaseStatus};
use casedesk_shared::config::{ConfigPatch, PolicyConfig};
use casedesk_shared::load::DailyLoad;
use casedesk_shared::report::{
    KpiSummary, Report, StatusSlice, UserPerformance, UserWorkload,
};
use casedesk_shared::rpc::{DaemonStatus, ProcessLoadResult};
use casedesk_shared::user::User;
use casedesk_shared::{CasedeskError, VERSION};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::engine;

/// Shared daemon state
pub type SharedState = Arc<RwLock<DaemonStateInner>>;

pub struct DaemonStateInner {
    pub started_at: Instant,
    pub config: PolicyConfig,
    pub users: Vec<User>,
    pub cases: Vec<Case>,
    pub loads: Vec<DailyLoad>,
    /// Next CASE-NNN sequence number
    pub next_case_seq: u32,
}

impl DaemonStateInner {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            started_at: Instant::now(),
            config,
            users: Vec::new(),
            cases: Vec::new(),
            loads: Vec::new(),
            next_case_seq: 1,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Process one load end to end and fold the result into state.
    pub fn process_load(
        &mut self,
        load_id: &str,
        priority_records: &[usize],
        now: DateTime<Utc>,
    ) -> Result<ProcessLoadResult, CasedeskError> {
        // Disjoint field borrows: the load lives in `loads`, the
        // engine also needs `users` and the sequence counter.
        let Self {
            loads,
            users,
            cases,
            config,
            next_case_seq,
            ..
        } = self;

        let load = loads
            .iter_mut()
            .find(|l| l.load_id == load_id)
            .ok_or_else(|| CasedeskError::UnknownLoad(load_id.to_string()))?;

        let outcome = engine::process_load(load, users, config, priority_records, next_case_seq, now)?;

        let created_case_ids = outcome
            .created_cases
            .iter()
            .map(|c| c.case_id.clone())
            .collect();
        cases.extend(outcome.created_cases);

        Ok(ProcessLoadResult {
            load_id: load_id.to_string(),
            run_id: outcome.run_id,
            created_case_ids,
            unassigned_records: outcome.unassigned_records,
        })
    }

    /// Process every unprocessed load in creation order.
    pub fn process_all(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ProcessLoadResult>, CasedeskError> {
        let mut pending: Vec<String> = self
            .loads
            .iter()
            .filter(|l| !l.processed)
            .map(|l| l.load_id.clone())
            .collect();
        pending.sort();

        let mut results = Vec::with_capacity(pending.len());
        for load_id in pending {
            results.push(self.process_load(&load_id, &[], now)?);
        }
        Ok(results)
    }

    /// Apply a partial config update. The config cap is the
    /// roster-wide cap, so a changed `max_daily_new_per_user` rewrites
    /// every user's cap. Nothing changes if validation fails.
    pub fn apply_config(&mut self, patch: &ConfigPatch) -> Result<(), CasedeskError> {
        let next = patch.apply(&self.config)?;
        if next.max_daily_new_per_user != self.config.max_daily_new_per_user {
            for user in &mut self.users {
                user.max_daily_new = next.max_daily_new_per_user;
            }
        }
        self.config = next;
        Ok(())
    }

    pub fn case_mut(&mut self, case_id: &str) -> Result<&mut Case, CasedeskError> {
        self.cases
            .iter_mut()
            .find(|c| c.case_id == case_id)
            .ok_or_else(|| CasedeskError::UnknownCase(case_id.to_string()))
    }

    /// Cases matching the optional status/assignee filters.
    pub fn filtered_cases(
        &self,
        status: Option<CaseStatus>,
        assignee: Option<&str>,
    ) -> Vec<&Case> {
        self.cases
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .filter(|c| assignee.map_or(true, |a| c.assigned_to.as_deref() == Some(a)))
            .collect()
    }

    pub fn breached_cases(&self, as_of: DateTime<Utc>) -> Vec<&Case> {
        self.cases.iter().filter(|c| c.is_breached(as_of)).collect()
    }

    pub fn to_status(&self, now: DateTime<Utc>) -> DaemonStatus {
        DaemonStatus {
            version: VERSION.to_string(),
            pid: std::process::id(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            total_users: self.users.len(),
            active_users: self.users.iter().filter(|u| u.is_active).count(),
            total_cases: self.cases.len(),
            open_cases: self
                .cases
                .iter()
                .filter(|c| c.status != CaseStatus::Resolved)
                .count(),
            breached_cases: self.breached_cases(now).len(),
            total_loads: self.loads.len(),
            unprocessed_loads: self.loads.iter().filter(|l| !l.processed).count(),
        }
    }

    /// Build the dashboard/reports payload from live state.
    pub fn report(&self, now: DateTime<Utc>) -> Report {
        let resolved = self
            .cases
            .iter()
            .filter(|c| c.status == CaseStatus::Resolved)
            .count();
        let resolution_rate = if self.cases.is_empty() {
            0.0
        } else {
            resolved as f64 / self.cases.len() as f64
        };

        let kpis = KpiSummary {
            open_cases: self.cases.len() - resolved,
            sla_breaches: self.breached_cases(now).len(),
            unprocessed_loads: self.loads.iter().filter(|l| !l.processed).count(),
            active_users: self.users.iter().filter(|u| u.is_active).count(),
            resolution_rate,
        };

        let status_distribution = CaseStatus::ALL
            .iter()
            .map(|&status| StatusSlice {
                status,
                count: self.cases.iter().filter(|c| c.status == status).count(),
            })
            .collect();

        let workload = self
            .users
            .iter()
            .map(|u| UserWorkload {
                psid: u.psid.clone(),
                user_name: u.user_name.clone(),
                active_case_count: u.active_case_count,
                today_new_count: u.today_new_count,
                max_daily_new: u.max_daily_new,
            })
            .collect();

        let performance = self
            .users
            .iter()
            .map(|u| {
                let assigned: Vec<&Case> = self
                    .cases
                    .iter()
                    .filter(|c| c.assigned_to.as_deref() == Some(u.psid.as_str()))
                    .collect();
                UserPerformance {
                    psid: u.psid.clone(),
                    user_name: u.user_name.clone(),
                    total_assigned: assigned.len(),
                    resolved: assigned
                        .iter()
                        .filter(|c| c.status == CaseStatus::Resolved)
                        .count(),
                    sla_breaches: assigned.iter().filter(|c| c.is_breached(now)).count(),
                }
            })
            .collect();

        Report {
            generated_at: now,
            kpis,
            status_distribution,
            workload,
            performance,
        }
    }
}
