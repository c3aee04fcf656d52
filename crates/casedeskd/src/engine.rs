//! Assignment & SLA policy engine.
//!
//! Turns an unprocessed daily load into assigned cases, enforcing
//! daily caps and round-robin ordering, and implements the remaining
//! case operations (reassignment, status updates, note log, daily
//! counter reset). All functions are synchronous and operate on `&mut`
//! state the caller holds exclusively; the daemon wraps them in its
//! state lock.

use casedesk_shared::case::{Case, CaseStatus};
use casedesk_shared::config::PolicyConfig;
use casedesk_shared::load::DailyLoad;
use casedesk_shared::user::User;
use casedesk_shared::CasedeskError;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::sla::compute_sla_deadline;

/// Outcome of processing one load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub run_id: String,
    pub created_cases: Vec<Case>,
    /// Record indices no eligible assignee could be found for.
    /// Soft failures: the batch always completes.
    pub unassigned_records: Vec<usize>,
}

/// Process an unprocessed load into cases.
///
/// Records are handled in index order. Each successful assignment is
/// applied to the roster before the next record is considered, so caps
/// and round-robin ordering see assignments made earlier in the same
/// batch.
pub fn process_load(
    load: &mut DailyLoad,
    users: &mut [User],
    config: &PolicyConfig,
    priority_records: &[usize],
    next_case_seq: &mut u32,
    now: DateTime<Utc>,
) -> Result<LoadOutcome, CasedeskError> {
    if load.processed {
        return Err(CasedeskError::AlreadyProcessed(load.load_id.clone()));
    }

    let tz = config.timezone()?;
    let sla_due_at = compute_sla_deadline(now, config)?;
    let load_date = load.load_date(tz);
    let run_id = format!("RUN-{}", uuid::Uuid::new_v4());

    let mut created_cases = Vec::new();
    let mut unassigned_records = Vec::new();

    // Assignment stamps must be strictly increasing, otherwise ties on
    // `last_assigned_at` stall the rotation mid-batch. Resume from the
    // latest stamp on the roster when it is ahead of the wall clock.
    let mut assign_clock = users
        .iter()
        .filter_map(|u| u.last_assigned_at)
        .max()
        .map_or(now, |latest| latest.max(now));

    for record in 0..load.record_count as usize {
        if !config.auto_assignment_enabled {
            // Manual assignment mode: the case still exists, it just
            // has no assignee yet.
            created_cases.push(new_case(load, None, *next_case_seq, now, load_date, sla_due_at));
            *next_case_seq += 1;
            continue;
        }

        let priority = priority_records.contains(&record);
        match select_candidate(users, config, priority) {
            Some(idx) => {
                let user = &mut users[idx];
                if user.at_daily_cap() {
                    // Candidate filtering guarantees this never holds;
                    // reaching it is a bug, not a user-facing condition.
                    warn!(psid = %user.psid, "cap violated after candidate selection");
                    return Err(CasedeskError::CapacityExceeded(user.psid.clone()));
                }
                let case = new_case(
                    load,
                    Some(user.psid.clone()),
                    *next_case_seq,
                    now,
                    load_date,
                    sla_due_at,
                );
                *next_case_seq += 1;
                user.today_new_count += 1;
                user.active_case_count += 1;
                assign_clock = assign_clock + chrono::Duration::nanoseconds(1);
                user.last_assigned_at = Some(assign_clock);
                debug!(case_id = %case.case_id, psid = %user.psid, "assigned");
                created_cases.push(case);
            }
            None => {
                debug!(load_id = %load.load_id, record, "no eligible assignee");
                unassigned_records.push(record);
            }
        }
    }

    load.processed = true;
    load.processed_at = Some(now);
    load.run_id = Some(run_id.clone());

    info!(
        load_id = %load.load_id,
        run_id = %run_id,
        created = created_cases.len(),
        unassigned = unassigned_records.len(),
        "load processed"
    );

    Ok(LoadOutcome {
        run_id,
        created_cases,
        unassigned_records,
    })
}

fn new_case(
    load: &DailyLoad,
    assigned_to: Option<String>,
    seq: u32,
    now: DateTime<Utc>,
    load_date: NaiveDate,
    sla_due_at: DateTime<Utc>,
) -> Case {
    Case {
        case_id: format!("CASE-{seq:03}"),
        customer_id: load.customer_id.clone(),
        customer_name: load.customer_name.clone(),
        assigned_to,
        status: CaseStatus::Open,
        created_at: now,
        load_date,
        sla_due_at,
        reassigned_count: 0,
        notes: Vec::new(),
    }
}

/// Pick the roster index the next case goes to, or None if nobody is
/// eligible.
///
/// Eligibility: active and below the daily cap. For priority records
/// with team-lead priority enabled, eligible team leads are preferred;
/// the pool falls back to everyone eligible when no lead qualifies.
/// With round-robin on, the least recently assigned wins (never
/// assigned first), ties broken by ascending PSID; with round-robin
/// off, lowest PSID wins.
fn select_candidate(users: &[User], config: &PolicyConfig, priority: bool) -> Option<usize> {
    let mut pool: Vec<usize> = users
        .iter()
        .enumerate()
        .filter(|(_, u)| u.eligible())
        .map(|(i, _)| i)
        .collect();
    if pool.is_empty() {
        return None;
    }

    if priority && config.team_lead_priority {
        let leads: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&i| users[i].team_lead)
            .collect();
        if !leads.is_empty() {
            pool = leads;
        }
    }

    if config.round_robin_enabled {
        // None sorts before Some, which is exactly "never assigned
        // goes first".
        pool.into_iter()
            .min_by_key(|&i| (users[i].last_assigned_at, users[i].psid.as_str()))
    } else {
        pool.into_iter().min_by_key(|&i| users[i].psid.as_str())
    }
}

/// Reassign a case to another active user.
pub fn reassign(
    case: &mut Case,
    users: &mut [User],
    new_psid: &str,
    now: DateTime<Utc>,
) -> Result<(), CasedeskError> {
    let new_idx = users
        .iter()
        .position(|u| u.psid == new_psid)
        .ok_or_else(|| CasedeskError::InvalidUser(new_psid.to_string()))?;
    if !users[new_idx].is_active {
        return Err(CasedeskError::InvalidUser(new_psid.to_string()));
    }

    let old_psid = case.assigned_to.clone();
    if let Some(ref old) = old_psid {
        if let Some(old_user) = users.iter_mut().find(|u| &u.psid == old) {
            old_user.active_case_count = old_user.active_case_count.saturating_sub(1);
        }
    }

    let new_user = &mut users[new_idx];
    new_user.active_case_count += 1;
    new_user.last_assigned_at = Some(now);

    case.assigned_to = Some(new_psid.to_string());
    case.reassigned_count += 1;
    case.push_note(
        now,
        format!(
            "Reassigned from {} to {}",
            old_psid.as_deref().unwrap_or("(unassigned)"),
            new_psid
        ),
    );

    info!(case_id = %case.case_id, to = %new_psid, "case reassigned");
    Ok(())
}

/// Move a case to a new status.
///
/// The status enumeration is closed and any status may move to any
/// other; unrecognized wire values never get this far because they
/// fail `CaseStatus::from_str` at the RPC boundary.
pub fn update_status(case: &mut Case, new_status: CaseStatus, now: DateTime<Utc>) {
    let old = case.status;
    case.status = new_status;
    if old != new_status {
        case.push_note(now, format!("Status changed from {old} to {new_status}"));
    }
    info!(case_id = %case.case_id, from = %old, to = %new_status, "status updated");
}

/// Zero every user's daily intake counter for a new local day.
pub fn reset_daily_counters(users: &mut [User], today: NaiveDate) {
    for user in users.iter_mut() {
        user.today_new_count = 0;
        user.today_date = today;
    }
    info!(%today, users = users.len(), "daily counters reset");
}

/// Activate or deactivate a roster member.
pub fn set_user_active(
    users: &mut [User],
    psid: &str,
    active: bool,
) -> Result<(), CasedeskError> {
    let user = users
        .iter_mut()
        .find(|u| u.psid == psid)
        .ok_or_else(|| CasedeskError::InvalidUser(psid.to_string()))?;
    user.is_active = active;
    info!(%psid, active, "user activity changed");
    Ok(())
}
