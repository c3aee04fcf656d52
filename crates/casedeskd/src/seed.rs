//! Demo fixture for running the daemon without persistence.
//!
//! Mirrors the origin dashboard's sample roster, loads, and cases so
//! `casedeskctl` has something to show on a fresh start. Timestamps
//! are relative to startup to keep SLA views meaningful.

use casedesk_shared::case::{Case, CaseStatus};
use casedesk_shared::load::DailyLoad;
use casedesk_shared::user::User;
use chrono::{Duration, Utc};
use tracing::info;

use crate::sla::compute_sla_deadline;
use crate::state::DaemonStateInner;

/// Populate `state` with the demo fixture.
pub fn seed_demo(state: &mut DaemonStateInner) {
    let now = Utc::now();
    let tz = state
        .config
        .timezone()
        .unwrap_or(chrono_tz::Asia::Kolkata);
    let today = now.with_timezone(&tz).date_naive();

    let roster = [
        ("PS001", "Alice Johnson", true, true, 18, 3, "alice.johnson@company.com", "Finance"),
        ("PS002", "Bob Smith", false, true, 22, 5, "bob.smith@company.com", "IT"),
        ("PS003", "Carol Williams", false, true, 15, 2, "carol.williams@company.com", "HR"),
        ("PS004", "David Brown", false, false, 8, 0, "david.brown@company.com", "Marketing"),
        ("PS005", "Eva Green", true, true, 12, 1, "eva.green@company.com", "Sales"),
    ];

    for (psid, name, lead, active, case_count, today_count, email, dept) in roster {
        let mut user = User::new(psid, name, today, state.config.max_daily_new_per_user);
        user.team_lead = lead;
        user.is_active = active;
        user.active_case_count = case_count;
        user.today_new_count = today_count;
        user.email = email.to_string();
        user.department = dept.to_string();
        if today_count > 0 {
            user.last_assigned_at = Some(now - Duration::minutes(30 * (6 - today_count) as i64));
        }
        state.users.push(user);
    }

    let loads = [
        ("DL-2024-001", "CUST-001", "Acme Corporation", 45, 4),
        ("DL-2024-002", "CUST-002", "Global Tech Solutions", 78, 3),
        ("DL-2024-003", "CUST-003", "Innovation Labs", 23, 2),
    ];
    for (load_id, customer_id, customer_name, records, hours_ago) in loads {
        state.loads.push(DailyLoad::new(
            load_id,
            customer_id,
            customer_name,
            records,
            now - Duration::hours(hours_ago),
        ));
    }

    // One load already processed, matching the origin fixture.
    let mut processed = DailyLoad::new(
        "DL-2024-004",
        "CUST-004",
        "Enterprise Systems",
        4,
        now - Duration::hours(26),
    );
    processed.processed = true;
    processed.processed_at = Some(now - Duration::hours(25));
    processed.run_id = Some("RUN-001".to_string());
    state.loads.push(processed);

    // Sample cases from that processed load.
    let created_at = now - Duration::hours(25);
    let sla_due_at =
        compute_sla_deadline(created_at, &state.config).unwrap_or(created_at + Duration::days(1));
    let case_rows = [
        ("CASE-001", "PS001", CaseStatus::Open, "Initial assessment required"),
        ("CASE-002", "PS002", CaseStatus::InProgress, "Customer contacted, awaiting response"),
        ("CASE-003", "PS003", CaseStatus::OnHold, "Waiting for customer documentation"),
        ("CASE-004", "PS001", CaseStatus::Resolved, "Issue resolved successfully"),
    ];
    for (case_id, psid, status, note) in case_rows {
        let mut case = Case {
            case_id: case_id.to_string(),
            customer_id: "CUST-004".to_string(),
            customer_name: "Enterprise Systems".to_string(),
            assigned_to: Some(psid.to_string()),
            status,
            created_at,
            load_date: created_at.with_timezone(&tz).date_naive(),
            sla_due_at,
            reassigned_count: 0,
            notes: Vec::new(),
        };
        case.push_note(created_at, note);
        state.cases.push(case);
    }
    state.next_case_seq = 5;

    info!(
        users = state.users.len(),
        loads = state.loads.len(),
        cases = state.cases.len(),
        "demo fixture seeded"
    );
}
