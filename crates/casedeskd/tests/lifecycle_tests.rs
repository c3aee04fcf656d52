//! Case lifecycle tests: reassignment, status updates, breach
//! evaluation, idempotent load processing, and config updates.

use casedesk_shared::case::CaseStatus;
use casedesk_shared::config::{ConfigPatch, PolicyConfig};
use casedesk_shared::load::DailyLoad;
use casedesk_shared::user::User;
use casedesk_shared::CasedeskError;
use casedeskd::engine;
use casedeskd::state::DaemonStateInner;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 11, 8, 30, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

fn processed_state() -> DaemonStateInner {
    let mut state = DaemonStateInner::new(PolicyConfig::default());
    for (psid, name) in [("PS001", "Alice Johnson"), ("PS002", "Bob Smith"), ("PS003", "Carol Williams")] {
        state.users.push(User::new(psid, name, day(), 5));
    }
    state.loads.push(DailyLoad::new(
        "DL-2024-001",
        "CUST-001",
        "Acme Corporation",
        3,
        now(),
    ));
    state.process_load("DL-2024-001", &[], now()).unwrap();
    state
}

#[test]
fn reprocessing_returns_already_processed_and_creates_nothing() {
    let mut state = processed_state();
    let cases_before = state.cases.len();
    let counters_before: Vec<u32> = state.users.iter().map(|u| u.today_new_count).collect();

    let err = state.process_load("DL-2024-001", &[], now()).unwrap_err();
    assert!(matches!(err, CasedeskError::AlreadyProcessed(_)));
    assert_eq!(state.cases.len(), cases_before);
    let counters_after: Vec<u32> = state.users.iter().map(|u| u.today_new_count).collect();
    assert_eq!(counters_before, counters_after);
}

#[test]
fn reassignment_preserves_identity_and_balances_counters() {
    let mut state = processed_state();
    let case_id = state.cases[0].case_id.clone();
    let total_before: u32 = state.users.iter().map(|u| u.active_case_count).sum();

    {
        let state = &mut state;
        let case = state
            .cases
            .iter_mut()
            .find(|c| c.case_id == case_id)
            .unwrap();
        engine::reassign(case, &mut state.users, "PS003", now() + Duration::hours(1)).unwrap();
    }

    let case = state.cases.iter().find(|c| c.case_id == case_id).unwrap();
    assert_eq!(case.case_id, case_id);
    assert_eq!(case.assigned_to.as_deref(), Some("PS003"));
    assert_eq!(case.reassigned_count, 1);

    // Old and new assignee deltas sum to zero.
    let total_after: u32 = state.users.iter().map(|u| u.active_case_count).sum();
    assert_eq!(total_before, total_after);
}

#[test]
fn repeated_reassignment_counts_each_hop() {
    let mut state = processed_state();
    let case_id = state.cases[0].case_id.clone();

    for (hop, target) in ["PS002", "PS003", "PS001"].iter().enumerate() {
        let state = &mut state;
        let case = state
            .cases
            .iter_mut()
            .find(|c| c.case_id == case_id)
            .unwrap();
        engine::reassign(case, &mut state.users, target, now() + Duration::hours(hop as i64 + 1))
            .unwrap();
        assert_eq!(case.reassigned_count, hop as u32 + 1);
    }
}

#[test]
fn breach_appears_after_deadline_and_clears_on_resolve() {
    let mut state = processed_state();
    let due = state.cases[0].sla_due_at;

    assert!(state.breached_cases(due - Duration::minutes(1)).is_empty());
    assert_eq!(state.breached_cases(due + Duration::minutes(1)).len(), 3);

    // Resolve one case; it drops out of the breach list at any later time.
    let case_id = state.cases[0].case_id.clone();
    engine::update_status(
        state.case_mut(&case_id).unwrap(),
        CaseStatus::Resolved,
        due + Duration::hours(2),
    );
    let breached = state.breached_cases(due + Duration::hours(3));
    assert_eq!(breached.len(), 2);
    assert!(breached.iter().all(|c| c.case_id != case_id));
}

#[test]
fn status_updates_walk_the_full_lifecycle() {
    let mut state = processed_state();
    let case_id = state.cases[0].case_id.clone();

    for status in [CaseStatus::InProgress, CaseStatus::OnHold, CaseStatus::Open, CaseStatus::Resolved] {
        engine::update_status(state.case_mut(&case_id).unwrap(), status, now());
        assert_eq!(state.case_mut(&case_id).unwrap().status, status);
    }

    // The audit trail recorded each distinct transition.
    assert_eq!(state.case_mut(&case_id).unwrap().notes.len(), 4);
}

#[test]
fn deactivated_user_stops_receiving_but_keeps_cases() {
    let mut state = processed_state();
    let alice_cases = state.filtered_cases(None, Some("PS001")).len();
    assert!(alice_cases > 0);

    engine::set_user_active(&mut state.users, "PS001", false).unwrap();

    state.loads.push(DailyLoad::new(
        "DL-2024-002",
        "CUST-002",
        "Global Tech Solutions",
        4,
        now(),
    ));
    state.process_load("DL-2024-002", &[], now()).unwrap();

    // Existing cases untouched, no new ones for the deactivated user.
    assert_eq!(state.filtered_cases(None, Some("PS001")).len(), alice_cases);
    let alice = state.users.iter().find(|u| u.psid == "PS001").unwrap();
    assert_eq!(alice.today_new_count, 1); // from the first load only
}

#[test]
fn note_log_keeps_chronological_append_order() {
    let mut state = processed_state();
    let case_id = state.cases[0].case_id.clone();

    let case = state.case_mut(&case_id).unwrap();
    case.push_note(now(), "called customer");
    case.push_note(now() + Duration::minutes(10), "customer replied");

    let case = state.case_mut(&case_id).unwrap();
    assert_eq!(case.notes.len(), 2);
    assert!(case.notes[0].at <= case.notes[1].at);
    assert_eq!(case.notes[1].text, "customer replied");
}

#[test]
fn config_patch_applies_atomically_through_state() {
    let mut state = processed_state();

    let patch = ConfigPatch {
        max_daily_new_per_user: Some(2),
        sla_cutoff_local: Some("18:00".to_string()),
        ..Default::default()
    };
    state.config = patch.apply(&state.config).unwrap();
    assert_eq!(state.config.max_daily_new_per_user, 2);
    assert_eq!(state.config.sla_cutoff_local, "18:00");

    // An invalid patch leaves config untouched.
    let bad = ConfigPatch {
        sla_timezone: Some("Nowhere/Void".to_string()),
        ..Default::default()
    };
    assert!(bad.apply(&state.config).is_err());
    assert_eq!(state.config.sla_timezone, "Asia/Kolkata");
}

#[test]
fn cap_patch_rewrites_every_users_cap() {
    let mut state = processed_state();
    assert!(state.users.iter().all(|u| u.max_daily_new == 5));

    let patch = ConfigPatch {
        max_daily_new_per_user: Some(2),
        ..Default::default()
    };
    state.apply_config(&patch).unwrap();
    assert_eq!(state.config.max_daily_new_per_user, 2);
    assert!(state.users.iter().all(|u| u.max_daily_new == 2));

    // A rejected patch touches neither config nor roster.
    let bad = ConfigPatch {
        max_daily_new_per_user: Some(9),
        sla_timezone: Some("Nowhere/Void".to_string()),
        ..Default::default()
    };
    assert!(state.apply_config(&bad).is_err());
    assert_eq!(state.config.max_daily_new_per_user, 2);
    assert!(state.users.iter().all(|u| u.max_daily_new == 2));
}

#[test]
fn new_cap_from_config_applies_to_later_loads() {
    let mut state = processed_state();
    // Users already have today_new_count == 1 each; drop the cap to 1.
    let patch = ConfigPatch {
        max_daily_new_per_user: Some(1),
        ..Default::default()
    };
    state.apply_config(&patch).unwrap();

    state.loads.push(DailyLoad::new(
        "DL-2024-002",
        "CUST-002",
        "Global Tech Solutions",
        3,
        now(),
    ));
    let result = state.process_load("DL-2024-002", &[], now()).unwrap();

    assert!(result.created_case_ids.is_empty());
    assert_eq!(result.unassigned_records, vec![0, 1, 2]);
}
