//! Scenario tests for batch assignment.
//!
//! Exercises the documented policy end to end through daemon state:
//! round-robin fairness, daily caps, conservation of records, and
//! deterministic ordering.

use casedesk_shared::config::PolicyConfig;
use casedesk_shared::load::DailyLoad;
use casedesk_shared::user::User;
use casedeskd::state::DaemonStateInner;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 11, 8, 30, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

fn state_with(users: usize, cap: u32) -> DaemonStateInner {
    let config = PolicyConfig {
        max_daily_new_per_user: cap,
        ..PolicyConfig::default()
    };
    let mut state = DaemonStateInner::new(config);
    for i in 1..=users {
        state
            .users
            .push(User::new(&format!("PS{i:03}"), &format!("User {i}"), day(), cap));
    }
    state
}

fn add_load(state: &mut DaemonStateInner, load_id: &str, records: u32) {
    state.loads.push(DailyLoad::new(
        load_id,
        "CUST-001",
        "Acme Corporation",
        records,
        now(),
    ));
}

#[test]
fn twelve_records_over_three_users_spread_evenly() {
    let mut state = state_with(3, 5);
    add_load(&mut state, "DL-2024-001", 12);

    let result = state.process_load("DL-2024-001", &[], now()).unwrap();

    assert_eq!(result.created_case_ids.len(), 12);
    assert!(result.unassigned_records.is_empty());
    let counts: Vec<u32> = state.users.iter().map(|u| u.today_new_count).collect();
    assert_eq!(counts, vec![4, 4, 4]);

    // Assignment order matches round-robin cycling: PS001, PS002,
    // PS003, PS001, ...
    let assignees: Vec<String> = state
        .cases
        .iter()
        .map(|c| c.assigned_to.clone().unwrap())
        .collect();
    for (i, psid) in assignees.iter().enumerate() {
        assert_eq!(psid, &format!("PS{:03}", (i % 3) + 1));
    }

    // Stamps are strictly ordered along the final rotation, so the
    // next batch would continue the cycle at PS001.
    let stamps: Vec<_> = state
        .users
        .iter()
        .map(|u| u.last_assigned_at.unwrap())
        .collect();
    assert!(stamps.iter().all(|&t| t >= now()));
    assert!(stamps[0] < stamps[1] && stamps[1] < stamps[2]);
}

#[test]
fn capped_user_gets_nothing_and_rest_split_by_psid_tiebreak() {
    let mut state = state_with(3, 5);
    state.users[1].today_new_count = 5; // PS002 already at cap
    add_load(&mut state, "DL-2024-001", 7);

    let result = state.process_load("DL-2024-001", &[], now()).unwrap();

    assert_eq!(result.created_case_ids.len(), 7);
    assert_eq!(state.users[1].today_new_count, 5);
    assert_eq!(state.users[0].today_new_count, 4);
    assert_eq!(state.users[2].today_new_count, 3);
    assert!(state
        .cases
        .iter()
        .all(|c| c.assigned_to.as_deref() != Some("PS002")));
}

#[test]
fn fairness_small_load_gives_each_user_at_most_one() {
    let mut state = state_with(5, 5);
    add_load(&mut state, "DL-2024-001", 5);

    state.process_load("DL-2024-001", &[], now()).unwrap();

    for user in &state.users {
        assert!(user.today_new_count <= 1, "{} got repeats", user.psid);
    }
}

#[test]
fn caps_hold_across_multiple_loads_in_one_day() {
    let mut state = state_with(3, 5);
    for (i, records) in [6, 6, 6, 6].iter().enumerate() {
        add_load(&mut state, &format!("DL-2024-{:03}", i + 1), *records);
    }

    let results = state.process_all(now()).unwrap();

    // Total capacity is 15; 24 records were offered.
    let created: usize = results.iter().map(|r| r.created_case_ids.len()).sum();
    let unassigned: usize = results.iter().map(|r| r.unassigned_records.len()).sum();
    assert_eq!(created, 15);
    assert_eq!(created + unassigned, 24);

    for user in &state.users {
        assert!(
            user.today_new_count <= user.max_daily_new,
            "{} over cap",
            user.psid
        );
    }
}

#[test]
fn conservation_holds_for_every_load() {
    let mut state = state_with(2, 3);
    for (i, records) in [0, 1, 5, 9].iter().enumerate() {
        add_load(&mut state, &format!("DL-2024-{:03}", i + 1), *records);
    }

    let results = state.process_all(now()).unwrap();
    let record_counts = [0usize, 1, 5, 9];
    for (result, &records) in results.iter().zip(record_counts.iter()) {
        assert_eq!(
            result.created_case_ids.len() + result.unassigned_records.len(),
            records,
            "conservation violated for {}",
            result.load_id
        );
    }
}

#[test]
fn case_ids_are_unique_and_sequential_across_loads() {
    let mut state = state_with(3, 10);
    add_load(&mut state, "DL-2024-001", 4);
    add_load(&mut state, "DL-2024-002", 3);

    state.process_all(now()).unwrap();

    let ids: Vec<&str> = state.cases.iter().map(|c| c.case_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["CASE-001", "CASE-002", "CASE-003", "CASE-004", "CASE-005", "CASE-006", "CASE-007"]
    );
}

#[test]
fn priority_records_prefer_team_leads_across_the_batch() {
    let mut state = state_with(4, 5);
    state.users[3].team_lead = true; // PS004
    add_load(&mut state, "DL-2024-001", 4);

    let result = state
        .process_load("DL-2024-001", &[1, 3], now())
        .unwrap();
    assert_eq!(result.created_case_ids.len(), 4);

    assert_eq!(state.cases[1].assigned_to.as_deref(), Some("PS004"));
    assert_eq!(state.cases[3].assigned_to.as_deref(), Some("PS004"));
    // Non-priority records follow plain round-robin.
    assert_eq!(state.cases[0].assigned_to.as_deref(), Some("PS001"));
    assert_eq!(state.cases[2].assigned_to.as_deref(), Some("PS002"));
}

#[test]
fn disabled_auto_assignment_leaves_cases_unassigned() {
    let mut state = state_with(3, 5);
    state.config.auto_assignment_enabled = false;
    add_load(&mut state, "DL-2024-001", 6);

    let result = state.process_load("DL-2024-001", &[], now()).unwrap();

    assert_eq!(result.created_case_ids.len(), 6);
    assert!(result.unassigned_records.is_empty());
    assert!(state.cases.iter().all(|c| c.assigned_to.is_none()));
    assert!(state.users.iter().all(|u| u.today_new_count == 0));
}
