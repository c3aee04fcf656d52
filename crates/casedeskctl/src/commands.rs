//! Command handlers for casedeskctl.

use anyhow::{anyhow, Result};
use casedesk_shared::case::Case;
use casedesk_shared::config::{ConfigPatch, PolicyConfig};
use casedesk_shared::load::DailyLoad;
use casedesk_shared::report::Report;
use casedesk_shared::rpc::{
    AddNoteParams, DaemonStatus, ListCasesParams, ProcessLoadParams, ProcessLoadResult,
    ReassignParams, RpcMethod, SetUserActiveParams, UpdateStatusParams,
};
use casedesk_shared::user::User;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use owo_colors::OwoColorize;

use crate::client::DaemonClient;

const HR: &str =
    "──────────────────────────────────────────────────────────────────────────────";

fn params<T: serde::Serialize>(value: T) -> Result<Option<serde_json::Value>> {
    Ok(Some(serde_json::to_value(value)?))
}

/// Render a UTC instant in the policy timezone.
fn fmt_local(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

async fn policy_timezone(client: &mut DaemonClient) -> Result<Tz> {
    let config: PolicyConfig = client.call_as(RpcMethod::GetConfig, None).await?;
    config
        .timezone()
        .map_err(|e| anyhow!("daemon returned invalid timezone: {}", e))
}

pub async fn status(socket: Option<&str>) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let status: DaemonStatus = client.call_as(RpcMethod::Status, None).await?;

    println!();
    println!("{}", format!("casedeskd v{}", status.version).bold());
    println!("{}", HR.dimmed());
    println!("{:<18} {} (pid {})", "daemon", "running".green(), status.pid);
    println!("{:<18} {}s", "uptime", status.uptime_seconds);
    println!(
        "{:<18} {} total, {} active",
        "users", status.total_users, status.active_users
    );
    println!(
        "{:<18} {} total, {} open",
        "cases", status.total_cases, status.open_cases
    );
    if status.breached_cases > 0 {
        println!(
            "{:<18} {}",
            "sla breaches",
            status.breached_cases.to_string().red().bold()
        );
    } else {
        println!("{:<18} {}", "sla breaches", "0".green());
    }
    println!(
        "{:<18} {} total, {} unprocessed",
        "loads", status.total_loads, status.unprocessed_loads
    );
    println!("{}", HR.dimmed());
    println!();
    Ok(())
}

pub async fn loads_list(socket: Option<&str>) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let tz = policy_timezone(&mut client).await?;
    let loads: Vec<DailyLoad> = client.call_as(RpcMethod::ListLoads, None).await?;

    if loads.is_empty() {
        println!("No daily loads.");
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!(
            "{:<14} {:<24} {:>7}  {:<16} {:<10}",
            "LOAD", "CUSTOMER", "RECORDS", "CREATED", "STATE"
        )
        .bold()
    );
    for load in &loads {
        let state = if load.processed {
            format!("{} {}", "processed".green(), load.run_id.as_deref().unwrap_or("-").dimmed())
        } else {
            "pending".yellow().to_string()
        };
        println!(
            "{:<14} {:<24} {:>7}  {:<16} {}",
            load.load_id,
            load.customer_name,
            load.record_count,
            fmt_local(load.created_at, tz),
            state
        );
    }
    println!();
    Ok(())
}

fn print_run_result(result: &ProcessLoadResult) {
    println!(
        "{} {}: {} cases created ({})",
        "✓".green(),
        result.load_id,
        result.created_case_ids.len(),
        result.run_id.dimmed()
    );
    if !result.unassigned_records.is_empty() {
        println!(
            "{} {} records had no eligible assignee: {:?}",
            "!".yellow(),
            result.unassigned_records.len(),
            result.unassigned_records
        );
    }
}

pub async fn loads_process(
    socket: Option<&str>,
    load_id: &str,
    priority: Vec<usize>,
) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let result: ProcessLoadResult = client
        .call_as(
            RpcMethod::ProcessLoad,
            params(ProcessLoadParams {
                load_id: load_id.to_string(),
                priority_records: priority,
            })?,
        )
        .await?;
    print_run_result(&result);
    Ok(())
}

pub async fn loads_process_all(socket: Option<&str>) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let results: Vec<ProcessLoadResult> = client.call_as(RpcMethod::ProcessAll, None).await?;

    if results.is_empty() {
        println!("Nothing to process.");
        return Ok(());
    }
    for result in &results {
        print_run_result(result);
    }
    Ok(())
}

fn print_case_table(cases: &[Case], tz: Tz, now: DateTime<Utc>) {
    println!();
    println!(
        "{}",
        format!(
            "{:<10} {:<24} {:<10} {:<12} {:<16} {:>3}",
            "CASE", "CUSTOMER", "ASSIGNEE", "STATUS", "SLA DUE", "RE"
        )
        .bold()
    );
    for case in cases {
        let sla = fmt_local(case.sla_due_at, tz);
        let sla = if case.is_breached(now) {
            sla.red().bold().to_string()
        } else {
            sla
        };
        println!(
            "{:<10} {:<24} {:<10} {:<12} {:<16} {:>3}",
            case.case_id,
            case.customer_name,
            case.assigned_to.as_deref().unwrap_or("-"),
            case.status.to_string(),
            sla,
            case.reassigned_count
        );
    }
    println!();
}

pub async fn cases_list(
    socket: Option<&str>,
    status: Option<String>,
    assignee: Option<String>,
) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let tz = policy_timezone(&mut client).await?;
    let cases: Vec<Case> = client
        .call_as(
            RpcMethod::ListCases,
            params(ListCasesParams { status, assignee })?,
        )
        .await?;

    if cases.is_empty() {
        println!("No matching cases.");
        return Ok(());
    }
    print_case_table(&cases, tz, Utc::now());
    Ok(())
}

pub async fn cases_breached(socket: Option<&str>) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let tz = policy_timezone(&mut client).await?;
    let cases: Vec<Case> = client.call_as(RpcMethod::ListBreached, None).await?;

    if cases.is_empty() {
        println!("{} No breached cases.", "✓".green());
        return Ok(());
    }
    println!(
        "{} {} case(s) past SLA deadline",
        "!".red().bold(),
        cases.len()
    );
    print_case_table(&cases, tz, Utc::now());
    Ok(())
}

pub async fn cases_set_status(socket: Option<&str>, case_id: &str, status: &str) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let case: Case = client
        .call_as(
            RpcMethod::UpdateStatus,
            params(UpdateStatusParams {
                case_id: case_id.to_string(),
                status: status.to_string(),
            })?,
        )
        .await?;
    println!("{} {} is now {}", "✓".green(), case.case_id, case.status);
    Ok(())
}

pub async fn cases_reassign(socket: Option<&str>, case_id: &str, psid: &str) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let case: Case = client
        .call_as(
            RpcMethod::Reassign,
            params(ReassignParams {
                case_id: case_id.to_string(),
                psid: psid.to_string(),
            })?,
        )
        .await?;
    println!(
        "{} {} reassigned to {} ({} reassignment(s) total)",
        "✓".green(),
        case.case_id,
        psid,
        case.reassigned_count
    );
    Ok(())
}

pub async fn cases_note(socket: Option<&str>, case_id: &str, text: &str) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let case: Case = client
        .call_as(
            RpcMethod::AddNote,
            params(AddNoteParams {
                case_id: case_id.to_string(),
                text: text.to_string(),
            })?,
        )
        .await?;
    println!(
        "{} Note added to {} ({} note(s))",
        "✓".green(),
        case.case_id,
        case.notes.len()
    );
    Ok(())
}

pub async fn users_list(socket: Option<&str>) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let users: Vec<User> = client.call_as(RpcMethod::ListUsers, None).await?;

    if users.is_empty() {
        println!("Roster is empty.");
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!(
            "{:<8} {:<18} {:<12} {:<8} {:>6} {:>9}",
            "PSID", "NAME", "DEPARTMENT", "ACTIVE", "CASES", "TODAY"
        )
        .bold()
    );
    for user in &users {
        let active = if user.is_active {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        };
        let today = format!("{}/{}", user.today_new_count, user.max_daily_new);
        let today = if user.at_daily_cap() {
            today.yellow().to_string()
        } else {
            today
        };
        let name = if user.team_lead {
            format!("{} {}", user.user_name, "(lead)".dimmed())
        } else {
            user.user_name.clone()
        };
        println!(
            "{:<8} {:<18} {:<12} {:<8} {:>6} {:>9}",
            user.psid, name, user.department, active, user.active_case_count, today
        );
    }
    println!();
    Ok(())
}

pub async fn users_set_active(socket: Option<&str>, psid: &str, active: bool) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let _: serde_json::Value = client
        .call_as(
            RpcMethod::SetUserActive,
            params(SetUserActiveParams {
                psid: psid.to_string(),
                active,
            })?,
        )
        .await?;
    println!(
        "{} {} {}",
        "✓".green(),
        psid,
        if active { "activated" } else { "deactivated" }
    );
    Ok(())
}

pub async fn config(socket: Option<&str>, set: Vec<String>) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;

    let config: PolicyConfig = if set.is_empty() {
        client.call_as(RpcMethod::GetConfig, None).await?
    } else {
        let mut patch = ConfigPatch::default();
        for pair in &set {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("expected key=value, got {pair:?}"))?;
            let one = ConfigPatch::from_key_value(key.trim(), value.trim())?;
            patch = merge(patch, one);
        }
        client
            .call_as(RpcMethod::SetConfig, params(patch)?)
            .await?
    };

    println!();
    println!("{}", "policy configuration".bold());
    println!("{}", HR.dimmed());
    println!("{:<28} {}", "max_daily_new_per_user", config.max_daily_new_per_user);
    println!("{:<28} {}", "sla_cutoff_local", config.sla_cutoff_local);
    println!("{:<28} {}", "sla_timezone", config.sla_timezone);
    println!("{:<28} {}", "auto_assignment_enabled", config.auto_assignment_enabled);
    println!("{:<28} {}", "round_robin_enabled", config.round_robin_enabled);
    println!("{:<28} {}", "team_lead_priority", config.team_lead_priority);
    println!("{:<28} {}", "escalation_threshold_hours", config.escalation_threshold_hours);
    println!("{:<28} {}", "sla_reminder_interval_mins", config.sla_reminder_interval_mins);
    println!(
        "{:<28} {} - {}",
        "business_hours", config.business_hours_start, config.business_hours_end
    );
    println!("{:<28} {}", "weekend_processing", config.weekend_processing);
    println!("{}", HR.dimmed());
    println!();
    Ok(())
}

fn merge(mut base: ConfigPatch, other: ConfigPatch) -> ConfigPatch {
    base.max_daily_new_per_user = other.max_daily_new_per_user.or(base.max_daily_new_per_user);
    base.sla_cutoff_local = other.sla_cutoff_local.or(base.sla_cutoff_local);
    base.sla_timezone = other.sla_timezone.or(base.sla_timezone);
    base.auto_assignment_enabled = other
        .auto_assignment_enabled
        .or(base.auto_assignment_enabled);
    base.round_robin_enabled = other.round_robin_enabled.or(base.round_robin_enabled);
    base.team_lead_priority = other.team_lead_priority.or(base.team_lead_priority);
    base.escalation_threshold_hours = other
        .escalation_threshold_hours
        .or(base.escalation_threshold_hours);
    base.sla_reminder_interval_mins = other
        .sla_reminder_interval_mins
        .or(base.sla_reminder_interval_mins);
    base.business_hours_start = other.business_hours_start.or(base.business_hours_start);
    base.business_hours_end = other.business_hours_end.or(base.business_hours_end);
    base.weekend_processing = other.weekend_processing.or(base.weekend_processing);
    base
}

pub async fn report(socket: Option<&str>) -> Result<()> {
    let mut client = DaemonClient::connect(socket).await?;
    let report: Report = client.call_as(RpcMethod::Report, None).await?;

    println!();
    println!("{}", "casedesk report".bold());
    println!("{}", HR.dimmed());
    println!("{:<22} {}", "open cases", report.kpis.open_cases);
    println!("{:<22} {}", "sla breaches", report.kpis.sla_breaches);
    println!("{:<22} {}", "unprocessed loads", report.kpis.unprocessed_loads);
    println!("{:<22} {}", "active users", report.kpis.active_users);
    println!(
        "{:<22} {:.0}%",
        "resolution rate",
        report.kpis.resolution_rate * 100.0
    );

    println!();
    println!("{}", "status distribution".bold());
    for slice in &report.status_distribution {
        println!("{:<22} {}", slice.status.to_string(), slice.count);
    }

    println!();
    println!("{}", "workload".bold());
    for row in &report.workload {
        println!(
            "{:<8} {:<18} {:>3} active   today {}/{}",
            row.psid, row.user_name, row.active_case_count, row.today_new_count, row.max_daily_new
        );
    }

    println!();
    println!("{}", "performance".bold());
    for row in &report.performance {
        println!(
            "{:<8} {:<18} {:>4} assigned  {:>4} resolved  {:>3} breached",
            row.psid, row.user_name, row.total_assigned, row.resolved, row.sla_breaches
        );
    }
    println!("{}", HR.dimmed());
    println!();
    Ok(())
}
