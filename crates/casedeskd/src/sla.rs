//! SLA deadline computation.
//!
//! Policy: one-day turnaround. The deadline for a case is the
//! configured cutoff time on the local calendar day *after* the
//! creation day, evaluated in the configured timezone and expressed
//! back in UTC. The creation time of day does not matter: a case
//! created at 08:00 and one created at 23:00 on the same local day
//! share the same deadline ("next day 9:30 PM" in the origin policy).

use casedesk_shared::config::PolicyConfig;
use casedesk_shared::CasedeskError;
use chrono::{DateTime, Duration, LocalResult, TimeZone, Utc};

/// Compute the SLA deadline for a case created at `created_at`.
pub fn compute_sla_deadline(
    created_at: DateTime<Utc>,
    config: &PolicyConfig,
) -> Result<DateTime<Utc>, CasedeskError> {
    let tz = config.timezone()?;
    let cutoff = config.cutoff_time()?;

    let local_date = created_at.with_timezone(&tz).date_naive();
    let due_naive = (local_date + Duration::days(1)).and_time(cutoff);

    // DST handling: an ambiguous local time takes the earliest valid
    // instant; a nonexistent one (spring-forward gap) shifts one hour
    // forward.
    let due_local = match tz.from_local_datetime(&due_naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(due_naive + Duration::hours(1)))
            .earliest()
            .ok_or_else(|| {
                CasedeskError::Internal(format!("unresolvable local deadline {due_naive}"))
            })?,
    };

    Ok(due_local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Tz;

    fn config_with(tz: &str, cutoff: &str) -> PolicyConfig {
        PolicyConfig {
            sla_timezone: tz.to_string(),
            sla_cutoff_local: cutoff.to_string(),
            ..PolicyConfig::default()
        }
    }

    fn local(tz: Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        tz.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn deadline_is_next_day_cutoff_before_cutoff() {
        // Created 2024-03-11 20:00 local, cutoff 21:30 -> due 2024-03-12 21:30 local.
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let config = config_with("Asia/Kolkata", "21:30");
        let created = local(tz, 2024, 3, 11, 20, 0);

        let due = compute_sla_deadline(created, &config).unwrap();
        assert_eq!(due, local(tz, 2024, 3, 12, 21, 30));
    }

    #[test]
    fn deadline_is_next_day_cutoff_after_cutoff_too() {
        // Created 23:45, already past the cutoff: still next-day cutoff,
        // not the day after.
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let config = config_with("Asia/Kolkata", "21:30");
        let created = local(tz, 2024, 3, 11, 23, 45);

        let due = compute_sla_deadline(created, &config).unwrap();
        assert_eq!(due, local(tz, 2024, 3, 12, 21, 30));
    }

    #[test]
    fn deadline_uses_local_calendar_day_not_utc() {
        // 2024-03-11 20:00 UTC is 2024-03-12 01:30 in Kolkata, so the
        // deadline lands on the 13th there.
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let config = config_with("Asia/Kolkata", "21:30");
        let created = Utc.with_ymd_and_hms(2024, 3, 11, 20, 0, 0).unwrap();

        let due = compute_sla_deadline(created, &config).unwrap();
        let due_local = due.with_timezone(&tz);
        assert_eq!(
            due_local.date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
        );
        assert_eq!(due_local.format("%H:%M").to_string(), "21:30");
    }

    #[test]
    fn deadline_survives_spring_forward_gap() {
        // US spring-forward 2024-03-10: 02:30 does not exist in New York.
        // A case created on the 9th with an 02:30 cutoff must still get
        // a resolvable deadline (shifted one hour forward).
        let tz: Tz = "America/New_York".parse().unwrap();
        let config = config_with("America/New_York", "02:30");
        let created = local(tz, 2024, 3, 9, 12, 0);

        let due = compute_sla_deadline(created, &config).unwrap();
        let due_local = due.with_timezone(&tz);
        assert_eq!(
            due_local.date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(due_local.format("%H:%M").to_string(), "03:30");
    }

    #[test]
    fn deadline_rejects_bad_timezone() {
        let config = config_with("Not/AZone", "21:30");
        let created = Utc.with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap();
        assert!(compute_sla_deadline(created, &config).is_err());
    }
}
