//! Daily counter reset scheduler.
//!
//! Wakes at the next local midnight in the configured SLA timezone and
//! zeroes every user's daily intake counter. Also catches up after a
//! daemon restart that crossed a day boundary: any stale `today_date`
//! triggers an immediate reset on the next tick. Sleeps are capped at
//! one hour so timezone changes made over RPC take effect promptly.

use chrono::{Duration as ChronoDuration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::time::Duration;
use tracing::{info, warn};

use crate::engine;
use crate::state::SharedState;

const MAX_SLEEP: Duration = Duration::from_secs(3600);
const MIN_SLEEP: Duration = Duration::from_secs(1);

/// Run the reset loop forever.
pub async fn run_reset_scheduler(state: SharedState) {
    info!("Daily reset scheduler started");
    loop {
        let sleep_for = tick(&state).await;
        tokio::time::sleep(sleep_for).await;
    }
}

/// Reset stale counters if needed and return how long to sleep.
async fn tick(state: &SharedState) -> Duration {
    let mut state = state.write().await;

    let tz: Tz = match state.config.timezone() {
        Ok(tz) => tz,
        Err(e) => {
            // Config validation should make this unreachable; hold the
            // roster as-is rather than resetting on a bad clock.
            warn!("Scheduler cannot resolve timezone: {}", e);
            return MAX_SLEEP;
        }
    };

    let now_local = Utc::now().with_timezone(&tz);
    let today = now_local.date_naive();

    if state.users.iter().any(|u| u.today_date != today) {
        engine::reset_daily_counters(&mut state.users, today);
    }
    drop(state);

    // Sleep until the next local midnight, capped so config changes
    // are noticed within the hour.
    let next_midnight = (today + ChronoDuration::days(1)).and_time(NaiveTime::MIN);
    let wake_at = tz
        .from_local_datetime(&next_midnight)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc::now() + ChronoDuration::hours(1));

    let until = (wake_at - Utc::now()).to_std().unwrap_or(MIN_SLEEP);
    until.clamp(MIN_SLEEP, MAX_SLEEP)
}
