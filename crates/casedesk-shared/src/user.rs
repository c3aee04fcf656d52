//! User roster types.
//!
//! A user is an assignee with a daily intake cap. `today_new_count`
//! tracks assignments for the local calendar day in `today_date` and
//! is zeroed by the daemon's midnight reset.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A roster member who can be assigned cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique personnel identifier (e.g. "PS001")
    pub psid: String,
    pub user_name: String,
    /// Team leads are preferred for priority records
    pub team_lead: bool,
    /// Inactive users never receive assignments
    pub is_active: bool,
    /// Open + in-progress + on-hold cases currently assigned
    pub active_case_count: u32,
    /// New cases assigned so far on `today_date`
    pub today_new_count: u32,
    /// Local calendar day the counter refers to
    pub today_date: NaiveDate,
    pub last_assigned_at: Option<DateTime<Utc>>,
    /// Daily intake cap
    pub max_daily_new: u32,
    pub email: String,
    pub department: String,
}

impl User {
    pub fn new(psid: &str, user_name: &str, today: NaiveDate, max_daily_new: u32) -> Self {
        Self {
            psid: psid.to_string(),
            user_name: user_name.to_string(),
            team_lead: false,
            is_active: true,
            active_case_count: 0,
            today_new_count: 0,
            today_date: today,
            last_assigned_at: None,
            max_daily_new,
            email: String::new(),
            department: String::new(),
        }
    }

    /// Whether this user has hit the daily intake cap.
    pub fn at_daily_cap(&self) -> bool {
        self.today_new_count >= self.max_daily_new
    }

    /// Whether this user can take a new assignment right now.
    pub fn eligible(&self) -> bool {
        self.is_active && !self.at_daily_cap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    #[test]
    fn fresh_user_is_eligible() {
        let user = User::new("PS001", "Alice Johnson", day(), 5);
        assert!(user.eligible());
        assert!(!user.at_daily_cap());
    }

    #[test]
    fn capped_user_is_not_eligible() {
        let mut user = User::new("PS002", "Bob Smith", day(), 5);
        user.today_new_count = 5;
        assert!(user.at_daily_cap());
        assert!(!user.eligible());
    }

    #[test]
    fn inactive_user_is_not_eligible() {
        let mut user = User::new("PS004", "David Brown", day(), 5);
        user.is_active = false;
        assert!(!user.eligible());
    }

    #[test]
    fn zero_cap_means_always_capped() {
        let user = User::new("PS009", "Zero Cap", day(), 0);
        assert!(user.at_daily_cap());
    }
}
