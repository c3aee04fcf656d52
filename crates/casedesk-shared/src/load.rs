//! Daily load types.
//!
//! A daily load is a batch of raw incoming records for one customer on
//! one day. Processing a load creates exactly one case per record (or
//! reports the record as unassignable) and is idempotent: a processed
//! load can never be processed again.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A batch of incoming records awaiting case creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLoad {
    /// Unique load identifier (e.g. "DL-2024-001")
    pub load_id: String,
    pub customer_id: String,
    pub customer_name: String,
    /// Number of raw records in the batch
    pub record_count: u32,
    pub created_at: DateTime<Utc>,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    /// Processing run identifier, stamped when the load is processed
    pub run_id: Option<String>,
}

impl DailyLoad {
    pub fn new(
        load_id: &str,
        customer_id: &str,
        customer_name: &str,
        record_count: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            load_id: load_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_name: customer_name.to_string(),
            record_count,
            created_at,
            processed: false,
            processed_at: None,
            run_id: None,
        }
    }

    /// Local calendar day of the load in the given timezone.
    pub fn load_date(&self, tz: chrono_tz::Tz) -> NaiveDate {
        self.created_at.with_timezone(&tz).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn load_date_follows_timezone() {
        // 20:00 UTC on Mar 11 is already Mar 12 in Kolkata (UTC+5:30).
        let load = DailyLoad::new(
            "DL-2024-001",
            "CUST-001",
            "Acme Corporation",
            45,
            Utc.with_ymd_and_hms(2024, 3, 11, 20, 0, 0).unwrap(),
        );
        assert_eq!(
            load.load_date(chrono_tz::Asia::Kolkata),
            NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
        );
        assert_eq!(
            load.load_date(chrono_tz::Europe::London),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }
}
