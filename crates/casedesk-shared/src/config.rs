//! Policy configuration.
//!
//! Loads settings from /etc/casedesk/config.toml or uses defaults.
//! Every engine operation reads a consistent snapshot taken under the
//! daemon state lock; runtime changes arrive as a partial patch over
//! RPC and are held in memory only (no persistence mandated).

use crate::error::CasedeskError;
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/casedesk/config.toml";

/// Assignment and SLA policy parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    /// Maximum new cases assigned to each user per local day
    #[serde(default = "default_max_daily_new")]
    pub max_daily_new_per_user: u32,

    /// Local SLA cutoff time, "HH:MM"
    #[serde(default = "default_sla_cutoff")]
    pub sla_cutoff_local: String,

    /// IANA timezone the SLA cutoff and daily reset are evaluated in
    #[serde(default = "default_sla_timezone")]
    pub sla_timezone: String,

    /// Whether processing a load assigns cases automatically
    #[serde(default = "default_true")]
    pub auto_assignment_enabled: bool,

    /// Least-recently-assigned-first candidate ordering
    #[serde(default = "default_true")]
    pub round_robin_enabled: bool,

    /// Prefer team leads for priority records
    #[serde(default = "default_true")]
    pub team_lead_priority: bool,

    /// Hours before a breached case is considered for escalation
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold_hours: u32,

    /// Minutes between SLA reminder sweeps
    #[serde(default = "default_reminder_interval")]
    pub sla_reminder_interval_mins: u32,

    /// Business hours window, "HH:MM"
    #[serde(default = "default_business_start")]
    pub business_hours_start: String,

    #[serde(default = "default_business_end")]
    pub business_hours_end: String,

    /// Whether loads are processed on weekends
    #[serde(default)]
    pub weekend_processing: bool,
}

fn default_max_daily_new() -> u32 {
    5
}

fn default_sla_cutoff() -> String {
    // Origin policy: "SLA set to next day 9:30 PM"
    "21:30".to_string()
}

fn default_sla_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_true() -> bool {
    true
}

fn default_escalation_threshold() -> u32 {
    24
}

fn default_reminder_interval() -> u32 {
    30
}

fn default_business_start() -> String {
    "09:00".to_string()
}

fn default_business_end() -> String {
    "18:00".to_string()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_daily_new_per_user: default_max_daily_new(),
            sla_cutoff_local: default_sla_cutoff(),
            sla_timezone: default_sla_timezone(),
            auto_assignment_enabled: true,
            round_robin_enabled: true,
            team_lead_priority: true,
            escalation_threshold_hours: default_escalation_threshold(),
            sla_reminder_interval_mins: default_reminder_interval(),
            business_hours_start: default_business_start(),
            business_hours_end: default_business_end(),
            weekend_processing: false,
        }
    }
}

impl PolicyConfig {
    /// Load from the given path, falling back to defaults if the file
    /// is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<PolicyConfig>(&text) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        warn!("Config at {} invalid ({}), using defaults", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to parse {} ({}), using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parsed SLA cutoff time.
    pub fn cutoff_time(&self) -> Result<NaiveTime, CasedeskError> {
        parse_hhmm(&self.sla_cutoff_local)
    }

    /// Parsed SLA timezone.
    pub fn timezone(&self) -> Result<Tz, CasedeskError> {
        Tz::from_str(&self.sla_timezone)
            .map_err(|_| CasedeskError::InvalidConfig(format!("unknown timezone {}", self.sla_timezone)))
    }

    /// Check all parseable fields.
    pub fn validate(&self) -> Result<(), CasedeskError> {
        self.cutoff_time()?;
        self.timezone()?;
        parse_hhmm(&self.business_hours_start)?;
        parse_hhmm(&self.business_hours_end)?;
        Ok(())
    }
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, CasedeskError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| CasedeskError::InvalidConfig(format!("expected HH:MM, got {s:?}")))
}

/// Partial config update. Unset fields keep their current values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub max_daily_new_per_user: Option<u32>,
    pub sla_cutoff_local: Option<String>,
    pub sla_timezone: Option<String>,
    pub auto_assignment_enabled: Option<bool>,
    pub round_robin_enabled: Option<bool>,
    pub team_lead_priority: Option<bool>,
    pub escalation_threshold_hours: Option<u32>,
    pub sla_reminder_interval_mins: Option<u32>,
    pub business_hours_start: Option<String>,
    pub business_hours_end: Option<String>,
    pub weekend_processing: Option<bool>,
}

impl ConfigPatch {
    /// Apply this patch on top of `current`, validating the result.
    /// The current config is untouched if validation fails.
    pub fn apply(&self, current: &PolicyConfig) -> Result<PolicyConfig, CasedeskError> {
        let mut next = current.clone();
        if let Some(v) = self.max_daily_new_per_user {
            next.max_daily_new_per_user = v;
        }
        if let Some(ref v) = self.sla_cutoff_local {
            next.sla_cutoff_local = v.clone();
        }
        if let Some(ref v) = self.sla_timezone {
            next.sla_timezone = v.clone();
        }
        if let Some(v) = self.auto_assignment_enabled {
            next.auto_assignment_enabled = v;
        }
        if let Some(v) = self.round_robin_enabled {
            next.round_robin_enabled = v;
        }
        if let Some(v) = self.team_lead_priority {
            next.team_lead_priority = v;
        }
        if let Some(v) = self.escalation_threshold_hours {
            next.escalation_threshold_hours = v;
        }
        if let Some(v) = self.sla_reminder_interval_mins {
            next.sla_reminder_interval_mins = v;
        }
        if let Some(ref v) = self.business_hours_start {
            next.business_hours_start = v.clone();
        }
        if let Some(ref v) = self.business_hours_end {
            next.business_hours_end = v.clone();
        }
        if let Some(v) = self.weekend_processing {
            next.weekend_processing = v;
        }
        next.validate()?;
        Ok(next)
    }

    /// Parse a `key=value` pair from the CLI into a single-field patch.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, CasedeskError> {
        let mut patch = Self::default();
        let bad_value = || CasedeskError::InvalidConfig(format!("bad value for {key}: {value:?}"));
        match key {
            "max_daily_new_per_user" => {
                patch.max_daily_new_per_user = Some(value.parse().map_err(|_| bad_value())?)
            }
            "sla_cutoff_local" => patch.sla_cutoff_local = Some(value.to_string()),
            "sla_timezone" => patch.sla_timezone = Some(value.to_string()),
            "auto_assignment_enabled" => {
                patch.auto_assignment_enabled = Some(value.parse().map_err(|_| bad_value())?)
            }
            "round_robin_enabled" => {
                patch.round_robin_enabled = Some(value.parse().map_err(|_| bad_value())?)
            }
            "team_lead_priority" => {
                patch.team_lead_priority = Some(value.parse().map_err(|_| bad_value())?)
            }
            "escalation_threshold_hours" => {
                patch.escalation_threshold_hours = Some(value.parse().map_err(|_| bad_value())?)
            }
            "sla_reminder_interval_mins" => {
                patch.sla_reminder_interval_mins = Some(value.parse().map_err(|_| bad_value())?)
            }
            "business_hours_start" => patch.business_hours_start = Some(value.to_string()),
            "business_hours_end" => patch.business_hours_end = Some(value.to_string()),
            "weekend_processing" => {
                patch.weekend_processing = Some(value.parse().map_err(|_| bad_value())?)
            }
            _ => {
                return Err(CasedeskError::InvalidConfig(format!("unknown key {key}")));
            }
        }
        Ok(patch)
    }
}
