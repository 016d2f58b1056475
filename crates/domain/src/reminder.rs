use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Delivery state of a `Reminder`.
///
/// `Pending` is the initial state. The only legal transitions are
/// `Pending -> Completed` and `Pending -> Failed`, both terminal: once a
/// reminder has left `Pending` the dispatch job never touches it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Completed,
    Failed,
}

impl ReminderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Default for ReminderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidStatusError {
    #[error("Reminder status: {0} is not valid")]
    Unknown(String),
}

impl FromStr for ReminderStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidStatusError::Unknown(s.to_string())),
        }
    }
}

/// A `Reminder` is a message that should be delivered to the owning
/// `User`s WhatsApp number once `date_time` has passed in `timezone`.
///
/// `date_time` is a wall-clock time local to `timezone`, not an absolute
/// instant. Use `crate::date::to_utc_instant` to make it comparable
/// against server time.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The `User` that owns this reminder and receives the notification
    pub user_id: ID,
    pub title: String,
    pub description: Option<String>,
    /// IANA timezone name that `date_time` is local to
    pub timezone: String,
    /// Wall-clock date-time in `timezone`, e.g. "2024-06-01T09:00:00"
    pub date_time: String,
    pub status: ReminderStatus,
    /// Unix timestamp in millis for when this reminder was created
    pub created: i64,
    /// Unix timestamp in millis for when this reminder was last updated
    pub updated: i64,
}

impl Reminder {
    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}
