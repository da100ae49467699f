use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle status of a gadget. Stored as the `gadget_status` postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "gadget_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GadgetStatus {
    Available,
    Deployed,
    Destroyed,
    Decommissioned,
}

impl GadgetStatus {
    pub const ALL: [GadgetStatus; 4] = [
        GadgetStatus::Available,
        GadgetStatus::Deployed,
        GadgetStatus::Destroyed,
        GadgetStatus::Decommissioned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GadgetStatus::Available => "AVAILABLE",
            GadgetStatus::Deployed => "DEPLOYED",
            GadgetStatus::Destroyed => "DESTROYED",
            GadgetStatus::Decommissioned => "DECOMMISSIONED",
        }
    }
}

impl fmt::Display for GadgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown gadget status {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for GadgetStatus {
    type Err = UnknownStatus;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Gadget record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Gadget {
    pub id: Uuid,
    pub name: String,
    pub status: GadgetStatus,
    pub user_id: Uuid, // owner
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial update applied to one owned gadget. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GadgetChanges {
    pub name: Option<String>,
    pub status: Option<GadgetStatus>,
}

impl GadgetChanges {
    pub fn status(status: GadgetStatus) -> Self {
        Self {
            name: None,
            status: Some(status),
        }
    }
}
