use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Registration status of a single enrolled course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "database",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[cfg_attr(feature = "database", sea_orm(string_value = "enrolled"))]
    Enrolled,
    #[cfg_attr(feature = "database", sea_orm(string_value = "completed"))]
    Completed,
    #[cfg_attr(feature = "database", sea_orm(string_value = "dropped"))]
    Dropped,
    #[cfg_attr(feature = "database", sea_orm(string_value = "withdrawn"))]
    Withdrawn,
}

impl EnrollmentStatus {
    /// Only active and finished registrations count toward a term's credit load
    pub fn counts_toward_load(self) -> bool {
        matches!(self, Self::Enrolled | Self::Completed)
    }

    /// `enrolled` is the only non-terminal status
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Enrolled, Self::Dropped | Self::Withdrawn | Self::Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
            Self::Withdrawn => "withdrawn",
        }
    }
}

impl Display for EnrollmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a status string is not one of the known values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for EnrollmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enrolled" => Ok(Self::Enrolled),
            "completed" => Ok(Self::Completed),
            "dropped" => Ok(Self::Dropped),
            "withdrawn" => Ok(Self::Withdrawn),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Whether a schedule currently holds its room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "database",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "active"))]
    Active,
    #[cfg_attr(feature = "database", sea_orm(string_value = "cancelled"))]
    Cancelled,
}

impl ScheduleStatus {
    /// Cancelled schedules free their room/day slot
    pub fn occupies_room(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for ScheduleStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Academic term of a section or semester enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "database",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    #[cfg_attr(feature = "database", sea_orm(string_value = "first"))]
    First,
    #[cfg_attr(feature = "database", sea_orm(string_value = "second"))]
    Second,
    #[cfg_attr(feature = "database", sea_orm(string_value = "summer"))]
    Summer,
}

impl FromStr for Semester {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "1" => Ok(Self::First),
            "second" | "2" => Ok(Self::Second),
            "summer" => Ok(Self::Summer),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Lifecycle of a student's term record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "database",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "lowercase")]
pub enum TermStatus {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "open"))]
    Open,
    #[cfg_attr(feature = "database", sea_orm(string_value = "closed"))]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bearing_statuses() {
        assert!(EnrollmentStatus::Enrolled.counts_toward_load());
        assert!(EnrollmentStatus::Completed.counts_toward_load());
        assert!(!EnrollmentStatus::Dropped.counts_toward_load());
        assert!(!EnrollmentStatus::Withdrawn.counts_toward_load());
    }

    #[test]
    fn test_transitions() {
        use EnrollmentStatus::*;

        assert!(Enrolled.can_transition_to(Dropped));
        assert!(Enrolled.can_transition_to(Withdrawn));
        assert!(Enrolled.can_transition_to(Completed));
        assert!(!Enrolled.can_transition_to(Enrolled));
        assert!(!Dropped.can_transition_to(Enrolled));
        assert!(!Completed.can_transition_to(Withdrawn));
    }

    #[test]
    fn test_parse_statuses() {
        assert_eq!(
            " Withdrawn ".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::Withdrawn)
        );
        assert!("audit".parse::<EnrollmentStatus>().is_err());
        assert_eq!(
            "canceled".parse::<ScheduleStatus>(),
            Ok(ScheduleStatus::Cancelled)
        );
        assert_eq!("2".parse::<Semester>(), Ok(Semester::Second));
        assert!(!ScheduleStatus::Cancelled.occupies_room());
    }
}
