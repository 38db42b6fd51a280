use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// The day of the week a schedule occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(
    feature = "database",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    #[cfg_attr(feature = "database", sea_orm(string_value = "monday"))]
    Monday,
    #[cfg_attr(feature = "database", sea_orm(string_value = "tuesday"))]
    Tuesday,
    #[cfg_attr(feature = "database", sea_orm(string_value = "wednesday"))]
    Wednesday,
    #[cfg_attr(feature = "database", sea_orm(string_value = "thursday"))]
    Thursday,
    #[cfg_attr(feature = "database", sea_orm(string_value = "friday"))]
    Friday,
    #[cfg_attr(feature = "database", sea_orm(string_value = "saturday"))]
    Saturday,
    #[cfg_attr(feature = "database", sea_orm(string_value = "sunday"))]
    Sunday,
}

/// Error returned when a day cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized day of week: {0:?}")]
pub struct ParseDayError(pub String);

impl DayOfWeek {
    /// Day-to-code mapping used by registrar timetables (R = Thursday, U = Sunday)
    const DAY_CODES: [(Self, char, &'static str); 7] = [
        (Self::Monday, 'M', "monday"),
        (Self::Tuesday, 'T', "tuesday"),
        (Self::Wednesday, 'W', "wednesday"),
        (Self::Thursday, 'R', "thursday"),
        (Self::Friday, 'F', "friday"),
        (Self::Saturday, 'S', "saturday"),
        (Self::Sunday, 'U', "sunday"),
    ];

    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Single-letter timetable code
    pub fn code(self) -> char {
        Self::DAY_CODES
            .iter()
            .find(|(day, _, _)| *day == self)
            .map(|(_, code, _)| *code)
            .unwrap_or('?')
    }

    pub fn as_str(self) -> &'static str {
        Self::DAY_CODES
            .iter()
            .find(|(day, _, _)| *day == self)
            .map(|(_, _, name)| *name)
            .unwrap_or("")
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

impl FromStr for DayOfWeek {
    type Err = ParseDayError;

    /// Accepts a timetable code (`"R"`), a full name (`"Thursday"`) or a
    /// three-letter abbreviation (`"thu"`), case-insensitively for names
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();

        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::DAY_CODES
                .iter()
                .find(|(_, code, _)| *code == c.to_ascii_uppercase())
                .map(|(day, _, _)| *day)
                .ok_or_else(|| ParseDayError(input.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        Self::DAY_CODES
            .iter()
            .find(|(_, _, name)| *name == lower || (lower.len() == 3 && name.starts_with(&lower)))
            .map(|(day, _, _)| *day)
            .ok_or_else(|| ParseDayError(input.to_string()))
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use crate::days::DayOfWeek;
    use std::str::FromStr;

    #[test]
    fn test_day_from_code() {
        assert_eq!(DayOfWeek::from_str("M").unwrap(), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from_str("R").unwrap(), DayOfWeek::Thursday);
        assert_eq!(DayOfWeek::from_str("u").unwrap(), DayOfWeek::Sunday);
        assert!(DayOfWeek::from_str("X").is_err());
    }

    #[test]
    fn test_day_from_name() {
        assert_eq!(DayOfWeek::from_str("Tuesday").unwrap(), DayOfWeek::Tuesday);
        assert_eq!(DayOfWeek::from_str("  FRIDAY ").unwrap(), DayOfWeek::Friday);
        assert_eq!(DayOfWeek::from_str("wed").unwrap(), DayOfWeek::Wednesday);
        assert!(DayOfWeek::from_str("someday").is_err());
        assert!(DayOfWeek::from_str("").is_err());
    }

    #[test]
    fn test_day_display_round_trips_codes() {
        for day in DayOfWeek::ALL {
            assert_eq!(DayOfWeek::from_str(&day.to_string()).unwrap(), day);
            assert_eq!(
                DayOfWeek::from_str(&day.code().to_string()).unwrap(),
                day
            );
        }

        let codes: String = DayOfWeek::ALL.iter().map(|d| d.code()).collect();
        assert_eq!(codes, "MTWRFSU");
    }

    #[test]
    fn test_day_serializes_lowercase() {
        let json = serde_json::to_string(&DayOfWeek::Thursday).unwrap();
        assert_eq!(json, "\"thursday\"");
        assert!(DayOfWeek::Saturday.is_weekend());
        assert!(!DayOfWeek::Monday.is_weekend());
    }

    #[test]
    fn test_parse_error_is_std_error() {
        let err: Box<dyn std::error::Error> = "funday".parse::<DayOfWeek>().unwrap_err().into();
        assert_eq!(err.to_string(), "unrecognized day of week: \"funday\"");
    }
}
