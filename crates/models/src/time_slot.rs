use chrono::{NaiveTime, TimeDelta};
use serde::Serialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Errors produced when building a [`TimeSlot`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeSlotError {
    /// The end does not come strictly after the start. Slots never wrap past midnight.
    #[error("start time {start} must be before end time {end}")]
    NotIncreasing { start: NaiveTime, end: NaiveTime },
    /// The textual form could not be parsed
    #[error("malformed time slot: {0:?}")]
    Malformed(String),
}

/// A half-open interval `[start, end)` within a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, TimeSlotError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(TimeSlotError::NotIncreasing { start, end })
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether two slots on the same day intersect.
    ///
    /// Back-to-back slots (`self.end == other.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    /// Parses `"HH:MM-HH:MM"` (seconds optional on either side)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeSlotError::Malformed(s.to_string());

        let (start, end) = s.trim().split_once('-').ok_or_else(malformed)?;
        let start = parse_time(start.trim()).ok_or_else(malformed)?;
        let end = parse_time(end.trim()).ok_or_else(malformed)?;

        Self::new(start, end)
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
