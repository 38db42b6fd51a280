use crate::error::ApiError;
use chrono::NaiveTime;
use database::{
    entities::schedules,
    services::schedule::{NewSchedule, ScheduleChanges},
};
use models::{days::DayOfWeek, status::ScheduleStatus, time_slot::TimeSlot};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScheduleRequest {
    pub section_id: Uuid,
    /// Must match the section's course when given
    pub course_id: Option<Uuid>,
    /// Day code (`M`, `T`, `W`, `R`, `F`, `S`, `U`) or name
    #[schema(example = "monday")]
    pub day: String,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:30:00")]
    pub end_time: NaiveTime,
    #[schema(example = "GHC 4102")]
    pub room: String,
}

impl CreateScheduleRequest {
    pub fn into_new_schedule(self) -> Result<(Uuid, NewSchedule), ApiError> {
        let day = parse_day(&self.day)?;

        Ok((
            self.section_id,
            NewSchedule {
                day,
                start_time: self.start_time,
                end_time: self.end_time,
                room: self.room,
                course_id: self.course_id,
            },
        ))
    }
}

/// Fields left out keep their current value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateScheduleRequest {
    pub day: Option<String>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    pub room: Option<String>,
    /// `active` or `cancelled`
    pub status: Option<String>,
}

impl TryFrom<UpdateScheduleRequest> for ScheduleChanges {
    type Error = ApiError;

    fn try_from(request: UpdateScheduleRequest) -> Result<Self, Self::Error> {
        let day = request.day.as_deref().map(parse_day).transpose()?;
        let status = request
            .status
            .as_deref()
            .map(|s| {
                s.parse::<ScheduleStatus>()
                    .map_err(|e| ApiError::BadRequest(e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            day,
            start_time: request.start_time,
            end_time: request.end_time,
            room: request.room,
            status,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConflictQuery {
    /// Day code or name
    pub day: String,
    #[param(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[param(value_type = String, example = "10:30:00")]
    pub end_time: NaiveTime,
    /// Restrict the search to one room
    pub room: Option<String>,
    /// Leave one schedule out of the comparison
    pub exclude: Option<Uuid>,
}

impl ConflictQuery {
    pub fn parse(&self) -> Result<(DayOfWeek, TimeSlot), ApiError> {
        let day = parse_day(&self.day)?;
        let slot = TimeSlot::new(self.start_time, self.end_time)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok((day, slot))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub day: String,
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    pub room: String,
    pub status: String,
    pub course_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
}

impl From<schedules::Model> for ScheduleResponse {
    fn from(schedule: schedules::Model) -> Self {
        let status = match schedule.status {
            ScheduleStatus::Active => "active",
            ScheduleStatus::Cancelled => "cancelled",
        };

        Self {
            id: schedule.id,
            day: schedule.day.as_str().to_string(),
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            room: schedule.room,
            status: status.to_string(),
            course_id: schedule.course_id,
            section_id: schedule.section_id,
        }
    }
}

fn parse_day(day: &str) -> Result<DayOfWeek, ApiError> {
    day.parse::<DayOfWeek>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
