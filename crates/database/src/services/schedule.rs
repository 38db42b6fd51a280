use crate::{
    entities::{course_sections, schedules},
    error::ServiceError,
    locks,
};
use chrono::{NaiveTime, Utc};
use log::{info, warn};
use models::{
    caller::Caller, days::DayOfWeek, status::ScheduleStatus, time_slot::TimeSlot,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

/// A booking request for a room on one day
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
    /// Must match the section's course when given
    pub course_id: Option<Uuid>,
}

/// Partial update of an existing schedule; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct ScheduleChanges {
    pub day: Option<DayOfWeek>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub room: Option<String>,
    pub status: Option<ScheduleStatus>,
}

pub struct ScheduleService;

impl ScheduleService {
    /// Active schedules on `day` whose interval intersects `slot`.
    ///
    /// With `room` only that room is considered; without it every overlap on
    /// the day is returned. `exclude` drops one schedule from the comparison,
    /// so an update can be checked against everything but itself.
    pub async fn find_conflicts<C>(
        conn: &C,
        day: DayOfWeek,
        slot: TimeSlot,
        room: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<Vec<schedules::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        // [s1, e1) and [s2, e2) intersect iff s1 < e2 and s2 < e1
        let mut condition = Condition::all()
            .add(schedules::Column::Day.eq(day))
            .add(schedules::Column::Status.eq(ScheduleStatus::Active))
            .add(schedules::Column::StartTime.lt(slot.end()))
            .add(schedules::Column::EndTime.gt(slot.start()));

        if let Some(room) = room {
            condition = condition.add(schedules::Column::Room.eq(room.trim()));
        }

        if let Some(id) = exclude {
            condition = condition.add(schedules::Column::Id.ne(id));
        }

        let conflicts = schedules::Entity::find()
            .filter(condition)
            .order_by_asc(schedules::Column::StartTime)
            .order_by_asc(schedules::Column::Room)
            .all(conn)
            .await?;

        Ok(conflicts)
    }

    /// Books a room for a section, refusing any overlap in the same room and day
    pub async fn validate_and_create_schedule(
        db: &DatabaseConnection,
        caller: &Caller,
        schedule: NewSchedule,
        section_id: Uuid,
    ) -> Result<schedules::Model, ServiceError> {
        Self::authorize(caller)?;

        let slot = TimeSlot::new(schedule.start_time, schedule.end_time)?;
        let room = Self::normalize_room(&schedule.room)?;

        let txn = db.begin().await?;

        let section = course_sections::Entity::find_by_id(section_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::not_found("section", section_id))?;

        if let Some(course_id) = schedule.course_id
            && course_id != section.course_id
        {
            return Err(ServiceError::Validation(format!(
                "course {course_id} does not match section {section_id}"
            )));
        }

        locks::lock_room_day(&txn, &room, schedule.day).await?;
        Self::ensure_free(&txn, schedule.day, slot, &room, None).await?;

        let now = Utc::now().naive_utc();
        let created = schedules::ActiveModel {
            id: Set(Uuid::new_v4()),
            day: Set(schedule.day),
            start_time: Set(slot.start()),
            end_time: Set(slot.end()),
            room: Set(room),
            status: Set(ScheduleStatus::Active),
            course_id: Set(Some(section.course_id)),
            section_id: Set(Some(section.id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "{} booked {} on {} {} ({} min) for section {}",
            caller.subject,
            created.room,
            created.day,
            slot,
            slot.duration().num_minutes(),
            section_id
        );
        Ok(created)
    }

    /// Applies `changes`, re-validating against every other schedule
    pub async fn validate_and_update_schedule(
        db: &DatabaseConnection,
        caller: &Caller,
        schedule_id: Uuid,
        changes: ScheduleChanges,
    ) -> Result<schedules::Model, ServiceError> {
        Self::authorize(caller)?;

        let txn = db.begin().await?;

        let existing = schedules::Entity::find_by_id(schedule_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::not_found("schedule", schedule_id))?;

        let day = changes.day.unwrap_or(existing.day);
        let slot = TimeSlot::new(
            changes.start_time.unwrap_or(existing.start_time),
            changes.end_time.unwrap_or(existing.end_time),
        )?;
        let room = match changes.room.as_deref() {
            Some(room) => Self::normalize_room(room)?,
            None => existing.room.clone(),
        };
        let status = changes.status.unwrap_or(existing.status);

        if status.occupies_room() {
            locks::lock_room_day(&txn, &room, day).await?;
            Self::ensure_free(&txn, day, slot, &room, Some(schedule_id)).await?;
        }

        let mut active = existing.into_active_model();
        active.day = Set(day);
        active.start_time = Set(slot.start());
        active.end_time = Set(slot.end());
        active.room = Set(room);
        active.status = Set(status);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "{} updated schedule {schedule_id}: {} on {} {} ({:?})",
            caller.subject, updated.room, updated.day, slot, updated.status
        );
        Ok(updated)
    }

    pub async fn delete_schedule(
        db: &DatabaseConnection,
        caller: &Caller,
        schedule_id: Uuid,
    ) -> Result<(), ServiceError> {
        Self::authorize(caller)?;

        let schedule = schedules::Entity::find_by_id(schedule_id)
            .one(db)
            .await?
            .ok_or(ServiceError::not_found("schedule", schedule_id))?;

        schedule.delete(db).await?;

        info!("{} deleted schedule {schedule_id}", caller.subject);
        Ok(())
    }

    pub async fn schedules_for_section<C>(
        conn: &C,
        section_id: Uuid,
    ) -> Result<Vec<schedules::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let schedules = schedules::Entity::find()
            .filter(schedules::Column::SectionId.eq(section_id))
            .order_by_asc(schedules::Column::Day)
            .order_by_asc(schedules::Column::StartTime)
            .all(conn)
            .await?;

        Ok(schedules)
    }

    async fn ensure_free<C>(
        conn: &C,
        day: DayOfWeek,
        slot: TimeSlot,
        room: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let conflicts = Self::find_conflicts(conn, day, slot, Some(room), exclude).await?;

        if conflicts.is_empty() {
            return Ok(());
        }

        let taken: Vec<String> = conflicts
            .iter()
            .filter_map(|s| s.slot())
            .map(|s| s.to_string())
            .collect();
        warn!(
            "Rejected booking of {room} on {day} {slot}: overlaps {}",
            taken.join(", ")
        );

        let conflicting: Vec<Uuid> = conflicts.iter().map(|s| s.id).collect();
        Err(ServiceError::Conflict { conflicting })
    }

    fn normalize_room(room: &str) -> Result<String, ServiceError> {
        let room = room.trim();
        if room.is_empty() {
            return Err(ServiceError::Validation("room must not be blank".into()));
        }
        Ok(room.to_string())
    }

    fn authorize(caller: &Caller) -> Result<(), ServiceError> {
        if caller.can_manage_catalog() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "{} may not manage room schedules",
                caller.subject
            )))
        }
    }
}
