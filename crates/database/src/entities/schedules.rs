use models::{days::DayOfWeek, status::ScheduleStatus, time_slot::TimeSlot};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub day: DayOfWeek,
    pub start_time: Time,
    pub end_time: Time,
    pub room: String, // e.g. "GHC 4102"
    pub status: ScheduleStatus,
    pub course_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// The stored interval. `None` only if a row bypassed validation.
    pub fn slot(&self) -> Option<TimeSlot> {
        TimeSlot::new(self.start_time, self.end_time).ok()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_sections::Entity",
        from = "Column::SectionId",
        to = "super::course_sections::Column::Id",
        on_delete = "Cascade"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "SetNull"
    )]
    Course,
}

impl Related<super::course_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
