use models::status::{Semester, TermStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "semester_enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub semester: Semester,
    pub academic_year: String,
    pub status: TermStatus,
    /// Cached aggregate, only refreshed by the credit aggregator
    pub total_credits: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrolled_courses::Entity")]
    EnrolledCourses,
}

impl Related<super::enrolled_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrolledCourses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
