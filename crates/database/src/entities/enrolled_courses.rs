use models::status::EnrollmentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One student's registration in one section, owned by a semester enrollment
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrolled_courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub semester_enrollment_id: Uuid,
    pub section_id: Uuid,
    pub status: EnrollmentStatus,
    pub grade: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::semester_enrollments::Entity",
        from = "Column::SemesterEnrollmentId",
        to = "super::semester_enrollments::Column::Id",
        on_delete = "Cascade"
    )]
    SemesterEnrollment,
    #[sea_orm(
        belongs_to = "super::course_sections::Entity",
        from = "Column::SectionId",
        to = "super::course_sections::Column::Id",
        on_delete = "Restrict"
    )]
    Section,
}

impl Related<super::semester_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterEnrollment.def()
    }
}

impl Related<super::course_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
