use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A directed edge `course -> prerequisite`: the prerequisite must be taken first
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_prerequisites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub prerequisite_id: Uuid,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::PrerequisiteId",
        to = "super::courses::Column::Id",
        on_delete = "Cascade"
    )]
    Prerequisite,
}

impl ActiveModelBehavior for ActiveModel {}
