use database::entities::{course_prerequisites, courses};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPrerequisiteRequest {
    pub prerequisite_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisiteEdgeResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub prerequisite_id: Uuid,
}

impl From<course_prerequisites::Model> for PrerequisiteEdgeResponse {
    fn from(edge: course_prerequisites::Model) -> Self {
        Self {
            id: edge.id,
            course_id: edge.course_id,
            prerequisite_id: edge.prerequisite_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseSummary {
    pub id: Uuid,
    #[schema(example = "MATH101")]
    pub code: String,
    pub title: String,
    pub credits: i32,
}

impl From<courses::Model> for CourseSummary {
    fn from(course: courses::Model) -> Self {
        Self {
            id: course.id,
            code: course.code,
            title: course.title,
            credits: course.credits,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrerequisitesResponse {
    pub course_id: Uuid,
    /// Courses listed directly on this course
    pub direct: Vec<CourseSummary>,
    /// Every course required before this one, at any depth
    pub all: Vec<CourseSummary>,
}
