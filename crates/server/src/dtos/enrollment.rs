use database::entities::enrolled_courses;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    /// `dropped`, `withdrawn` or `completed`
    #[schema(example = "dropped")]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreditsResponse {
    pub semester_enrollment_id: Uuid,
    pub total_credits: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledCourseResponse {
    pub id: Uuid,
    pub semester_enrollment_id: Uuid,
    pub section_id: Uuid,
    pub status: String,
    pub grade: Option<String>,
    /// The term's credit load after the change
    pub total_credits: i32,
}

impl EnrolledCourseResponse {
    pub fn new(record: enrolled_courses::Model, total_credits: i32) -> Self {
        Self {
            id: record.id,
            semester_enrollment_id: record.semester_enrollment_id,
            section_id: record.section_id,
            status: record.status.as_str().to_string(),
            grade: record.grade,
            total_credits,
        }
    }
}
