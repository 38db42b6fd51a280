use crate::{
    entities::{course_sections, courses},
    error::ServiceError,
};
use chrono::Utc;
use log::info;
use models::{caller::Caller, status::Semester};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub description: Option<String>,
    pub program_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewSection {
    pub course_id: Uuid,
    pub section_code: String,
    pub semester: Semester,
    pub academic_year: String,
    pub faculty_id: Option<Uuid>,
}

pub struct CourseService;

impl CourseService {
    pub async fn create_course(
        db: &DatabaseConnection,
        caller: &Caller,
        course: NewCourse,
    ) -> Result<courses::Model, ServiceError> {
        Self::authorize(caller)?;

        let code = course.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ServiceError::Validation("course code must not be blank".into()));
        }
        if course.credits < 0 {
            return Err(ServiceError::Validation(format!(
                "credits must be non-negative, got {}",
                course.credits
            )));
        }

        let taken = courses::Entity::find()
            .filter(courses::Column::Code.eq(code.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(ServiceError::Validation(format!(
                "course code {code} is already in use"
            )));
        }

        let now = Utc::now().naive_utc();
        let created = courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            title: Set(course.title),
            credits: Set(course.credits),
            description: Set(course.description),
            program_id: Set(course.program_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!("{} created course {}", caller.subject, created.code);
        Ok(created)
    }

    pub async fn get_course<C>(conn: &C, course_id: Uuid) -> Result<courses::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        courses::Entity::find_by_id(course_id)
            .one(conn)
            .await?
            .ok_or(ServiceError::not_found("course", course_id))
    }

    pub async fn create_section(
        db: &DatabaseConnection,
        caller: &Caller,
        section: NewSection,
    ) -> Result<course_sections::Model, ServiceError> {
        Self::authorize(caller)?;

        let section_code = section.section_code.trim().to_string();
        if section_code.is_empty() {
            return Err(ServiceError::Validation("section code must not be blank".into()));
        }

        let course = Self::get_course(db, section.course_id).await?;

        let now = Utc::now().naive_utc();
        let created = course_sections::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            section_code: Set(section_code),
            semester: Set(section.semester),
            academic_year: Set(section.academic_year),
            faculty_id: Set(section.faculty_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!(
            "{} opened section {} of {}",
            caller.subject, created.section_code, course.code
        );
        Ok(created)
    }

    pub async fn sections_of_course<C>(
        conn: &C,
        course_id: Uuid,
    ) -> Result<Vec<course_sections::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let sections = course_sections::Entity::find()
            .filter(course_sections::Column::CourseId.eq(course_id))
            .order_by_asc(course_sections::Column::SectionCode)
            .all(conn)
            .await?;

        Ok(sections)
    }

    fn authorize(caller: &Caller) -> Result<(), ServiceError> {
        if caller.can_manage_catalog() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "{} may not edit the course catalog",
                caller.subject
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{registrar, setup_db, student};

    fn new_course(code: &str, credits: i32) -> NewCourse {
        NewCourse {
            code: code.to_string(),
            title: "Calculus I".to_string(),
            credits,
            description: None,
            program_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_course_and_section() {
        let db = setup_db().await;
        let caller = registrar();

        let course = CourseService::create_course(&db, &caller, new_course(" math101 ", 3))
            .await
            .unwrap();
        assert_eq!(course.code, "MATH101");

        let section = CourseService::create_section(
            &db,
            &caller,
            NewSection {
                course_id: course.id,
                section_code: "A".to_string(),
                semester: Semester::First,
                academic_year: "2025-2026".to_string(),
                faculty_id: None,
            },
        )
        .await
        .unwrap();

        let sections = CourseService::sections_of_course(&db, course.id)
            .await
            .unwrap();
        assert_eq!(sections, vec![section]);
    }

    #[tokio::test]
    async fn test_create_course_validation() {
        let db = setup_db().await;
        let caller = registrar();

        CourseService::create_course(&db, &caller, new_course("MATH101", 3))
            .await
            .unwrap();

        let duplicate = CourseService::create_course(&db, &caller, new_course("math101", 4)).await;
        assert!(matches!(duplicate, Err(ServiceError::Validation(_))));

        let negative = CourseService::create_course(&db, &caller, new_course("MATH102", -1)).await;
        assert!(matches!(negative, Err(ServiceError::Validation(_))));

        let forbidden = CourseService::create_course(&db, &student(), new_course("MATH103", 3)).await;
        assert!(matches!(forbidden, Err(ServiceError::Forbidden(_))));

        let missing = CourseService::get_course(&db, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }
}
