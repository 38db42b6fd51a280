use crate::entities::{
    course_prerequisites, course_sections, courses, enrolled_courses, schedules,
    semester_enrollments,
};
use chrono::{NaiveTime, Utc};
use models::{
    caller::{Caller, Role},
    status::{EnrollmentStatus, Semester, TermStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, EntityTrait, Schema,
};
use uuid::Uuid;

/// An in-memory SQLite database with every table created from the entities
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(courses::Entity),
        schema.create_table_from_entity(course_prerequisites::Entity),
        schema.create_table_from_entity(course_sections::Entity),
        schema.create_table_from_entity(schedules::Entity),
        schema.create_table_from_entity(semester_enrollments::Entity),
        schema.create_table_from_entity(enrolled_courses::Entity),
    ];
    for statement in statements {
        db.execute(backend.build(&statement)).await.unwrap();
    }

    db
}

pub fn registrar() -> Caller {
    Caller::new("registrar", Role::Registrar)
}

pub fn student() -> Caller {
    Caller::new("student", Role::Student)
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub async fn insert_course(db: &DatabaseConnection, code: &str, credits: i32) -> courses::Model {
    let now = Utc::now().naive_utc();
    courses::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        title: Set(format!("{code} title")),
        credits: Set(credits),
        description: Set(None),
        program_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_section(db: &DatabaseConnection, course_id: Uuid) -> course_sections::Model {
    let now = Utc::now().naive_utc();
    course_sections::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course_id),
        section_code: Set("A".to_string()),
        semester: Set(Semester::First),
        academic_year: Set("2025-2026".to_string()),
        faculty_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_semester_enrollment(db: &DatabaseConnection) -> semester_enrollments::Model {
    let now = Utc::now().naive_utc();
    semester_enrollments::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(Uuid::new_v4()),
        semester: Set(Semester::First),
        academic_year: Set("2025-2026".to_string()),
        status: Set(TermStatus::Open),
        total_credits: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Registers the enrollment in a fresh section of a new course
pub async fn insert_enrolled_course(
    db: &DatabaseConnection,
    semester_enrollment_id: Uuid,
    code: &str,
    credits: i32,
    status: EnrollmentStatus,
) -> enrolled_courses::Model {
    let course = insert_course(db, code, credits).await;
    let section = insert_section(db, course.id).await;
    let now = Utc::now().naive_utc();

    enrolled_courses::ActiveModel {
        id: Set(Uuid::new_v4()),
        semester_enrollment_id: Set(semester_enrollment_id),
        section_id: Set(section.id),
        status: Set(status),
        grade: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn total_credits_of(db: &DatabaseConnection, id: Uuid) -> i32 {
    semester_enrollments::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .total_credits
}
