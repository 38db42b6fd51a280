//! Term registration bookkeeping.
//!
//! Apart from `change_status_and_recompute`, none of these operations touch
//! `total_credits`. Callers that need the aggregate to reflect a change run
//! the credit recompute afterwards.

use crate::{
    entities::{course_sections, enrolled_courses, semester_enrollments},
    error::ServiceError,
    services::credit::CreditService,
};
use chrono::Utc;
use log::info;
use models::{
    caller::Caller,
    status::{EnrollmentStatus, Semester, TermStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Opens a student's record for one term; a term can only be opened once
    pub async fn open_semester_enrollment(
        db: &DatabaseConnection,
        caller: &Caller,
        student_id: Uuid,
        semester: Semester,
        academic_year: &str,
    ) -> Result<semester_enrollments::Model, ServiceError> {
        Self::authorize(caller)?;

        let existing = semester_enrollments::Entity::find()
            .filter(semester_enrollments::Column::StudentId.eq(student_id))
            .filter(semester_enrollments::Column::Semester.eq(semester))
            .filter(semester_enrollments::Column::AcademicYear.eq(academic_year))
            .count(db)
            .await?;
        if existing > 0 {
            return Err(ServiceError::Validation(format!(
                "student {student_id} already has a {semester:?} {academic_year} enrollment"
            )));
        }

        let now = Utc::now().naive_utc();
        let created = semester_enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            semester: Set(semester),
            academic_year: Set(academic_year.to_string()),
            status: Set(TermStatus::Open),
            total_credits: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!(
            "{} opened semester enrollment {} for student {student_id}",
            caller.subject, created.id
        );
        Ok(created)
    }

    /// Registers the enrollment in a section
    pub async fn enroll_in_section(
        db: &DatabaseConnection,
        caller: &Caller,
        semester_enrollment_id: Uuid,
        section_id: Uuid,
    ) -> Result<enrolled_courses::Model, ServiceError> {
        Self::authorize(caller)?;

        let txn = db.begin().await?;

        let enrollment = semester_enrollments::Entity::find_by_id(semester_enrollment_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::not_found(
                "semester enrollment",
                semester_enrollment_id,
            ))?;
        if enrollment.status == TermStatus::Closed {
            return Err(ServiceError::Validation(format!(
                "semester enrollment {semester_enrollment_id} is closed"
            )));
        }

        course_sections::Entity::find_by_id(section_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::not_found("section", section_id))?;

        let active = enrolled_courses::Entity::find()
            .filter(enrolled_courses::Column::SemesterEnrollmentId.eq(semester_enrollment_id))
            .filter(enrolled_courses::Column::SectionId.eq(section_id))
            .filter(
                enrolled_courses::Column::Status
                    .is_in([EnrollmentStatus::Enrolled, EnrollmentStatus::Completed]),
            )
            .count(&txn)
            .await?;
        if active > 0 {
            return Err(ServiceError::Validation(format!(
                "already registered in section {section_id}"
            )));
        }

        let now = Utc::now().naive_utc();
        let created = enrolled_courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            semester_enrollment_id: Set(semester_enrollment_id),
            section_id: Set(section_id),
            status: Set(EnrollmentStatus::Enrolled),
            grade: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "{} enrolled {semester_enrollment_id} in section {section_id}",
            caller.subject
        );
        Ok(created)
    }

    /// Moves a registration out of `enrolled` (drop, withdraw, complete)
    pub async fn change_status<C>(
        conn: &C,
        caller: &Caller,
        enrolled_course_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<enrolled_courses::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        Self::authorize(caller)?;

        let existing = Self::find_enrolled_course(conn, enrolled_course_id).await?;

        if !existing.status.can_transition_to(status) {
            return Err(ServiceError::Validation(format!(
                "cannot change status from {} to {status}",
                existing.status
            )));
        }

        let mut active = existing.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(conn).await?;

        info!(
            "{} set enrolled course {enrolled_course_id} to {status}",
            caller.subject
        );
        Ok(updated)
    }

    /// Changes a registration's status and refreshes its term's credit load.
    ///
    /// Both writes share one transaction: if the recompute fails the status
    /// change is rolled back too.
    pub async fn change_status_and_recompute(
        db: &DatabaseConnection,
        caller: &Caller,
        enrolled_course_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<(enrolled_courses::Model, i32), ServiceError> {
        let txn = db.begin().await?;

        let updated = Self::change_status(&txn, caller, enrolled_course_id, status).await?;
        let total_credits =
            CreditService::recompute_in(&txn, caller, updated.semester_enrollment_id).await?;

        txn.commit().await?;

        Ok((updated, total_credits))
    }

    /// Records a grade on a completed registration
    pub async fn record_grade(
        db: &DatabaseConnection,
        caller: &Caller,
        enrolled_course_id: Uuid,
        grade: &str,
    ) -> Result<enrolled_courses::Model, ServiceError> {
        if !caller.can_record_grades() {
            return Err(ServiceError::Forbidden(format!(
                "{} may not record grades",
                caller.subject
            )));
        }

        let grade = grade.trim();
        if grade.is_empty() {
            return Err(ServiceError::Validation("grade must not be blank".into()));
        }

        let existing = Self::find_enrolled_course(db, enrolled_course_id).await?;
        if existing.status != EnrollmentStatus::Completed {
            return Err(ServiceError::Validation(format!(
                "only completed courses can be graded, this one is {}",
                existing.status
            )));
        }

        let mut active = existing.into_active_model();
        active.grade = Set(Some(grade.to_string()));
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(db).await?;

        info!(
            "{} graded enrolled course {enrolled_course_id}",
            caller.subject
        );
        Ok(updated)
    }

    /// Deletes an ungraded registration. Graded history is never deleted.
    pub async fn delete_enrolled_course(
        db: &DatabaseConnection,
        caller: &Caller,
        enrolled_course_id: Uuid,
    ) -> Result<(), ServiceError> {
        Self::authorize(caller)?;

        let existing = Self::find_enrolled_course(db, enrolled_course_id).await?;

        if existing.grade.is_some() {
            return Err(ServiceError::Validation(format!(
                "enrolled course {enrolled_course_id} has a grade and cannot be deleted"
            )));
        }

        existing.delete(db).await?;

        info!(
            "{} deleted enrolled course {enrolled_course_id}",
            caller.subject
        );
        Ok(())
    }

    pub async fn enrolled_courses<C>(
        conn: &C,
        semester_enrollment_id: Uuid,
    ) -> Result<Vec<enrolled_courses::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let records = enrolled_courses::Entity::find()
            .filter(enrolled_courses::Column::SemesterEnrollmentId.eq(semester_enrollment_id))
            .all(conn)
            .await?;

        Ok(records)
    }

    fn authorize(caller: &Caller) -> Result<(), ServiceError> {
        if caller.can_manage_enrollments() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "{} may not manage enrollments",
                caller.subject
            )))
        }
    }

    async fn find_enrolled_course<C>(
        conn: &C,
        enrolled_course_id: Uuid,
    ) -> Result<enrolled_courses::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        enrolled_courses::Entity::find_by_id(enrolled_course_id)
            .one(conn)
            .await?
            .ok_or(ServiceError::not_found("enrolled course", enrolled_course_id))
    }
}
