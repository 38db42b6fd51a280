use crate::{
    entities::{course_sections, courses, enrolled_courses, semester_enrollments},
    error::ServiceError,
};
use chrono::Utc;
use log::{debug, info, warn};
use models::{
    caller::Caller,
    credit_load::{CreditLine, total_credits},
    status::EnrollmentStatus,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbBackend, EntityTrait, IntoActiveModel, JoinType, QueryFilter, QuerySelect, RelationTrait,
    TransactionTrait,
};
use uuid::Uuid;

pub struct CreditService;

impl CreditService {
    /// Recomputes and stores the credit load of a semester enrollment.
    ///
    /// Nothing is written unless every registration resolves to a course.
    /// Calling this twice without an intervening enrollment change returns the
    /// same value.
    pub async fn recompute_total_credits(
        db: &DatabaseConnection,
        caller: &Caller,
        semester_enrollment_id: Uuid,
    ) -> Result<i32, ServiceError> {
        let txn = db.begin().await?;
        let total = Self::recompute_in(&txn, caller, semester_enrollment_id).await?;
        txn.commit().await?;

        Ok(total)
    }

    /// Recompute inside a transaction the caller owns, so the new total
    /// commits or rolls back together with whatever changed the enrollment
    pub async fn recompute_in<C>(
        conn: &C,
        caller: &Caller,
        semester_enrollment_id: Uuid,
    ) -> Result<i32, ServiceError>
    where
        C: ConnectionTrait,
    {
        if !caller.can_manage_enrollments() {
            return Err(ServiceError::Forbidden(format!(
                "{} may not recompute credit loads",
                caller.subject
            )));
        }

        let mut query = semester_enrollments::Entity::find_by_id(semester_enrollment_id);
        if conn.get_database_backend() == DbBackend::Postgres {
            // Concurrent recomputes of the same term serialize on the row
            query = query.lock_exclusive();
        }
        let enrollment = query.one(conn).await?.ok_or(ServiceError::not_found(
            "semester enrollment",
            semester_enrollment_id,
        ))?;

        let lines = Self::credit_lines(conn, semester_enrollment_id).await?;
        let total = total_credits(&lines).map_err(|e| {
            warn!("Aborted credit recompute for {semester_enrollment_id}: {e}");
            ServiceError::Integrity(e.to_string())
        })?;

        debug!(
            "Semester enrollment {semester_enrollment_id}: {} registration(s), {} -> {} credits",
            lines.len(),
            enrollment.total_credits,
            total
        );

        if enrollment.total_credits != total {
            let mut active = enrollment.into_active_model();
            active.total_credits = Set(total);
            active.updated_at = Set(Utc::now().naive_utc());
            active.update(conn).await?;
        }

        info!(
            "{} recomputed credits for {semester_enrollment_id}: {total}",
            caller.subject
        );
        Ok(total)
    }

    /// Each registration of the enrollment with its course's credit value.
    ///
    /// Left joins keep registrations whose section or course is gone, so they
    /// surface as unresolved instead of silently disappearing from the sum.
    async fn credit_lines<C>(
        conn: &C,
        semester_enrollment_id: Uuid,
    ) -> Result<Vec<CreditLine<Uuid>>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let rows: Vec<(Uuid, EnrollmentStatus, Option<i32>)> = enrolled_courses::Entity::find()
            .select_only()
            .column(enrolled_courses::Column::Id)
            .column(enrolled_courses::Column::Status)
            .column(courses::Column::Credits)
            .join(
                JoinType::LeftJoin,
                enrolled_courses::Relation::Section.def(),
            )
            .join(JoinType::LeftJoin, course_sections::Relation::Course.def())
            .filter(enrolled_courses::Column::SemesterEnrollmentId.eq(semester_enrollment_id))
            .into_tuple()
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(enrolled_course, status, credits)| CreditLine {
                enrolled_course,
                status,
                credits,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        insert_enrolled_course, insert_semester_enrollment, registrar, setup_db, student,
        total_credits_of,
    };

    #[tokio::test]
    async fn test_counts_enrolled_and_completed_only() {
        let db = setup_db().await;
        let enrollment = insert_semester_enrollment(&db).await;

        insert_enrolled_course(&db, enrollment.id, "MATH101", 3, EnrollmentStatus::Enrolled).await;
        insert_enrolled_course(&db, enrollment.id, "ENG101", 4, EnrollmentStatus::Completed).await;
        insert_enrolled_course(&db, enrollment.id, "HIST101", 3, EnrollmentStatus::Dropped).await;
        insert_enrolled_course(&db, enrollment.id, "ART101", 2, EnrollmentStatus::Withdrawn).await;

        let total = CreditService::recompute_total_credits(&db, &registrar(), enrollment.id)
            .await
            .unwrap();

        assert_eq!(total, 7);
        assert_eq!(total_credits_of(&db, enrollment.id).await, 7);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let db = setup_db().await;
        let enrollment = insert_semester_enrollment(&db).await;
        insert_enrolled_course(&db, enrollment.id, "PHYS101", 4, EnrollmentStatus::Enrolled).await;

        let first = CreditService::recompute_total_credits(&db, &registrar(), enrollment.id)
            .await
            .unwrap();
        let second = CreditService::recompute_total_credits(&db, &registrar(), enrollment.id)
            .await
            .unwrap();

        assert_eq!(first, 4);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_other_enrollments_are_ignored() {
        let db = setup_db().await;
        let mine = insert_semester_enrollment(&db).await;
        let theirs = insert_semester_enrollment(&db).await;
        insert_enrolled_course(&db, mine.id, "CHEM101", 3, EnrollmentStatus::Enrolled).await;
        insert_enrolled_course(&db, theirs.id, "BIO101", 5, EnrollmentStatus::Enrolled).await;

        let total = CreditService::recompute_total_credits(&db, &registrar(), mine.id)
            .await
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(total_credits_of(&db, theirs.id).await, 0);
    }

    #[tokio::test]
    async fn test_dangling_section_aborts_without_writing() {
        let db = setup_db().await;
        let enrollment = insert_semester_enrollment(&db).await;
        insert_enrolled_course(&db, enrollment.id, "MATH101", 3, EnrollmentStatus::Enrolled).await;
        CreditService::recompute_total_credits(&db, &registrar(), enrollment.id)
            .await
            .unwrap();

        // Simulate a registration whose section vanished behind the store's back
        db.execute_unprepared("PRAGMA foreign_keys = OFF")
            .await
            .unwrap();
        let now = Utc::now().naive_utc();
        enrolled_courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            semester_enrollment_id: Set(enrollment.id),
            section_id: Set(Uuid::new_v4()),
            status: Set(EnrollmentStatus::Enrolled),
            grade: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        let result = CreditService::recompute_total_credits(&db, &registrar(), enrollment.id).await;

        assert!(matches!(result, Err(ServiceError::Integrity(_))));
        assert_eq!(total_credits_of(&db, enrollment.id).await, 3);
    }

    #[tokio::test]
    async fn test_empty_enrollment_and_missing_enrollment() {
        let db = setup_db().await;
        let enrollment = insert_semester_enrollment(&db).await;

        assert_eq!(
            CreditService::recompute_total_credits(&db, &registrar(), enrollment.id)
                .await
                .unwrap(),
            0
        );

        let missing =
            CreditService::recompute_total_credits(&db, &registrar(), Uuid::new_v4()).await;
        assert!(matches!(
            missing,
            Err(ServiceError::NotFound {
                entity: "semester enrollment",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_students_cannot_recompute() {
        let db = setup_db().await;
        let enrollment = insert_semester_enrollment(&db).await;
        insert_enrolled_course(&db, enrollment.id, "MATH101", 3, EnrollmentStatus::Enrolled).await;

        let result = CreditService::recompute_total_credits(&db, &student(), enrollment.id).await;

        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
        assert_eq!(total_credits_of(&db, enrollment.id).await, 0);
    }
}
