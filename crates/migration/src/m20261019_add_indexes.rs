use crate::m20261019_create_all_tables::{
    CoursePrerequisites, CourseSections, EnrolledCourses, Schedules, SemesterEnrollments,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // At most one edge per ordered (course, prerequisite) pair; also serves
        // outgoing-edge lookups during cycle detection
        manager
            .create_index(
                Index::create()
                    .name("idx_course_prerequisites_edge")
                    .table(CoursePrerequisites::Table)
                    .col(CoursePrerequisites::CourseId)
                    .col(CoursePrerequisites::PrerequisiteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_prerequisites_prerequisite_id")
                    .table(CoursePrerequisites::Table)
                    .col(CoursePrerequisites::PrerequisiteId)
                    .to_owned(),
            )
            .await?;

        // Conflict detection filters on room and day, then on the interval bounds
        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_room_day_start")
                    .table(Schedules::Table)
                    .col(Schedules::Room)
                    .col(Schedules::Day)
                    .col(Schedules::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_day_start")
                    .table(Schedules::Table)
                    .col(Schedules::Day)
                    .col(Schedules::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_section_id")
                    .table(Schedules::Table)
                    .col(Schedules::SectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_sections_course_id")
                    .table(CourseSections::Table)
                    .col(CourseSections::CourseId)
                    .to_owned(),
            )
            .await?;

        // One record per student per term
        manager
            .create_index(
                Index::create()
                    .name("idx_semester_enrollments_student_term")
                    .table(SemesterEnrollments::Table)
                    .col(SemesterEnrollments::StudentId)
                    .col(SemesterEnrollments::Semester)
                    .col(SemesterEnrollments::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Indexes on enrolled_courses for credit aggregation joins
        manager
            .create_index(
                Index::create()
                    .name("idx_enrolled_courses_semester_enrollment_id")
                    .table(EnrolledCourses::Table)
                    .col(EnrolledCourses::SemesterEnrollmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrolled_courses_section_id")
                    .table(EnrolledCourses::Table)
                    .col(EnrolledCourses::SectionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_enrolled_courses_section_id",
            "idx_enrolled_courses_semester_enrollment_id",
            "idx_semester_enrollments_student_term",
            "idx_course_sections_course_id",
            "idx_schedules_section_id",
            "idx_schedules_day_start",
            "idx_schedules_room_day_start",
            "idx_course_prerequisites_prerequisite_id",
            "idx_course_prerequisites_edge",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
