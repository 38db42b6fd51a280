use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(
                        ColumnDef::new(Courses::Credits)
                            .integer()
                            .not_null()
                            .check(Expr::col(Courses::Credits).gte(0)),
                    )
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(ColumnDef::new(Courses::ProgramId).uuid())
                    .col(ColumnDef::new(Courses::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create course_prerequisites table (directed edges between courses)
        manager
            .create_table(
                Table::create()
                    .table(CoursePrerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoursePrerequisites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::PrerequisiteId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .check(
                        Expr::col(CoursePrerequisites::CourseId)
                            .ne(Expr::col(CoursePrerequisites::PrerequisiteId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_prerequisites-course_id")
                            .from(CoursePrerequisites::Table, CoursePrerequisites::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_prerequisites-prerequisite_id")
                            .from(
                                CoursePrerequisites::Table,
                                CoursePrerequisites::PrerequisiteId,
                            )
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_sections table
        manager
            .create_table(
                Table::create()
                    .table(CourseSections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseSections::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseSections::CourseId).uuid().not_null())
                    .col(ColumnDef::new(CourseSections::SectionCode).string().not_null())
                    .col(ColumnDef::new(CourseSections::Semester).string().not_null())
                    .col(ColumnDef::new(CourseSections::AcademicYear).string().not_null())
                    .col(ColumnDef::new(CourseSections::FacultyId).uuid())
                    .col(ColumnDef::new(CourseSections::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(CourseSections::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_sections-course_id")
                            .from(CourseSections::Table, CourseSections::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create schedules table
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Schedules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Schedules::Day).string().not_null())
                    .col(ColumnDef::new(Schedules::StartTime).time().not_null())
                    .col(ColumnDef::new(Schedules::EndTime).time().not_null())
                    .col(ColumnDef::new(Schedules::Room).string().not_null())
                    .col(
                        ColumnDef::new(Schedules::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Schedules::CourseId).uuid())
                    .col(ColumnDef::new(Schedules::SectionId).uuid())
                    .col(ColumnDef::new(Schedules::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Schedules::UpdatedAt).date_time().not_null())
                    // Intervals are half-open and never cross midnight
                    .check(Expr::col(Schedules::StartTime).lt(Expr::col(Schedules::EndTime)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-section_id")
                            .from(Schedules::Table, Schedules::SectionId)
                            .to(CourseSections::Table, CourseSections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-course_id")
                            .from(Schedules::Table, Schedules::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create semester_enrollments table
        manager
            .create_table(
                Table::create()
                    .table(SemesterEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SemesterEnrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SemesterEnrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(SemesterEnrollments::Semester).string().not_null())
                    .col(
                        ColumnDef::new(SemesterEnrollments::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::TotalCredits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterEnrollments::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrolled_courses table, owned by semester_enrollments
        manager
            .create_table(
                Table::create()
                    .table(EnrolledCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrolledCourses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrolledCourses::SemesterEnrollmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EnrolledCourses::SectionId).uuid().not_null())
                    .col(ColumnDef::new(EnrolledCourses::Status).string().not_null())
                    .col(ColumnDef::new(EnrolledCourses::Grade).string())
                    .col(ColumnDef::new(EnrolledCourses::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(EnrolledCourses::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrolled_courses-semester_enrollment_id")
                            .from(
                                EnrolledCourses::Table,
                                EnrolledCourses::SemesterEnrollmentId,
                            )
                            .to(SemesterEnrollments::Table, SemesterEnrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrolled_courses-section_id")
                            .from(EnrolledCourses::Table, EnrolledCourses::SectionId)
                            .to(CourseSections::Table, CourseSections::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(EnrolledCourses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SemesterEnrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseSections::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CoursePrerequisites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Courses {
    Table,
    Id,
    Code,
    Title,
    Credits,
    Description,
    ProgramId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum CoursePrerequisites {
    Table,
    Id,
    CourseId,
    PrerequisiteId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum CourseSections {
    Table,
    Id,
    CourseId,
    SectionCode,
    Semester,
    AcademicYear,
    FacultyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Schedules {
    Table,
    Id,
    Day,
    StartTime,
    EndTime,
    Room,
    Status,
    CourseId,
    SectionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum SemesterEnrollments {
    Table,
    Id,
    StudentId,
    Semester,
    AcademicYear,
    Status,
    TotalCredits,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum EnrolledCourses {
    Table,
    Id,
    SemesterEnrollmentId,
    SectionId,
    Status,
    Grade,
    CreatedAt,
    UpdatedAt,
}
