pub mod course_prerequisites;
pub mod course_sections;
pub mod courses;
pub mod enrolled_courses;
pub mod schedules;
pub mod semester_enrollments;
