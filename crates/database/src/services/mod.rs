pub mod course;
pub mod credit;
pub mod enrollment;
pub mod prerequisite;
pub mod schedule;
