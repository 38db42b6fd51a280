pub mod enrollment;
pub mod prerequisite;
pub mod schedule;
