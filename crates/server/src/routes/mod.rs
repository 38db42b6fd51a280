pub mod auth;
pub mod enrollment;
pub mod health;
pub mod prerequisite;
pub mod schedule;
