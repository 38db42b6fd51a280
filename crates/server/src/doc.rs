use crate::{
    dtos::{
        enrollment::{ChangeStatusRequest, CreditsResponse, EnrolledCourseResponse},
        prerequisite::{
            AddPrerequisiteRequest, CourseSummary, PrerequisiteEdgeResponse, PrerequisitesResponse,
        },
        schedule::{CreateScheduleRequest, ScheduleResponse, UpdateScheduleRequest},
    },
    error::ErrorResponse,
    routes::{auth, enrollment, health, prerequisite, schedule},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::me,
        schedule::create_schedule,
        schedule::update_schedule,
        schedule::delete_schedule,
        schedule::find_conflicts,
        schedule::section_schedules,
        prerequisite::add_prerequisite,
        prerequisite::get_prerequisites,
        prerequisite::remove_prerequisite,
        enrollment::recompute_credits,
        enrollment::change_status
    ),
    components(schemas(
        ErrorResponse,
        CreateScheduleRequest,
        UpdateScheduleRequest,
        ScheduleResponse,
        AddPrerequisiteRequest,
        PrerequisiteEdgeResponse,
        PrerequisitesResponse,
        CourseSummary,
        ChangeStatusRequest,
        CreditsResponse,
        EnrolledCourseResponse
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Authentication related endpoints"),
        (name = "Schedules", description = "Room bookings and conflict detection"),
        (name = "Prerequisites", description = "Prerequisite graph maintenance"),
        (name = "Enrollments", description = "Registration status and credit load"),
    ),
    info(
        title = "Academic Records API",
        version = "0.1.0",
        description = "Scheduling, prerequisite and credit-load rules for academic records",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
