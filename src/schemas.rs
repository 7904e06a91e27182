use std::path::PathBuf;

use common::JobFilter;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::{
    applications::{
        ApplicationResponse, ApplicationWithStudent, ApplyForm, UpdateApplicationRequest,
        UserApplicationResponse,
    },
    auth::{CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest, RegisteredUser},
    employers::UpdateEmployerRequest,
    jobs::{AdminJobResponse, CreateJobRequest, EmployerSummary, JobResponse, UpdateJobRequest},
    students::UpdateStudentRequest,
    teams::{CreateTeamRequest, TeamResponse, UpdateTeamRequest},
    tracker::{CreateTrackerRequest, TrackerResponse, UpdateTrackerRequest},
    users::UserResponse,
};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Directory receiving uploaded resumes
    pub upload_dir: PathBuf,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::register,
        crate::handlers::auth::get_current_user,
        crate::handlers::users::get_all_users,
        crate::handlers::users::delete_user,
        crate::handlers::jobs::list_jobs,
        crate::handlers::jobs::create_job,
        crate::handlers::jobs::post_job,
        crate::handlers::jobs::get_job,
        crate::handlers::jobs::update_job,
        crate::handlers::jobs::delete_job,
        crate::handlers::jobs::filter_jobs,
        crate::handlers::jobs::search_jobs,
        crate::handlers::jobs::admin_jobs,
        crate::handlers::employers::update_employer,
        crate::handlers::students::list_students,
        crate::handlers::students::update_student,
        crate::handlers::applications::apply,
        crate::handlers::applications::get_user_applications,
        crate::handlers::applications::withdraw_application,
        crate::handlers::applications::get_application,
        crate::handlers::applications::update_application,
        crate::handlers::applications::delete_application,
        crate::handlers::applications::get_employer_applications,
        crate::handlers::teams::list_teams,
        crate::handlers::teams::create_team,
        crate::handlers::teams::get_team,
        crate::handlers::teams::update_team,
        crate::handlers::teams::delete_team,
        crate::handlers::tracker::list_trackers,
        crate::handlers::tracker::create_tracker,
        crate::handlers::tracker::get_tracker,
        crate::handlers::tracker::update_tracker,
        crate::handlers::tracker::delete_tracker,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RegisteredUser,
            CurrentUserResponse,
            UserResponse,
            CreateJobRequest,
            UpdateJobRequest,
            JobResponse,
            JobFilter,
            EmployerSummary,
            AdminJobResponse,
            UpdateEmployerRequest,
            UpdateStudentRequest,
            ApplyForm,
            ApplicationResponse,
            ApplicationWithStudent,
            UserApplicationResponse,
            UpdateApplicationRequest,
            CreateTeamRequest,
            UpdateTeamRequest,
            TeamResponse,
            CreateTrackerRequest,
            UpdateTrackerRequest,
            TrackerResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, logout and registration"),
        (name = "users", description = "User listing and deletion"),
        (name = "jobs", description = "Job postings and search"),
        (name = "admin", description = "Administrator views"),
        (name = "employers", description = "Employer profiles"),
        (name = "students", description = "Student profiles"),
        (name = "applications", description = "Job applications"),
        (name = "teams", description = "Hiring team registry"),
        (name = "tracker", description = "Work-study position tracker"),
    ),
    info(
        title = "Work-Study Job Board API",
        description = "Job board for work-study positions: students apply, employers post, admins review",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
