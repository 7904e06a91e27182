use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use common::converters::{display_name, parse_form_int};
use model::entities::{
    application::{self, ApplicationStatus},
    job, user,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::handlers::jobs::JobResponse;
use crate::helpers::uploads::save_resume;
use crate::schemas::{ApiResponse, AppState};

/// Largest accepted `/apply` request body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application response model; resume bytes are never echoed back
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: i32,
    pub student_id: i32,
    pub job_id: i32,
    /// `pending`, `accepted` or `rejected`
    pub status: String,
    pub email_address: String,
    pub year_of_graduation: i32,
    pub candidate_statement: String,
    pub has_resume: bool,
}

impl From<application::Model> for ApplicationResponse {
    fn from(model: application::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            job_id: model.job_id,
            status: model.status.as_str().to_string(),
            email_address: model.email_address,
            year_of_graduation: model.year_of_graduation,
            candidate_statement: model.candidate_statement,
            has_resume: model.resume.is_some(),
        }
    }
}

/// An application as shown to reviewers, with the applicant's name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationWithStudent {
    pub application: ApplicationResponse,
    pub student_name: String,
}

impl ApplicationWithStudent {
    pub fn new(model: application::Model, student: Option<user::Model>) -> Self {
        Self {
            student_name: student
                .map(|s| display_name(&s.first_name, &s.last_name))
                .unwrap_or_default(),
            application: ApplicationResponse::from(model),
        }
    }
}

/// One of the caller's applications with the job it targets
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserApplicationResponse {
    pub application: ApplicationResponse,
    pub job: Option<JobResponse>,
}

/// Request body for reviewing an application
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateApplicationRequest {
    /// `pending`, `accepted` or `rejected`, case-insensitive
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Multipart form body of `POST /apply`, as documented in OpenAPI
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ApplyForm {
    job_id: i32,
    email_address: String,
    year_of_graduation: i32,
    candidate_statement: String,
    #[schema(value_type = Option<String>, format = Binary)]
    resume: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
struct RawApplyForm {
    job_id: Option<String>,
    email_address: Option<String>,
    year_of_graduation: Option<String>,
    candidate_statement: Option<String>,
    resume: Option<(String, Vec<u8>)>,
}

fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("Field '{}' is required", field))),
    }
}

async fn read_apply_form(mut multipart: Multipart) -> ApiResult<RawApplyForm> {
    let mut form = RawApplyForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jobId" | "job_id" => form.job_id = Some(field.text().await?),
            "emailAddress" | "email_address" => form.email_address = Some(field.text().await?),
            "yearOfGraduation" | "year_of_graduation" => {
                form.year_of_graduation = Some(field.text().await?)
            }
            "candidateStatement" | "candidate_statement" => {
                form.candidate_statement = Some(field.text().await?)
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    debug!("Ignoring empty resume upload");
                } else {
                    form.resume = Some((filename, bytes.to_vec()));
                }
            }
            other => debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    Ok(form)
}

/// Apply to a job (multipart form with optional resume file)
#[utoipa::path(
    post,
    path = "/apply",
    tag = "applications",
    request_body(content = ApplyForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Application submitted", body = ApiResponse<ApplicationResponse>),
        (status = 400, description = "Missing or invalid form field", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user, multipart), fields(user_id = user.id))]
pub async fn apply(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ApplicationResponse>>)> {
    trace!("Entering apply function");
    let multipart = multipart.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let form = read_apply_form(multipart).await?;

    let job_id = parse_form_int("jobId", &required(form.job_id, "jobId")?)
        .map_err(ApiError::BadRequest)?;
    let year_of_graduation =
        parse_form_int("yearOfGraduation", &required(form.year_of_graduation, "yearOfGraduation")?)
            .map_err(ApiError::BadRequest)?;
    let email_address = required(form.email_address, "emailAddress")?;
    let candidate_statement = required(form.candidate_statement, "candidateStatement")?;

    if job::Entity::find_by_id(job_id).one(&state.db).await?.is_none() {
        warn!("Application for missing job {}", job_id);
        return Err(ApiError::not_found("Job not found"));
    }

    let resume = match form.resume {
        Some((filename, bytes)) => {
            save_resume(&state.upload_dir, user.id, &filename, &bytes).await?;
            Some(bytes)
        }
        None => None,
    };

    let new_application = application::ActiveModel {
        student_id: Set(user.id),
        job_id: Set(job_id),
        status: Set(ApplicationStatus::Pending),
        email_address: Set(email_address),
        year_of_graduation: Set(year_of_graduation),
        candidate_statement: Set(candidate_statement),
        resume: Set(resume),
        ..Default::default()
    };

    let created = new_application.insert(&state.db).await?;
    info!("Application {} submitted by user {} for job {}", created.id, user.id, job_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ApplicationResponse::from(created),
            message: "Application submitted successfully".to_string(),
            success: true,
        }),
    ))
}

/// The caller's own applications, each with its job
#[utoipa::path(
    get,
    path = "/user-applications",
    tag = "applications",
    responses(
        (status = 200, description = "Applications retrieved", body = ApiResponse<Vec<UserApplicationResponse>>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_user_applications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<UserApplicationResponse>>>> {
    trace!("Entering get_user_applications function");

    let rows = application::Entity::find()
        .filter(application::Column::StudentId.eq(user.id))
        .order_by_asc(application::Column::Id)
        .find_also_related(job::Entity)
        .all(&state.db)
        .await?;

    info!("User {} has {} applications", user.id, rows.len());
    Ok(Json(ApiResponse {
        data: rows
            .into_iter()
            .map(|(app, job)| UserApplicationResponse {
                application: ApplicationResponse::from(app),
                job: job.map(JobResponse::from),
            })
            .collect(),
        message: "Applications retrieved successfully".to_string(),
        success: true,
    }))
}

/// Withdraw one of the caller's applications
#[utoipa::path(
    delete,
    path = "/user-applications/{application_id}",
    tag = "applications",
    params(
        ("application_id" = i32, Path, description = "Application ID"),
    ),
    responses(
        (status = 200, description = "Application withdrawn", body = ApiResponse<String>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Application belongs to another student", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn withdraw_application(
    Path(application_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering withdraw_application function for application_id: {}", application_id);

    let Some(existing) = application::Entity::find_by_id(application_id).one(&state.db).await? else {
        warn!("Application with ID {} not found for withdrawal", application_id);
        return Err(ApiError::not_found("Application not found"));
    };
    user.require_self_or_admin(existing.student_id)?;

    application::Entity::delete_by_id(application_id).exec(&state.db).await?;
    info!("Application {} withdrawn by user {}", application_id, user.id);

    Ok(Json(ApiResponse {
        data: format!("Application {} withdrawn", application_id),
        message: "Application withdrawn successfully".to_string(),
        success: true,
    }))
}

/// Get a specific application by ID
#[utoipa::path(
    get,
    path = "/applications/{application_id}",
    tag = "applications",
    params(
        ("application_id" = i32, Path, description = "Application ID"),
    ),
    responses(
        (status = 200, description = "Application retrieved", body = ApiResponse<ApplicationResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_application(
    Path(application_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<ApplicationResponse>>> {
    trace!("Entering get_application function for application_id: {}", application_id);

    let Some(model) = application::Entity::find_by_id(application_id).one(&state.db).await? else {
        warn!("Application with ID {} not found", application_id);
        return Err(ApiError::not_found("Application not found"));
    };

    Ok(Json(ApiResponse {
        data: ApplicationResponse::from(model),
        message: "Application retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update an application's review status
#[utoipa::path(
    put,
    path = "/applications/{application_id}",
    tag = "applications",
    params(
        ("application_id" = i32, Path, description = "Application ID"),
    ),
    request_body = UpdateApplicationRequest,
    responses(
        (status = 200, description = "Application updated", body = ApiResponse<ApplicationResponse>),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn update_application(
    Path(application_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<UpdateApplicationRequest>,
) -> ApiResult<Json<ApiResponse<ApplicationResponse>>> {
    trace!("Entering update_application function for application_id: {}", application_id);

    let status = ApplicationStatus::from_label(&request.status).ok_or_else(|| {
        ApiError::bad_request("status must be one of pending, accepted, rejected")
    })?;

    let Some(existing) = application::Entity::find_by_id(application_id).one(&state.db).await? else {
        warn!("Application with ID {} not found for update", application_id);
        return Err(ApiError::not_found("Application not found"));
    };

    let mut active: application::ActiveModel = existing.into();
    active.status = Set(status);
    let updated = active.update(&state.db).await?;

    info!("Application {} set to {} by user {}", application_id, status.as_str(), user.id);
    Ok(Json(ApiResponse {
        data: ApplicationResponse::from(updated),
        message: "Application updated successfully".to_string(),
        success: true,
    }))
}

/// Delete an application
#[utoipa::path(
    delete,
    path = "/applications/{application_id}",
    tag = "applications",
    params(
        ("application_id" = i32, Path, description = "Application ID"),
    ),
    responses(
        (status = 200, description = "Application deleted", body = ApiResponse<String>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_application(
    Path(application_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering delete_application function for application_id: {}", application_id);

    let result = application::Entity::delete_by_id(application_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Application with ID {} not found for deletion", application_id);
        return Err(ApiError::not_found("Application not found"));
    }

    info!("Application {} deleted by user {}", application_id, user.id);
    Ok(Json(ApiResponse {
        data: format!("Application {} deleted", application_id),
        message: "Application deleted successfully".to_string(),
        success: true,
    }))
}

/// Applications received on every job the caller posted
#[utoipa::path(
    get,
    path = "/applications",
    tag = "applications",
    responses(
        (status = 200, description = "Incoming applications", body = ApiResponse<Vec<ApplicationWithStudent>>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_employer_applications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<ApplicationWithStudent>>>> {
    trace!("Entering get_employer_applications function");

    let job_ids: Vec<i32> = job::Entity::find()
        .filter(job::Column::EmployerId.eq(user.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|j| j.id)
        .collect();
    debug!("User {} owns {} jobs", user.id, job_ids.len());

    let rows = if job_ids.is_empty() {
        Vec::new()
    } else {
        application::Entity::find()
            .filter(application::Column::JobId.is_in(job_ids))
            .order_by_asc(application::Column::Id)
            .find_also_related(user::Entity)
            .all(&state.db)
            .await?
    };

    info!("User {} has {} incoming applications", user.id, rows.len());
    Ok(Json(ApiResponse {
        data: rows
            .into_iter()
            .map(|(app, student)| ApplicationWithStudent::new(app, student))
            .collect(),
        message: "Applications retrieved successfully".to_string(),
        success: true,
    }))
}
