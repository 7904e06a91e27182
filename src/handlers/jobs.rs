use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{
    converters::{display_name, int_or_string, option_int_or_string},
    HiringSemesters, JobFilter,
};
use model::entities::{application, job, user};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidJson, ValidQuery};
use crate::handlers::applications::ApplicationWithStudent;
use crate::schemas::{ApiResponse, AppState};

/// Request body for posting a job
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_student_range"))]
pub struct CreateJobRequest {
    /// Owner of the job; defaults to the caller. Posting for someone else requires admin.
    #[serde(default, alias = "employer_id", deserialize_with = "option_int_or_string")]
    pub employer_id: Option<i32>,
    #[serde(alias = "positionTitle")]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    #[serde(alias = "manager_name")]
    #[validate(length(min = 1, message = "managerName is required"))]
    pub manager_name: String,
    #[serde(alias = "manager_email")]
    #[validate(email(message = "managerEmail must be a valid address"))]
    pub manager_email: String,
    /// A list of semesters or an already joined string
    #[serde(alias = "hiringSemester", alias = "hiring_semesters")]
    #[schema(value_type = Vec<String>)]
    #[validate(custom(function = "validate_semesters"))]
    pub hiring_semesters: HiringSemesters,
    #[serde(alias = "min_students", deserialize_with = "int_or_string")]
    #[validate(range(min = 0, message = "minStudents must not be negative"))]
    pub min_students: i32,
    #[serde(alias = "max_students", deserialize_with = "int_or_string")]
    #[validate(range(min = 0, message = "maxStudents must not be negative"))]
    pub max_students: i32,
    #[serde(alias = "role_location")]
    #[validate(length(min = 1, message = "roleLocation is required"))]
    pub role_location: String,
    #[serde(alias = "type_of_work")]
    #[validate(length(min = 1, message = "typeOfWork is required"))]
    pub type_of_work: String,
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(alias = "brief_description")]
    #[validate(length(min = 1, message = "briefDescription is required"))]
    pub brief_description: String,
    #[serde(default, alias = "more_details")]
    pub more_details: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(alias = "application_deadline")]
    #[schema(value_type = String, format = Date)]
    pub application_deadline: NaiveDate,
}

fn validate_create_student_range(request: &CreateJobRequest) -> Result<(), ValidationError> {
    check_student_range(request.min_students, request.max_students)
}

fn validate_semesters(semesters: &HiringSemesters) -> Result<(), ValidationError> {
    if semesters.is_empty() {
        let mut err = ValidationError::new("hiring_semesters");
        err.message = Some("hiringSemesters must name at least one semester".into());
        return Err(err);
    }
    Ok(())
}

fn check_student_range(min: i32, max: i32) -> Result<(), ValidationError> {
    if min > max {
        let mut err = ValidationError::new("student_range");
        err.message = Some("minStudents must not exceed maxStudents".into());
        return Err(err);
    }
    Ok(())
}

/// Request body for updating a job; only supplied fields change
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateJobRequest {
    #[serde(default, alias = "positionTitle")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub department: Option<String>,
    #[serde(default, alias = "manager_name")]
    pub manager_name: Option<String>,
    #[serde(default, alias = "manager_email")]
    #[validate(email)]
    pub manager_email: Option<String>,
    #[serde(default, alias = "hiringSemester", alias = "hiring_semesters")]
    #[schema(value_type = Option<Vec<String>>)]
    #[validate(custom(function = "validate_semesters"))]
    pub hiring_semesters: Option<HiringSemesters>,
    #[serde(default, alias = "min_students", deserialize_with = "option_int_or_string")]
    #[validate(range(min = 0))]
    pub min_students: Option<i32>,
    #[serde(default, alias = "max_students", deserialize_with = "option_int_or_string")]
    #[validate(range(min = 0))]
    pub max_students: Option<i32>,
    #[serde(default, alias = "role_location")]
    pub role_location: Option<String>,
    #[serde(default, alias = "type_of_work")]
    pub type_of_work: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(default, alias = "brief_description")]
    pub brief_description: Option<String>,
    #[serde(default, alias = "more_details")]
    pub more_details: Option<String>,
    #[serde(default, alias = "application_deadline")]
    #[schema(value_type = Option<String>, format = Date)]
    pub application_deadline: Option<NaiveDate>,
}

impl UpdateJobRequest {
    /// Merge the supplied fields into `active`, returning the names of changed fields.
    pub fn apply_to(self, active: &mut job::ActiveModel) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(title) = self.title {
            active.title = Set(title);
            changed.push("title");
        }
        if let Some(department) = self.department {
            active.department = Set(department);
            changed.push("department");
        }
        if let Some(manager_name) = self.manager_name {
            active.manager_name = Set(manager_name);
            changed.push("manager_name");
        }
        if let Some(manager_email) = self.manager_email {
            active.manager_email = Set(manager_email);
            changed.push("manager_email");
        }
        if let Some(semesters) = self.hiring_semesters {
            active.hiring_semesters = Set(semesters.to_column());
            changed.push("hiring_semesters");
        }
        if let Some(min_students) = self.min_students {
            active.min_students = Set(min_students);
            changed.push("min_students");
        }
        if let Some(max_students) = self.max_students {
            active.max_students = Set(max_students);
            changed.push("max_students");
        }
        if let Some(role_location) = self.role_location {
            active.role_location = Set(role_location);
            changed.push("role_location");
        }
        if let Some(type_of_work) = self.type_of_work {
            active.type_of_work = Set(type_of_work);
            changed.push("type_of_work");
        }
        if let Some(prerequisites) = self.prerequisites {
            active.prerequisites = Set(prerequisites);
            changed.push("prerequisites");
        }
        if let Some(brief_description) = self.brief_description {
            active.brief_description = Set(brief_description);
            changed.push("brief_description");
        }
        if let Some(more_details) = self.more_details {
            active.more_details = Set(more_details);
            changed.push("more_details");
        }
        if let Some(deadline) = self.application_deadline {
            active.application_deadline = Set(deadline);
            changed.push("application_deadline");
        }

        changed
    }
}

/// Job response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: i32,
    pub employer_id: i32,
    pub title: String,
    pub department: String,
    pub manager_name: String,
    pub manager_email: String,
    pub hiring_semesters: String,
    pub min_students: i32,
    pub max_students: i32,
    pub role_location: String,
    pub type_of_work: String,
    pub prerequisites: String,
    pub brief_description: String,
    pub more_details: String,
    #[schema(value_type = String, format = Date)]
    pub application_deadline: NaiveDate,
}

impl From<job::Model> for JobResponse {
    fn from(model: job::Model) -> Self {
        Self {
            id: model.id,
            employer_id: model.employer_id,
            title: model.title,
            department: model.department,
            manager_name: model.manager_name,
            manager_email: model.manager_email,
            hiring_semesters: model.hiring_semesters,
            min_students: model.min_students,
            max_students: model.max_students,
            role_location: model.role_location,
            type_of_work: model.type_of_work,
            prerequisites: model.prerequisites,
            brief_description: model.brief_description,
            more_details: model.more_details,
            application_deadline: model.application_deadline,
        }
    }
}

/// Identity of the employer that posted a job
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// A job with its employer and every application it received
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminJobResponse {
    pub job: JobResponse,
    pub employer: Option<EmployerSummary>,
    pub applications: Vec<ApplicationWithStudent>,
}

/// Build the job query for a filter; results are ordered by id.
pub fn filtered_jobs(filter: &JobFilter) -> Select<job::Entity> {
    let mut query = job::Entity::find().order_by_asc(job::Column::Id);

    if let Some(pattern) = filter.keyword_pattern() {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(job::Column::Title)))
                .like(LikeExpr::new(pattern).escape('\\')),
        );
    }
    if let Some(location) = filter.location() {
        query = query.filter(job::Column::RoleLocation.eq(location));
    }
    if let Some(department) = filter.department() {
        query = query.filter(job::Column::Department.eq(department));
    }

    query
}

/// Delete a job and every application against it.
pub async fn delete_job_cascade<C: ConnectionTrait>(db: &C, job_id: i32) -> Result<u64, sea_orm::DbErr> {
    let applications = application::Entity::delete_many()
        .filter(application::Column::JobId.eq(job_id))
        .exec(db)
        .await?;
    debug!("Removed {} applications of job {}", applications.rows_affected, job_id);

    let jobs = job::Entity::delete_by_id(job_id).exec(db).await?;
    Ok(jobs.rows_affected)
}

async fn insert_job(state: &AppState, caller: &CurrentUser, request: CreateJobRequest) -> ApiResult<job::Model> {
    let employer_id = request.employer_id.unwrap_or(caller.id);
    if employer_id != caller.id {
        debug!("User {} posting on behalf of employer {}", caller.id, employer_id);
        caller.require_admin()?;
        if user::Entity::find_by_id(employer_id).one(&state.db).await?.is_none() {
            warn!("Employer {} not found for new job", employer_id);
            return Err(ApiError::not_found("Employer not found"));
        }
    }

    let new_job = job::ActiveModel {
        employer_id: Set(employer_id),
        title: Set(request.title),
        department: Set(request.department),
        manager_name: Set(request.manager_name),
        manager_email: Set(request.manager_email),
        hiring_semesters: Set(request.hiring_semesters.to_column()),
        min_students: Set(request.min_students),
        max_students: Set(request.max_students),
        role_location: Set(request.role_location),
        type_of_work: Set(request.type_of_work),
        prerequisites: Set(request.prerequisites.unwrap_or_default()),
        brief_description: Set(request.brief_description),
        more_details: Set(request.more_details.unwrap_or_default()),
        application_deadline: Set(request.application_deadline),
        ..Default::default()
    };

    trace!("Attempting to insert new job into database");
    let created = new_job.insert(&state.db).await?;
    info!("Job created successfully with ID: {}, title: {}", created.id, created.title);
    Ok(created)
}

fn created_job(model: job::Model) -> (StatusCode, Json<ApiResponse<JobResponse>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            data: JobResponse::from(model),
            message: "Job created successfully".to_string(),
            success: true,
        }),
    )
}

/// Get all jobs
#[utoipa::path(
    get,
    path = "/employers",
    tag = "jobs",
    responses(
        (status = 200, description = "Jobs retrieved successfully", body = ApiResponse<Vec<JobResponse>>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_jobs(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Json<ApiResponse<Vec<JobResponse>>>> {
    trace!("Entering list_jobs function");

    let jobs = job::Entity::find()
        .order_by_asc(job::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} jobs", jobs.len());
    Ok(Json(ApiResponse {
        data: jobs.into_iter().map(JobResponse::from).collect(),
        message: "Jobs retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a job owned by the caller
#[utoipa::path(
    post,
    path = "/employers",
    tag = "jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created successfully", body = ApiResponse<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Posting for another employer requires admin", body = ErrorResponse),
        (status = 404, description = "Employer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user, request), fields(user_id = user.id))]
pub async fn create_job(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobResponse>>)> {
    trace!("Entering create_job function");
    debug!("Creating job with title: {}", request.title);

    let created = insert_job(&state, &user, request).await?;
    Ok(created_job(created))
}

/// Post a job, optionally on behalf of another employer
#[utoipa::path(
    post,
    path = "/post-job",
    tag = "jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created successfully", body = ApiResponse<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Posting for another employer requires admin", body = ErrorResponse),
        (status = 404, description = "Employer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user, request), fields(user_id = user.id))]
pub async fn post_job(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobResponse>>)> {
    trace!("Entering post_job function");
    debug!("Posting job '{}' for employer {:?}", request.title, request.employer_id);

    let created = insert_job(&state, &user, request).await?;
    Ok(created_job(created))
}

/// Get a specific job by ID
#[utoipa::path(
    get,
    path = "/jobs/{job_id}",
    tag = "jobs",
    params(
        ("job_id" = i32, Path, description = "Job ID"),
    ),
    responses(
        (status = 200, description = "Job retrieved successfully", body = ApiResponse<JobResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_job(
    Path(job_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<JobResponse>>> {
    trace!("Entering get_job function for job_id: {}", job_id);

    let Some(model) = job::Entity::find_by_id(job_id).one(&state.db).await? else {
        warn!("Job with ID {} not found", job_id);
        return Err(ApiError::not_found("Job not found"));
    };

    info!("Successfully retrieved job with ID: {}", model.id);
    Ok(Json(ApiResponse {
        data: JobResponse::from(model),
        message: "Job retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a job
#[utoipa::path(
    put,
    path = "/jobs/{job_id}",
    tag = "jobs",
    params(
        ("job_id" = i32, Path, description = "Job ID"),
    ),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated successfully", body = ApiResponse<JobResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user, request), fields(user_id = user.id))]
pub async fn update_job(
    Path(job_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<UpdateJobRequest>,
) -> ApiResult<Json<ApiResponse<JobResponse>>> {
    trace!("Entering update_job function for job_id: {}", job_id);

    let Some(existing) = job::Entity::find_by_id(job_id).one(&state.db).await? else {
        warn!("Job with ID {} not found for update", job_id);
        return Err(ApiError::not_found("Job not found"));
    };

    let min = request.min_students.unwrap_or(existing.min_students);
    let max = request.max_students.unwrap_or(existing.max_students);
    check_student_range(min, max)
        .map_err(|_| ApiError::Validation("minStudents must not exceed maxStudents".to_string()))?;

    let mut active: job::ActiveModel = existing.into();
    let changed = request.apply_to(&mut active);
    if changed.is_empty() {
        debug!("No fields to update for job ID: {}", job_id);
    } else {
        debug!("Updating fields: {}", changed.join(", "));
    }

    let updated = active.update(&state.db).await?;
    info!("Job with ID {} updated successfully", job_id);
    Ok(Json(ApiResponse {
        data: JobResponse::from(updated),
        message: "Job updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a job and its applications
#[utoipa::path(
    delete,
    path = "/jobs/{job_id}",
    tag = "jobs",
    params(
        ("job_id" = i32, Path, description = "Job ID"),
    ),
    responses(
        (status = 200, description = "Job deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_job(
    Path(job_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering delete_job function for job_id: {}", job_id);

    let txn = state.db.begin().await?;
    let removed = delete_job_cascade(&txn, job_id).await?;
    if removed == 0 {
        warn!("Job with ID {} not found for deletion", job_id);
        txn.rollback().await?;
        return Err(ApiError::not_found("Job not found"));
    }
    txn.commit().await?;

    info!("Job with ID {} deleted successfully", job_id);
    Ok(Json(ApiResponse {
        data: format!("Job {} deleted", job_id),
        message: "Job deleted successfully".to_string(),
        success: true,
    }))
}

/// Filter jobs by keyword, location and department
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    params(JobFilter),
    responses(
        (status = 200, description = "Matching jobs", body = ApiResponse<Vec<JobResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn filter_jobs(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidQuery(filter): ValidQuery<JobFilter>,
) -> ApiResult<Json<ApiResponse<Vec<JobResponse>>>> {
    trace!("Entering filter_jobs function");
    run_search(&state, &filter).await.map(Json)
}

/// Public job search with a JSON body
#[utoipa::path(
    post,
    path = "/job-search",
    tag = "jobs",
    request_body = JobFilter,
    responses(
        (status = 200, description = "Matching jobs", body = ApiResponse<Vec<JobResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_jobs(
    State(state): State<AppState>,
    ValidJson(filter): ValidJson<JobFilter>,
) -> ApiResult<Json<ApiResponse<Vec<JobResponse>>>> {
    trace!("Entering search_jobs function");
    run_search(&state, &filter).await.map(Json)
}

async fn run_search(state: &AppState, filter: &JobFilter) -> ApiResult<ApiResponse<Vec<JobResponse>>> {
    if filter.is_unfiltered() {
        debug!("No effective filters, returning every job");
    }

    let jobs = filtered_jobs(filter).all(&state.db).await?;
    info!("Job search matched {} jobs", jobs.len());

    Ok(ApiResponse {
        data: jobs.into_iter().map(JobResponse::from).collect(),
        message: "Jobs retrieved successfully".to_string(),
        success: true,
    })
}

/// Every job with its employer and applications (admin only)
#[utoipa::path(
    get,
    path = "/admin/jobs",
    tag = "admin",
    responses(
        (status = 200, description = "Jobs with employers and applications", body = ApiResponse<Vec<AdminJobResponse>>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn admin_jobs(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<AdminJobResponse>>>> {
    trace!("Entering admin_jobs function");
    user.require_admin()?;

    let jobs = job::Entity::find()
        .order_by_asc(job::Column::Id)
        .find_also_related(user::Entity)
        .all(&state.db)
        .await?;

    let applications = application::Entity::find()
        .order_by_asc(application::Column::Id)
        .find_also_related(user::Entity)
        .all(&state.db)
        .await?;
    debug!("Loaded {} jobs and {} applications", jobs.len(), applications.len());

    let mut by_job: HashMap<i32, Vec<ApplicationWithStudent>> = HashMap::new();
    for (app, student) in applications {
        by_job
            .entry(app.job_id)
            .or_default()
            .push(ApplicationWithStudent::new(app, student));
    }

    let data: Vec<AdminJobResponse> = jobs
        .into_iter()
        .map(|(job, employer)| AdminJobResponse {
            applications: by_job.remove(&job.id).unwrap_or_default(),
            employer: employer.map(|e| EmployerSummary {
                id: e.id,
                name: display_name(&e.first_name, &e.last_name),
                email: e.email,
            }),
            job: JobResponse::from(job),
        })
        .collect();

    info!("Admin {} retrieved {} jobs", user.id, data.len());
    Ok(Json(ApiResponse {
        data,
        message: "Jobs retrieved successfully".to_string(),
        success: true,
    }))
}
