use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::Json,
};
use model::entities::{
    application, job,
    user::{self, Role},
};
use sea_orm::{
    sea_query::Query, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::applications::ApplicationResponse;
use crate::handlers::jobs::JobResponse;
use crate::schemas::{ApiResponse, AppState};

/// User response model. Student and employer specific fields are only
/// present for users of that role.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<ApplicationResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<JobResponse>>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        let is_student = model.role == Role::Student;
        Self {
            id: model.id,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            role: model.role.as_str().to_string(),
            education_level: is_student.then(|| model.education_level.unwrap_or_default()),
            resume: is_student.then(|| model.resume.unwrap_or_default()),
            applications: None,
            jobs: None,
        }
    }
}

/// Delete a user along with the jobs they posted, applications to those
/// jobs and the applications they submitted.
pub async fn delete_user_cascade<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, DbErr> {
    let owned_jobs = Query::select()
        .column(job::Column::Id)
        .from(job::Entity)
        .and_where(job::Column::EmployerId.eq(user_id))
        .to_owned();

    let received = application::Entity::delete_many()
        .filter(application::Column::JobId.in_subquery(owned_jobs))
        .exec(db)
        .await?;
    let jobs = job::Entity::delete_many()
        .filter(job::Column::EmployerId.eq(user_id))
        .exec(db)
        .await?;
    let submitted = application::Entity::delete_many()
        .filter(application::Column::StudentId.eq(user_id))
        .exec(db)
        .await?;
    debug!(
        "Removed {} jobs, {} received and {} submitted applications of user {}",
        jobs.rows_affected, received.rows_affected, submitted.rows_affected, user_id
    );

    let users = user::Entity::delete_by_id(user_id).exec(db).await?;
    Ok(users.rows_affected)
}

/// Every user; students carry their applications, employers their jobs
#[utoipa::path(
    get,
    path = "/auth/all-users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    trace!("Entering get_all_users function");

    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;
    let jobs = job::Entity::find()
        .order_by_asc(job::Column::Id)
        .all(&state.db)
        .await?;
    let applications = application::Entity::find()
        .order_by_asc(application::Column::Id)
        .all(&state.db)
        .await?;
    debug!(
        "Loaded {} users, {} jobs, {} applications",
        users.len(),
        jobs.len(),
        applications.len()
    );

    let mut jobs_by_employer: HashMap<i32, Vec<JobResponse>> = HashMap::new();
    for model in jobs {
        jobs_by_employer
            .entry(model.employer_id)
            .or_default()
            .push(JobResponse::from(model));
    }
    let mut applications_by_student: HashMap<i32, Vec<ApplicationResponse>> = HashMap::new();
    for model in applications {
        applications_by_student
            .entry(model.student_id)
            .or_default()
            .push(ApplicationResponse::from(model));
    }

    let data: Vec<UserResponse> = users
        .into_iter()
        .map(|model| {
            let id = model.id;
            let role = model.role;
            let mut response = UserResponse::from(model);
            match role {
                Role::Student => {
                    response.applications = Some(applications_by_student.remove(&id).unwrap_or_default())
                }
                Role::Employer => response.jobs = Some(jobs_by_employer.remove(&id).unwrap_or_default()),
                Role::Admin => {}
            }
            response
        })
        .collect();

    info!("Successfully retrieved {} users", data.len());
    Ok(Json(ApiResponse {
        data,
        message: "Users retrieved successfully".to_string(),
        success: true,
    }))
}

/// Delete a user and everything they own
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not allowed to delete this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user, session), fields(caller_id = user.id))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
    session: Session,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    user.require_self_or_admin(user_id)?;

    let txn = state.db.begin().await?;
    let removed = delete_user_cascade(&txn, user_id).await?;
    if removed == 0 {
        warn!("User with ID {} not found for deletion", user_id);
        txn.rollback().await?;
        return Err(ApiError::not_found("User not found"));
    }
    txn.commit().await?;

    if user.id == user_id {
        debug!("User {} deleted their own account, ending session", user_id);
        session.flush().await?;
    }

    info!("User with ID {} deleted successfully", user_id);
    Ok(Json(ApiResponse {
        data: format!("User {} deleted", user_id),
        message: "User deleted successfully".to_string(),
        success: true,
    }))
}
