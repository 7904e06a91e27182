use axum::{
    extract::{Path, State},
    response::Json,
};
use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState};

/// Request body for editing a student profile; only supplied fields change
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateStudentRequest {
    #[serde(default, alias = "firstName")]
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[serde(default, alias = "educationLevel")]
    pub education_level: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
}

impl UpdateStudentRequest {
    pub fn apply_to(self, active: &mut user::ActiveModel) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if let Some(first_name) = self.first_name {
            active.first_name = Set(first_name);
            changed.push("first_name");
        }
        if let Some(last_name) = self.last_name {
            active.last_name = Set(last_name);
            changed.push("last_name");
        }
        if let Some(education_level) = self.education_level {
            active.education_level = Set(Some(education_level));
            changed.push("education_level");
        }
        if let Some(resume) = self.resume {
            active.resume = Set(Some(resume));
            changed.push("resume");
        }
        changed
    }
}

/// All users registered as students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "Students retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_students(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    trace!("Entering list_students function");

    let students = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Student))
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} students", students.len());
    Ok(Json(ApiResponse {
        data: students.into_iter().map(UserResponse::from).collect(),
        message: "Students retrieved successfully".to_string(),
        success: true,
    }))
}

/// Edit a student profile (the student themself or an admin)
#[utoipa::path(
    put,
    path = "/students/{student_id}",
    tag = "students",
    params(
        ("student_id" = i32, Path, description = "Student user ID"),
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not allowed to edit this student", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn update_student(
    Path(student_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<UpdateStudentRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    trace!("Entering update_student function for student_id: {}", student_id);
    user.require_self_or_admin(student_id)?;

    let existing = user::Entity::find_by_id(student_id)
        .filter(user::Column::Role.eq(Role::Student))
        .one(&state.db)
        .await?;
    let Some(existing) = existing else {
        warn!("Student with ID {} not found for update", student_id);
        return Err(ApiError::not_found("Student not found"));
    };

    let mut active: user::ActiveModel = existing.into();
    let changed = request.apply_to(&mut active);
    debug!("Updating student fields: {:?}", changed);

    let updated = active.update(&state.db).await?;
    info!("Student with ID {} updated successfully", student_id);
    Ok(Json(ApiResponse {
        data: UserResponse::from(updated),
        message: "Student updated successfully".to_string(),
        success: true,
    }))
}
