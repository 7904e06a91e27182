use axum::{
    extract::{Path, State},
    response::Json,
};
use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState};

/// Request body for editing an employer profile; only supplied fields change
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateEmployerRequest {
    #[serde(default, alias = "firstName")]
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

impl UpdateEmployerRequest {
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
        if let Some(email) = self.email {
            // username mirrors the login email
            active.username = Set(email.clone());
            active.email = Set(email);
            changed.push("email");
        }
        changed
    }
}

/// Edit an employer profile (the employer themself or an admin)
#[utoipa::path(
    put,
    path = "/employers/{employer_id}",
    tag = "employers",
    params(
        ("employer_id" = i32, Path, description = "Employer user ID"),
    ),
    request_body = UpdateEmployerRequest,
    responses(
        (status = 200, description = "Employer updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not allowed to edit this employer", body = ErrorResponse),
        (status = 404, description = "Employer not found", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn update_employer(
    Path(employer_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<UpdateEmployerRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    trace!("Entering update_employer function for employer_id: {}", employer_id);
    user.require_self_or_admin(employer_id)?;

    let existing = user::Entity::find_by_id(employer_id)
        .filter(user::Column::Role.eq(Role::Employer))
        .one(&state.db)
        .await?;
    let Some(existing) = existing else {
        warn!("Employer with ID {} not found for update", employer_id);
        return Err(ApiError::not_found("Employer not found"));
    };

    if let Some(email) = request.email.as_deref() {
        let taken = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(email)),
            )
            .filter(user::Column::Id.ne(employer_id))
            .one(&state.db)
            .await?;
        if taken.is_some() {
            warn!("Employer {} tried to take an email already in use", employer_id);
            return Err(ApiError::conflict("Email already taken"));
        }
    }

    let mut active: user::ActiveModel = existing.into();
    let changed = request.apply_to(&mut active);
    debug!("Updating employer fields: {:?}", changed);

    let updated = active.update(&state.db).await?;
    info!("Employer with ID {} updated successfully", employer_id);
    Ok(Json(ApiResponse {
        data: UserResponse::from(updated),
        message: "Employer updated successfully".to_string(),
        success: true,
    }))
}
