use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::converters::{int_or_string, option_int_or_string};
use model::entities::team;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a team
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub manager: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(alias = "maxStudents", deserialize_with = "int_or_string")]
    #[validate(range(min = 0))]
    pub max_students: i32,
    pub contact: String,
    pub priority: String,
    #[serde(alias = "recruitingFor")]
    pub recruiting_for: String,
}

/// Request body for updating a team; only supplied fields change
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTeamRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, alias = "maxStudents", deserialize_with = "option_int_or_string")]
    #[validate(range(min = 0))]
    pub max_students: Option<i32>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, alias = "recruitingFor")]
    pub recruiting_for: Option<String>,
}

impl UpdateTeamRequest {
    pub fn apply_to(self, active: &mut team::ActiveModel) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if let Some(name) = self.name {
            active.name = Set(name);
            changed.push("name");
        }
        if let Some(manager) = self.manager {
            active.manager = Set(manager);
            changed.push("manager");
        }
        if let Some(email) = self.email {
            active.email = Set(email);
            changed.push("email");
        }
        if let Some(max_students) = self.max_students {
            active.max_students = Set(max_students);
            changed.push("max_students");
        }
        if let Some(contact) = self.contact {
            active.contact = Set(contact);
            changed.push("contact");
        }
        if let Some(priority) = self.priority {
            active.priority = Set(priority);
            changed.push("priority");
        }
        if let Some(recruiting_for) = self.recruiting_for {
            active.recruiting_for = Set(recruiting_for);
            changed.push("recruiting_for");
        }
        changed
    }
}

/// Team response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub id: i32,
    pub name: String,
    pub manager: String,
    pub email: String,
    pub max_students: i32,
    pub contact: String,
    pub priority: String,
    pub recruiting_for: String,
}

impl From<team::Model> for TeamResponse {
    fn from(model: team::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            manager: model.manager,
            email: model.email,
            max_students: model.max_students,
            contact: model.contact,
            priority: model.priority,
            recruiting_for: model.recruiting_for,
        }
    }
}

/// Get all teams
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses(
        (status = 200, description = "Teams retrieved successfully", body = ApiResponse<Vec<TeamResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<TeamResponse>>>> {
    trace!("Entering list_teams function");

    let teams = team::Entity::find()
        .order_by_asc(team::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} teams", teams.len());
    Ok(Json(ApiResponse {
        data: teams.into_iter().map(TeamResponse::from).collect(),
        message: "Teams retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a team
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created successfully", body = ApiResponse<TeamResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_team(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TeamResponse>>)> {
    trace!("Entering create_team function");
    debug!("Creating team with name: {}", request.name);

    let new_team = team::ActiveModel {
        name: Set(request.name),
        manager: Set(request.manager),
        email: Set(request.email),
        max_students: Set(request.max_students),
        contact: Set(request.contact),
        priority: Set(request.priority),
        recruiting_for: Set(request.recruiting_for),
        ..Default::default()
    };

    let created = new_team.insert(&state.db).await?;
    info!("Team created successfully with ID: {}, name: {}", created.id, created.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TeamResponse::from(created),
            message: "Team created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get a specific team by ID
#[utoipa::path(
    get,
    path = "/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team retrieved successfully", body = ApiResponse<TeamResponse>),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TeamResponse>>> {
    trace!("Entering get_team function for team_id: {}", team_id);

    let Some(model) = team::Entity::find_by_id(team_id).one(&state.db).await? else {
        warn!("Team with ID {} not found", team_id);
        return Err(ApiError::not_found("Team not found"));
    };

    Ok(Json(ApiResponse {
        data: TeamResponse::from(model),
        message: "Team retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a team
#[utoipa::path(
    put,
    path = "/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated successfully", body = ApiResponse<TeamResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn update_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(request): ValidJson<UpdateTeamRequest>,
) -> ApiResult<Json<ApiResponse<TeamResponse>>> {
    trace!("Entering update_team function for team_id: {}", team_id);

    let Some(existing) = team::Entity::find_by_id(team_id).one(&state.db).await? else {
        warn!("Team with ID {} not found for update", team_id);
        return Err(ApiError::not_found("Team not found"));
    };

    let mut active: team::ActiveModel = existing.into();
    let changed = request.apply_to(&mut active);
    debug!("Updating team fields: {:?}", changed);

    let updated = active.update(&state.db).await?;
    info!("Team with ID {} updated successfully", team_id);
    Ok(Json(ApiResponse {
        data: TeamResponse::from(updated),
        message: "Team updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a team
#[utoipa::path(
    delete,
    path = "/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering delete_team function for team_id: {}", team_id);

    let result = team::Entity::delete_by_id(team_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Team with ID {} not found for deletion", team_id);
        return Err(ApiError::not_found("Team not found"));
    }

    info!("Team with ID {} deleted successfully", team_id);
    Ok(Json(ApiResponse {
        data: format!("Team {} deleted", team_id),
        message: "Team deleted successfully".to_string(),
        success: true,
    }))
}
