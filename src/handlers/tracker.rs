use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::converters::{option_int_or_string, option_string_or_int, string_or_int};
use model::entities::ws_tracker;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::schemas::{ApiResponse, AppState};

/// Request body for adding a row to the work-study position tracker
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTrackerRequest {
    /// Institution student number, kept as text
    #[serde(alias = "studentId", deserialize_with = "string_or_int")]
    #[validate(length(min = 1, message = "student_id is required"))]
    pub student_id: String,
    #[serde(alias = "minervaEmail")]
    #[validate(length(min = 1, message = "minerva_email is required"))]
    pub minerva_email: String,
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, message = "full_name is required"))]
    pub full_name: String,
    #[serde(default, alias = "expectedGradYear", deserialize_with = "option_int_or_string")]
    pub expected_grad_year: Option<i32>,
    #[serde(default, alias = "wsEligible")]
    pub ws_eligible: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "managerName")]
    pub manager_name: Option<String>,
    #[serde(default, alias = "paycomManager")]
    pub paycom_manager: Option<String>,
    #[serde(default, alias = "managerEmail")]
    pub manager_email: Option<String>,
    #[serde(default, alias = "departmentName")]
    pub department_name: Option<String>,
    #[serde(default, alias = "paycomId")]
    pub paycom_id: Option<String>,
    #[serde(default, alias = "contractorStatus")]
    pub contractor_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "mergeStatus")]
    pub merge_status: Option<String>,
}

/// Request body for updating a tracker row; only supplied fields change
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTrackerRequest {
    #[serde(default, alias = "studentId", deserialize_with = "option_string_or_int")]
    #[validate(length(min = 1))]
    pub student_id: Option<String>,
    #[serde(default, alias = "minervaEmail")]
    pub minerva_email: Option<String>,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default, alias = "expectedGradYear", deserialize_with = "option_int_or_string")]
    pub expected_grad_year: Option<i32>,
    #[serde(default, alias = "wsEligible")]
    pub ws_eligible: Option<bool>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "managerName")]
    pub manager_name: Option<String>,
    #[serde(default, alias = "paycomManager")]
    pub paycom_manager: Option<String>,
    #[serde(default, alias = "managerEmail")]
    pub manager_email: Option<String>,
    #[serde(default, alias = "departmentName")]
    pub department_name: Option<String>,
    #[serde(default, alias = "paycomId")]
    pub paycom_id: Option<String>,
    #[serde(default, alias = "contractorStatus")]
    pub contractor_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "mergeStatus")]
    pub merge_status: Option<String>,
}

impl UpdateTrackerRequest {
    pub fn apply_to(self, active: &mut ws_tracker::ActiveModel) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(student_id) = self.student_id {
            active.student_id = Set(student_id);
            changed.push("student_id");
        }
        if let Some(minerva_email) = self.minerva_email {
            active.minerva_email = Set(minerva_email);
            changed.push("minerva_email");
        }
        if let Some(full_name) = self.full_name {
            active.full_name = Set(full_name);
            changed.push("full_name");
        }
        if let Some(year) = self.expected_grad_year {
            active.expected_grad_year = Set(Some(year));
            changed.push("expected_grad_year");
        }
        if let Some(eligible) = self.ws_eligible {
            active.ws_eligible = Set(eligible);
            changed.push("ws_eligible");
        }

        // Remaining columns are all nullable text
        let optional_fields = [
            (self.role, &mut active.role, "role"),
            (self.manager_name, &mut active.manager_name, "manager_name"),
            (self.paycom_manager, &mut active.paycom_manager, "paycom_manager"),
            (self.manager_email, &mut active.manager_email, "manager_email"),
            (self.department_name, &mut active.department_name, "department_name"),
            (self.paycom_id, &mut active.paycom_id, "paycom_id"),
            (self.contractor_status, &mut active.contractor_status, "contractor_status"),
            (self.notes, &mut active.notes, "notes"),
            (self.merge_status, &mut active.merge_status, "merge_status"),
        ];
        for (value, column, name) in optional_fields {
            if let Some(value) = value {
                *column = Set(Some(value));
                changed.push(name);
            }
        }

        changed
    }
}

/// Tracker row response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackerResponse {
    pub id: i32,
    pub student_id: String,
    pub minerva_email: String,
    pub full_name: String,
    pub expected_grad_year: Option<i32>,
    pub ws_eligible: bool,
    pub role: Option<String>,
    pub manager_name: Option<String>,
    pub paycom_manager: Option<String>,
    pub manager_email: Option<String>,
    pub department_name: Option<String>,
    pub paycom_id: Option<String>,
    pub contractor_status: Option<String>,
    pub notes: Option<String>,
    pub merge_status: Option<String>,
}

impl From<ws_tracker::Model> for TrackerResponse {
    fn from(model: ws_tracker::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            minerva_email: model.minerva_email,
            full_name: model.full_name,
            expected_grad_year: model.expected_grad_year,
            ws_eligible: model.ws_eligible,
            role: model.role,
            manager_name: model.manager_name,
            paycom_manager: model.paycom_manager,
            manager_email: model.manager_email,
            department_name: model.department_name,
            paycom_id: model.paycom_id,
            contractor_status: model.contractor_status,
            notes: model.notes,
            merge_status: model.merge_status,
        }
    }
}

async fn find_tracker(state: &AppState, tracker_id: i32) -> ApiResult<ws_tracker::Model> {
    match ws_tracker::Entity::find_by_id(tracker_id).one(&state.db).await? {
        Some(model) => Ok(model),
        None => {
            warn!("Tracker entry with ID {} not found", tracker_id);
            Err(ApiError::not_found("Tracker entry not found"))
        }
    }
}

/// Get every tracker row
#[utoipa::path(
    get,
    path = "/ws-position-tracker",
    tag = "tracker",
    responses(
        (status = 200, description = "Tracker rows retrieved successfully", body = ApiResponse<Vec<TrackerResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_trackers(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<TrackerResponse>>>> {
    trace!("Entering list_trackers function");

    let rows = ws_tracker::Entity::find()
        .order_by_asc(ws_tracker::Column::Id)
        .all(&state.db)
        .await?;

    info!("Successfully retrieved {} tracker rows", rows.len());
    Ok(Json(ApiResponse {
        data: rows.into_iter().map(TrackerResponse::from).collect(),
        message: "Tracker entries retrieved successfully".to_string(),
        success: true,
    }))
}

/// Add a tracker row
#[utoipa::path(
    post,
    path = "/ws-position-tracker",
    tag = "tracker",
    request_body = CreateTrackerRequest,
    responses(
        (status = 201, description = "Tracker row created successfully", body = ApiResponse<TrackerResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_tracker(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateTrackerRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TrackerResponse>>)> {
    trace!("Entering create_tracker function");
    debug!("Creating tracker row for student: {}", request.student_id);

    let new_row = ws_tracker::ActiveModel {
        student_id: Set(request.student_id),
        minerva_email: Set(request.minerva_email),
        full_name: Set(request.full_name),
        expected_grad_year: Set(request.expected_grad_year),
        ws_eligible: Set(request.ws_eligible),
        role: Set(request.role),
        manager_name: Set(request.manager_name),
        paycom_manager: Set(request.paycom_manager),
        manager_email: Set(request.manager_email),
        department_name: Set(request.department_name),
        paycom_id: Set(request.paycom_id),
        contractor_status: Set(request.contractor_status),
        notes: Set(request.notes),
        merge_status: Set(request.merge_status),
        ..Default::default()
    };

    let created = new_row.insert(&state.db).await.map_err(|e| {
        error!("Failed to create tracker row: {}", e);
        ApiError::internal("tracker insert failed")
    })?;

    info!("Tracker row created successfully with ID: {}", created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TrackerResponse::from(created),
            message: "Tracker entry created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Get a specific tracker row by ID
#[utoipa::path(
    get,
    path = "/ws-position-tracker/{tracker_id}",
    tag = "tracker",
    params(
        ("tracker_id" = i32, Path, description = "Tracker row ID"),
    ),
    responses(
        (status = 200, description = "Tracker row retrieved successfully", body = ApiResponse<TrackerResponse>),
        (status = 404, description = "Tracker row not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_tracker(
    Path(tracker_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TrackerResponse>>> {
    trace!("Entering get_tracker function for tracker_id: {}", tracker_id);
    let model = find_tracker(&state, tracker_id).await?;

    Ok(Json(ApiResponse {
        data: TrackerResponse::from(model),
        message: "Tracker entry retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a tracker row
#[utoipa::path(
    put,
    path = "/ws-position-tracker/{tracker_id}",
    tag = "tracker",
    params(
        ("tracker_id" = i32, Path, description = "Tracker row ID"),
    ),
    request_body = UpdateTrackerRequest,
    responses(
        (status = 200, description = "Tracker row updated successfully", body = ApiResponse<TrackerResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Tracker row not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_tracker(
    Path(tracker_id): Path<i32>,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<UpdateTrackerRequest>,
) -> ApiResult<Json<ApiResponse<TrackerResponse>>> {
    trace!("Entering update_tracker function for tracker_id: {}", tracker_id);
    let existing = find_tracker(&state, tracker_id).await?;

    let mut active: ws_tracker::ActiveModel = existing.into();
    let changed = request.apply_to(&mut active);
    debug!("Updating tracker fields: {:?}", changed);

    let updated = active.update(&state.db).await?;
    info!("Tracker row with ID {} updated successfully", tracker_id);
    Ok(Json(ApiResponse {
        data: TrackerResponse::from(updated),
        message: "Tracker entry updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a tracker row
#[utoipa::path(
    delete,
    path = "/ws-position-tracker/{tracker_id}",
    tag = "tracker",
    params(
        ("tracker_id" = i32, Path, description = "Tracker row ID"),
    ),
    responses(
        (status = 200, description = "Tracker row deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Tracker row not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_tracker(
    Path(tracker_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering delete_tracker function for tracker_id: {}", tracker_id);

    let result = ws_tracker::Entity::delete_by_id(tracker_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Tracker entry with ID {} not found for deletion", tracker_id);
        return Err(ApiError::not_found("Tracker entry not found"));
    }

    info!("Tracker row with ID {} deleted successfully", tracker_id);
    Ok(Json(ApiResponse {
        data: format!("Tracker entry {} deleted", tracker_id),
        message: "Tracker entry deleted successfully".to_string(),
        success: true,
    }))
}
