use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{
    password::{hash_password, verify_password},
    CurrentUser, USER_ID_KEY,
};
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidJson;
use crate::schemas::{ApiResponse, AppState};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
}

/// Request body for registering a new account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(alias = "first_name")]
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    #[serde(alias = "last_name")]
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// `Student`, `Employer` or `admin`
    #[serde(alias = "user_type", alias = "role")]
    pub user_type: String,
    /// Institution student number; accepted for compatibility, not stored.
    #[serde(default, alias = "student_id")]
    #[schema(value_type = Option<String>)]
    pub student_id: Option<serde_json::Value>,
}

/// Public view of a newly registered user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisteredUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub id: i32,
    pub email: String,
    pub role: String,
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ValidJson(request): ValidJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    trace!("Entering login function");
    debug!("Login attempt for email: {}", request.email);

    let found = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.as_str()))
        .one(&state.db)
        .await?;

    let user = match found {
        Some(user) if verify_password(&request.password, &user.password) => user,
        Some(user) => {
            warn!("Wrong password for user ID: {}", user.id);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            warn!("Login attempt for unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    // New id on privilege change
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;

    info!("User {} logged in", user.id);
    Ok(Json(ApiResponse {
        data: LoginResponse {
            id: user.id,
            username: user.username,
            role: user.role.as_str().to_string(),
        },
        message: "Login successful".to_string(),
        success: true,
    }))
}

/// Log out and discard the session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<String>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(user_id = user.id))]
pub async fn logout(user: CurrentUser, session: Session) -> ApiResult<Json<ApiResponse<String>>> {
    trace!("Entering logout function");
    session.flush().await?;

    info!("User {} logged out", user.id);
    Ok(Json(ApiResponse {
        data: format!("User {} logged out", user.id),
        message: "Successfully logged out!".to_string(),
        success: true,
    }))
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<RegisteredUser>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RegisteredUser>>)> {
    trace!("Entering register function");
    debug!("Registering user with email: {}", request.email);

    let role = Role::from_label(&request.user_type).ok_or_else(|| {
        warn!("Rejected registration with unknown role '{}'", request.user_type);
        ApiError::bad_request("userType must be one of Student, Employer, admin")
    })?;

    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.as_str()))
        .one(&state.db)
        .await?;
    if taken.is_some() {
        warn!("Registration rejected, email already in use");
        return Err(ApiError::conflict("Email already taken"));
    }

    let new_user = user::ActiveModel {
        username: Set(request.email.clone()),
        password: Set(hash_password(&request.password)?),
        first_name: Set(request.first_name),
        last_name: Set(request.last_name),
        email: Set(request.email),
        role: Set(role),
        education_level: Set(None),
        resume: Set(None),
        ..Default::default()
    };

    // A concurrent registration can still hit the unique index
    let created = new_user.insert(&state.db).await.map_err(|e| match ApiError::from(e) {
        ApiError::Conflict(_) => ApiError::conflict("Email already taken"),
        other => other,
    })?;

    info!("Registered user {} with role {}", created.id, created.role.as_str());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: RegisteredUser {
                id: created.id,
                username: created.username,
                email: created.email,
                role: created.role.as_str().to_string(),
            },
            message: "User registered successfully".to_string(),
            success: true,
        }),
    ))
}

/// Identity behind the current session
#[utoipa::path(
    get,
    path = "/auth/get-current-user",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<CurrentUserResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_current_user(user: CurrentUser) -> Json<ApiResponse<CurrentUserResponse>> {
    trace!("Entering get_current_user function");
    Json(ApiResponse {
        data: CurrentUserResponse {
            id: user.id,
            email: user.email,
            role: user.role.as_str().to_string(),
        },
        message: "Current user retrieved successfully".to_string(),
        success: true,
    })
}
