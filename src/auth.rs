//! Session-based identity: password hashing, the session store and the
//! `CurrentUser` extractor used by protected handlers.

pub mod password;
pub mod session_store;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use model::entities::user::{self, Role};
use sea_orm::EntityTrait;
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

pub use session_store::SeaOrmSessionStore;

/// Session key holding the authenticated user's id.
pub const USER_ID_KEY: &str = "user_id";

/// The authenticated principal behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!("User {} attempted an admin-only action", self.id);
            Err(ApiError::forbidden("Admin access required"))
        }
    }

    /// Allow the action when acting on one's own record, or as admin.
    pub fn require_self_or_admin(&self, target_user_id: i32) -> Result<(), ApiError> {
        if self.id == target_user_id || self.is_admin() {
            Ok(())
        } else {
            warn!("User {} attempted to modify user {}", self.id, target_user_id);
            Err(ApiError::forbidden("Not allowed to modify another user"))
        }
    }
}

impl From<user::Model> for CurrentUser {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        let Some(user_id) = session.get::<i32>(USER_ID_KEY).await? else {
            debug!("Request without an authenticated session");
            return Err(ApiError::unauthorized("Authentication required"));
        };

        match user::Entity::find_by_id(user_id).one(&state.db).await? {
            Some(model) => Ok(CurrentUser::from(model)),
            None => {
                warn!("Session refers to missing user {}", user_id);
                Err(ApiError::unauthorized("Authentication required"))
            }
        }
    }
}
