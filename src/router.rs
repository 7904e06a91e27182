use crate::auth::SeaOrmSessionStore;
use crate::config::Settings;
use crate::handlers::{
    applications::{
        apply, delete_application, get_application, get_employer_applications,
        get_user_applications, update_application, withdraw_application, MAX_UPLOAD_BYTES,
    },
    auth::{get_current_user, login, logout, register},
    employers::update_employer,
    health::health_check,
    jobs::{
        admin_jobs, create_job, delete_job, filter_jobs, get_job, list_jobs, post_job, search_jobs,
        update_job,
    },
    students::{list_students, update_student},
    teams::{create_team, delete_team, get_team, list_teams, update_team},
    tracker::{create_tracker, delete_tracker, get_tracker, list_trackers, update_tracker},
    users::{delete_user, get_all_users},
};
use crate::schemas::{ApiDoc, AppState};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use sha2::{Digest, Sha512};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, SessionManagerLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "workstudy_session";

fn session_layer(
    state: &AppState,
    settings: &Settings,
) -> SessionManagerLayer<SeaOrmSessionStore, SignedCookie> {
    // 64-byte signing key derived from the configured secret
    let key = Key::from(&Sha512::digest(settings.secret_key.as_bytes())[..]);

    SessionManagerLayer::new(SeaOrmSessionStore::new(state.db.clone()))
        .with_name(SESSION_COOKIE)
        .with_secure(settings.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(settings.session_ttl_hours)))
        .with_signed(key)
}

fn cors_layer(settings: &Settings) -> Result<CorsLayer> {
    let origin: HeaderValue = settings
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin: {}", settings.cors_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]))
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState, settings: &Settings) -> Result<Router> {
    let sessions = session_layer(&state, settings);
    let cors = cors_layer(settings)?;

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/register", post(register))
        .route("/auth/get-current-user", get(get_current_user))
        .route("/auth/all-users", get(get_all_users))
        // Jobs
        .route("/employers", get(list_jobs).post(create_job))
        .route("/employers/:employer_id", put(update_employer))
        .route("/post-job", post(post_job))
        .route("/jobs", get(filter_jobs))
        .route("/jobs/:job_id", get(get_job).put(update_job).delete(delete_job))
        .route("/job-search", post(search_jobs))
        .route("/admin/jobs", get(admin_jobs))
        // Applications
        .route(
            "/apply",
            post(apply).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/user-applications", get(get_user_applications))
        .route("/user-applications/:application_id", delete(withdraw_application))
        .route("/applications", get(get_employer_applications))
        .route(
            "/applications/:application_id",
            get(get_application).put(update_application).delete(delete_application),
        )
        // Students and users
        .route("/students", get(list_students))
        .route("/students/:student_id", put(update_student))
        .route("/users/:user_id", delete(delete_user))
        // Teams
        .route("/teams", get(list_teams).post(create_team))
        .route("/teams/:team_id", get(get_team).put(update_team).delete(delete_team))
        // Work-study position tracker
        .route("/ws-position-tracker", get(list_trackers).post(create_tracker))
        .route(
            "/ws-position-tracker/:tracker_id",
            get(get_tracker).put(update_tracker).delete(delete_tracker),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(cors)
                .layer(sessions),
        )
        .with_state(state);

    Ok(router)
}
