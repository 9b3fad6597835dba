use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::ProjectStore;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::ProjectService;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub projects: ProjectService,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProjectStore>, config: &AppConfig) -> Self {
        Self {
            projects: ProjectService::new(store, config.projects.clone()),
            security: Arc::new(config.security.clone()),
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let protected = Router::new()
        .merge(project_routes())
        .merge(auth_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(protected)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn project_routes() -> Router<AppState> {
    use protected::projects;

    Router::new()
        .route(
            "/api/projects",
            get(projects::projects_list).post(projects::projects_create),
        )
        .route(
            "/api/projects/:id",
            get(projects::project_get)
                .put(projects::project_put)
                .delete(projects::project_delete),
        )
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/api/auth/whoami", get(protected::auth::whoami))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
