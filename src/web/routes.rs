// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        assignment_handlers, dashboard_handlers, mw_auth, subject_handlers, upload_handlers,
        user_handlers,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

/// Router da API. A camada de sessão é aplicada por quem o constrói.
pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/api/users", get(user_handlers::list_users).post(user_handlers::create_user))
        .route("/api/users/switch", post(user_handlers::switch_user));

    let assignment_routes = Router::new()
        .route(
            "/",
            get(assignment_handlers::list_assignments)
                .post(assignment_handlers::create_assignment)
                .delete(assignment_handlers::clear_assignments),
        )
        .route("/upcoming", get(assignment_handlers::upcoming_assignments))
        .route(
            "/{id}",
            get(assignment_handlers::get_assignment)
                .put(assignment_handlers::update_assignment)
                .delete(assignment_handlers::delete_assignment),
        );

    let subject_routes = Router::new()
        .route(
            "/",
            get(subject_handlers::list_subjects).post(subject_handlers::create_subject),
        )
        .route(
            "/{id}",
            put(subject_handlers::update_subject).delete(subject_handlers::delete_subject),
        );

    // Limite do corpo só no upload
    let upload_routes = Router::new()
        .route("/upload", post(upload_handlers::upload_spreadsheet))
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes));

    // --- Rotas Autenticadas (exigem utilizador ativo na sessão) ---
    let authenticated_routes = Router::new()
        .route("/api/users/current", get(user_handlers::current_user))
        .nest("/api/assignments", assignment_routes)
        .nest("/api/subjects", subject_routes)
        .nest("/api/spreadsheet", upload_routes)
        .route("/api/uploads", get(upload_handlers::list_uploads))
        .route("/api/stats", get(dashboard_handlers::stats))
        .route("/api/calendar", get(dashboard_handlers::calendar))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
