pub mod assignment_handlers;
pub mod dashboard_handlers;
pub mod mw_auth;
pub mod routes;
pub mod subject_handlers;
pub mod upload_handlers;
pub mod user_handlers;
