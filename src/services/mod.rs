pub mod assignment_service;
pub mod stats_service;
pub mod subject_service;
pub mod upload_log_service;
pub mod user_service;
