pub mod assignment;
pub mod subject;
pub mod upload_log;
pub mod user;
