pub mod project_service;

pub use project_service::{ProjectInput, ProjectService, ServiceError};
