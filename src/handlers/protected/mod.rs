// handlers/protected/mod.rs - handlers behind jwt_auth_middleware
//
// Every handler here can rely on an AuthUser extension being present.
pub mod auth;
pub mod projects;
