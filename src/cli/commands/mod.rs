pub mod config;
pub mod counter;
pub mod project;
pub mod token;
