pub mod project;

pub use project::{DeleteOutcome, Project, ProjectFields};
