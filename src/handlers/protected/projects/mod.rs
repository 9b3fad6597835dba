pub mod collection;
pub mod record;

// Re-export handler functions for use in routing
pub use collection::list as projects_list;
pub use collection::create as projects_create;

pub use record::get as project_get;
pub use record::put as project_put;
pub use record::delete as project_delete;
