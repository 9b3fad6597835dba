// Client side of the projects API: HTTP access, view-state sync and view-models
pub mod fetcher;
pub mod http;
pub mod kv;
pub mod views;

pub use fetcher::{CreateOutcome, DetailState, Navigation, ProjectFetcher};
pub use http::{ClientError, CurrentUser, HttpProjectClient, ProjectApi};
pub use kv::{JsonFileStore, KeyValueStore, KvError, MemoryKeyValueStore, PersistentCounter};
pub use views::{AddProjectView, ProjectDetailsView, ProjectForm, ProjectListView};
