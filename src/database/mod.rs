pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub use memory::MemoryProjectStore;
pub use models::{DeleteOutcome, Project, ProjectFields};
pub use postgres::PgProjectStore;
pub use store::{ProjectStore, StoreError};

/// Build the store selected by configuration: Postgres when a DATABASE_URL is
/// present, otherwise the in-memory store.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn ProjectStore>, StoreError> {
    match config.url {
        Some(_) => {
            let store = PgProjectStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; projects are kept in memory and lost on restart");
            let store = MemoryProjectStore::new();
            info!("Using {} project store", store.backend());
            Ok(Arc::new(store))
        }
    }
}
