use std::sync::Arc;

use crate::auth::gate::CredentialGate;
use crate::auth::store::{FileStore, MemoryStore};
use crate::config::Config;
use crate::layout::{default_page_config, PageConfig};

/// Long-lived services shared by the event loop and its background tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gate: Arc<CredentialGate>,
    /// Page geometry for every export. A4 portrait with a 15mm border.
    pub page_config: PageConfig,
}

impl AppState {
    /// Credentials persist under `config.data_dir`; the session marker lives in memory.
    pub fn new(config: Config) -> Self {
        let gate = CredentialGate::new(
            Arc::new(FileStore::new(config.data_dir.clone())),
            Arc::new(MemoryStore::new()),
        );
        AppState {
            config,
            gate: Arc::new(gate),
            page_config: default_page_config(),
        }
    }
}
