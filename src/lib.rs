pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod server;
pub mod utils;

pub use crate::adapters::storage::{FileStore, MemoryStore};
pub use crate::config::ServerConfig;
pub use crate::core::ingest::IngestService;
pub use crate::core::read::{ReadService, SecretGate};
pub use crate::http::{router, AppState};
pub use crate::utils::error::{FormError, Result};
