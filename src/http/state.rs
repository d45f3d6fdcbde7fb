use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::core::ingest::IngestService;
use crate::core::read::{ReadService, SecretGate};
use std::sync::Arc;

/// Dependencies handed to every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestService>,
    pub reader: Option<Arc<ReadService>>,
    pub gate: Option<SecretGate>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(ingest: IngestService) -> Self {
        Self {
            ingest: Arc::new(ingest),
            reader: None,
            gate: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_reader(mut self, reader: ReadService) -> Self {
        self.reader = Some(Arc::new(reader));
        self
    }

    pub fn with_secret_gate(mut self, gate: SecretGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}
