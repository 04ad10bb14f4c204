use std::sync::Arc;

use crate::config::Config;
use crate::corpus::Corpus;
use crate::image::ImageClient;
use crate::llm_client::LlmClient;
use crate::publish::XClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; read-only for the process lifetime.
    pub corpus: Arc<Corpus>,
    pub llm: LlmClient,
    pub images: ImageClient,
    /// Absent when no X token is configured; the publish handler reports it.
    pub publisher: Option<Arc<XClient>>,
    pub config: Config,
}
