//! Application state shared by every handler

use std::sync::Arc;
use vitrine_core::Config;
use vitrine_processing::UploadPipeline;
use vitrine_storage::Storage;

/// Built once at startup and handed to the router as `Arc<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub pipeline: UploadPipeline,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let pipeline = UploadPipeline::new(storage.clone(), config.upload());
        Self {
            config,
            storage,
            pipeline,
        }
    }
}
