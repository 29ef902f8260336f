use crate::core::{CleaningReport, EngineConfig, RecommendationEngine};
use crate::error::RecommendError;
use crate::models::RawServiceRecord;
use std::sync::{Arc, RwLock};

/// Shared owner of the current recommendation engine
///
/// Requests take a snapshot with [`EngineHandle::current`] and score against
/// it without holding any lock. A reload builds the replacement engine first
/// and only then swaps it in, so in-flight requests finish against the
/// catalog and vocabulary they started with.
#[derive(Debug)]
pub struct EngineHandle {
    config: EngineConfig,
    engine: RwLock<Arc<RecommendationEngine>>,
}

impl EngineHandle {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            config: engine.config().clone(),
            engine: RwLock::new(Arc::new(engine)),
        }
    }

    /// Build the first engine from a raw catalog
    pub fn build(raw: Vec<RawServiceRecord>, config: EngineConfig) -> Result<Self, RecommendError> {
        Ok(Self::new(RecommendationEngine::build(raw, config)?))
    }

    /// Snapshot of the engine serving requests right now
    pub fn current(&self) -> Arc<RecommendationEngine> {
        let guard = self.engine.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Re-normalize, re-fit and swap in a new catalog
    ///
    /// On error the current engine keeps serving.
    pub fn reload(&self, raw: Vec<RawServiceRecord>) -> Result<CleaningReport, RecommendError> {
        let replacement = RecommendationEngine::build(raw, self.config.clone())?;
        let report = replacement.cleaning_report().clone();

        let mut guard = self.engine.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(replacement);
        drop(guard);

        tracing::info!(
            services = report.final_records,
            removed = report.records_removed,
            "Catalog reloaded"
        );

        Ok(report)
    }
}
