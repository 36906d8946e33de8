use crate::core::{Evaluation, Evaluator};
use crate::models::Profile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-memory cache of derived evaluations
///
/// Evaluations are keyed by the whole serialized profile, so an edit to any
/// field produces a new key and the stale entry simply ages out.
pub struct EvaluationCache {
    evaluator: Evaluator,
    cache: moka::future::Cache<String, Arc<Evaluation>>,
}

impl EvaluationCache {
    /// Create a new evaluation cache
    pub fn new(evaluator: Evaluator, capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { evaluator, cache }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Get the evaluation for a profile, deriving it on a miss
    ///
    /// Concurrent misses on the same profile share one derivation.
    pub async fn evaluate(&self, profile: &Profile) -> Result<Arc<Evaluation>, CacheError> {
        let key = CacheKey::evaluation(profile)?;

        let entry = self
            .cache
            .entry(key)
            .or_insert_with(async { Arc::new(self.evaluator.evaluate(profile)) })
            .await;

        if entry.is_fresh() {
            tracing::trace!("Evaluation cache miss for {} profile", profile.stream);
        } else {
            tracing::trace!("Evaluation cache hit for {} profile", profile.stream);
        }

        Ok(entry.into_value())
    }

    /// Drop every cached evaluation
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        tracing::debug!("Invalidated all cached evaluations");
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        // Counts are only exact once pending maintenance has run
        self.cache.run_pending_tasks().await;

        CacheStats {
            entries: self.cache.entry_count(),
            weighted_size: self.cache.weighted_size(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: u64,
    pub weighted_size: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a profile's evaluation
    pub fn evaluation(profile: &Profile) -> Result<String, CacheError> {
        Ok(format!("evaluation:{}", serde_json::to_string(profile)?))
    }
}
