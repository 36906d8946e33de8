// Service exports
pub mod advisor;
pub mod cache;

pub use advisor::{AdvisorClient, AdvisorError, AdvisorOptions, FALLBACK_ADVICE};
pub use cache::{CacheError, CacheKey, CacheStats, EvaluationCache};
