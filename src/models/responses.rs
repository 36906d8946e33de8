use serde::{Deserialize, Serialize};
use crate::core::tables::{Occupation, RuleTable};
use crate::services::CacheStats;
use crate::models::domain::{ExpressEntryStatus, Stream, StreamCategory, Suggestion};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheStats,
    /// Whether evaluations carry a CRS estimate
    pub crs_estimate: bool,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// CRS estimate response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrsResponse {
    pub crs_score: u32,
    /// Whether the estimate differs from the score sent in the profile
    pub changed: bool,
}

/// Express Entry outlook response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub stream: Stream,
    pub status: ExpressEntryStatus,
}

/// Suggestions response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
    pub total_points: u32,
}

/// Narrative advice response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResponse {
    pub advice_id: String,
    pub advice: String,
    /// True when the advisor could not be reached and a fallback was returned
    pub degraded: bool,
}

/// A selectable stream
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub id: Stream,
    pub label: &'static str,
    pub category: StreamCategory,
    pub points_pool: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamInfo>,
}

/// Every provincial point grid, for form rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablesResponse {
    pub teer_levels: RuleTable<&'static str>,
    pub noc_broad_categories: RuleTable<&'static str>,
    pub wage_bands: RuleTable<f64>,
    pub education_levels: RuleTable<&'static str>,
    pub fields_of_study: RuleTable<&'static str>,
    pub regions: RuleTable<&'static str>,
    pub canadian_credentials: RuleTable<&'static str>,
    pub clb_levels: RuleTable<u8>,
    /// Occupations that qualify for the tech draws
    pub tech_occupations: &'static [Occupation],
}
