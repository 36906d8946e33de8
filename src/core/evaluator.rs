use crate::core::{
    calculator::{compute_score, express_entry_status},
    crs::{crs_breakdown, CrsBreakdown},
    suggestions::generate_suggestions,
};
use crate::models::{ExpressEntryStatus, Profile, ScoreResult, Stream, StreamCategory, Suggestion};
use serde::Serialize;

/// CRS estimate with its per-section points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrsEstimate {
    pub total: u32,
    #[serde(flatten)]
    pub sections: CrsBreakdown,
}

impl From<CrsBreakdown> for CrsEstimate {
    fn from(sections: CrsBreakdown) -> Self {
        Self {
            total: sections.total(),
            sections,
        }
    }
}

/// Everything derived from one profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub stream: Stream,
    pub category: StreamCategory,
    pub score: ScoreResult,
    pub status: ExpressEntryStatus,
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs_estimate: Option<CrsEstimate>,
}

/// Derives score, outlook and suggestions for a profile
///
/// # Derivation
/// 1. Provincial points score for the stream
/// 2. Express Entry outlook from the stored CRS score
/// 3. Improvement suggestions
/// 4. Optionally, a fresh CRS estimate (not written back to the profile)
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    include_crs_estimate: bool,
}

impl Evaluator {
    pub fn new(include_crs_estimate: bool) -> Self {
        Self {
            include_crs_estimate,
        }
    }

    pub fn includes_crs_estimate(&self) -> bool {
        self.include_crs_estimate
    }

    pub fn evaluate(&self, profile: &Profile) -> Evaluation {
        let score = compute_score(profile);
        let status = express_entry_status(profile);
        let suggestions = generate_suggestions(profile);
        let crs_estimate = self
            .include_crs_estimate
            .then(|| CrsEstimate::from(crs_breakdown(profile)));

        tracing::debug!(
            "Evaluated {} profile: score {}/{}, {} suggestions",
            profile.stream,
            score.total,
            score.max_possible,
            suggestions.len()
        );

        Evaluation {
            stream: profile.stream,
            category: profile.stream.category(),
            score,
            status,
            suggestions,
            crs_estimate,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(true)
    }
}
