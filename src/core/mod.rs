// Core scoring exports
pub mod calculator;
pub mod crs;
pub mod evaluator;
pub mod session;
pub mod suggestions;
pub mod tables;

pub use calculator::{compute_score, express_entry_status};
pub use crs::{crs_breakdown, estimate_crs, refresh_crs, CrsBreakdown, CrsInputs};
pub use evaluator::{CrsEstimate, Evaluation, Evaluator};
pub use session::ProfileSession;
pub use suggestions::generate_suggestions;
pub use tables::{RuleEntry, RuleTable};
