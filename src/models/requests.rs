use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::Profile;

/// Request to evaluate a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[validate(nested)]
    pub profile: Profile,
    /// Write a fresh CRS estimate into the profile before deriving the outlook
    #[serde(default)]
    pub estimate_crs: bool,
}

/// Request narrative advice for a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    #[validate(nested)]
    pub profile: Profile,
}
