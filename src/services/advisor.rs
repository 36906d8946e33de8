use crate::models::{Profile, ScoreResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Returned in place of advice when the advisor cannot be reached
pub const FALLBACK_ADVICE: &str =
    "Sorry, I couldn't analyze your profile at the moment. Please try again later.";

const EMPTY_ADVICE: &str = "Unable to generate analysis at this time.";

/// Errors that can occur when requesting advice
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,
}

/// Connection details for the text-generation endpoint
#[derive(Debug, Clone)]
pub struct AdvisorOptions {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Client for an external text-generation service
///
/// Sends the profile and its score breakdown and returns free-form advice.
/// Nothing in the scoring core depends on it.
pub struct AdvisorClient {
    options: AdvisorOptions,
    client: Client,
}

impl AdvisorClient {
    /// Create a new advisor client
    pub fn new(options: AdvisorOptions) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()?;

        Ok(Self { options, client })
    }

    /// Ask for advice, propagating any failure
    pub async fn analyze(
        &self,
        profile: &Profile,
        score: &ScoreResult,
    ) -> Result<String, AdvisorError> {
        let body = GenerateRequest {
            model: &self.options.model,
            prompt: build_prompt(profile, score)?,
            temperature: self.options.temperature,
        };

        tracing::debug!(
            "Requesting advice for {} profile from {}",
            profile.stream,
            self.options.endpoint
        );

        let response = self
            .client
            .post(&self.options.endpoint)
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AdvisorError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AdvisorError::ApiError(format!(
                "Advice request failed: {}",
                status
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        Ok(generated
            .text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| EMPTY_ADVICE.to_string()))
    }

    /// Ask for advice, falling back to a fixed apology on failure
    ///
    /// The flag is true when the fallback was used.
    pub async fn analyze_or_fallback(&self, profile: &Profile, score: &ScoreResult) -> (String, bool) {
        match self.analyze(profile, score).await {
            Ok(advice) => (advice, false),
            Err(e) => {
                tracing::warn!("Advisor unavailable, returning fallback: {}", e);
                (FALLBACK_ADVICE.to_string(), true)
            }
        }
    }
}

/// Prompt for the text-generation service
pub fn build_prompt(profile: &Profile, score: &ScoreResult) -> Result<String, AdvisorError> {
    let profile_json = serde_json::to_string_pretty(profile)?;
    let score_json = serde_json::to_string_pretty(score)?;

    Ok(format!(
        "You are an experienced Ontario Immigrant Nominee Program (OINP) consultant.\n\
         Review this applicant for the \"{stream}\" stream.\n\n\
         Profile:\n{profile_json}\n\n\
         Score:\n{score_json}\n\n\
         1. Summarize where the applicant currently stands.\n\
         2. Name the three easiest ways to raise the score, with concrete actions.\n\
         3. For Express Entry streams, compare the CRS score with recent draws.\n\
         4. Be professional, encouraging and brief. Use Markdown.\n",
        stream = profile.stream,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute_score;
    use crate::models::{GraduateStream, Stream};

    fn options(endpoint: String) -> AdvisorOptions {
        AdvisorOptions {
            endpoint,
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            temperature: 0.7,
            timeout_secs: 5,
        }
    }

    fn graduate_profile() -> Profile {
        let mut profile = Profile::new(Stream::Graduate(GraduateStream::Masters));
        profile.education_level = Some("masters".to_string());
        profile
    }

    #[test]
    fn test_prompt_contains_profile_and_score() {
        let profile = graduate_profile();
        let score = compute_score(&profile);
        let prompt = build_prompt(&profile, &score).unwrap();

        assert!(prompt.contains("\"Masters Graduate\" stream"));
        assert!(prompt.contains("\"educationLevel\": \"masters\""));
        assert!(prompt.contains("\"maxPossible\": 75"));
    }

    #[tokio::test]
    async fn test_analyze_returns_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text": "Move north."}"#)
            .create_async()
            .await;

        let client = AdvisorClient::new(options(format!("{}/generate", server.url()))).unwrap();
        let profile = graduate_profile();
        let advice = client
            .analyze(&profile, &compute_score(&profile))
            .await
            .unwrap();

        assert_eq!(advice, "Move north.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_text_gets_placeholder() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate")
            .with_status(200)
            .with_body(r#"{"text": "  "}"#)
            .create_async()
            .await;

        let client = AdvisorClient::new(options(format!("{}/generate", server.url()))).unwrap();
        let profile = graduate_profile();
        let advice = client
            .analyze(&profile, &compute_score(&profile))
            .await
            .unwrap();

        assert_eq!(advice, EMPTY_ADVICE);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate")
            .with_status(500)
            .create_async()
            .await;

        let client = AdvisorClient::new(options(format!("{}/generate", server.url()))).unwrap();
        let profile = graduate_profile();
        let score = compute_score(&profile);

        assert!(matches!(
            client.analyze(&profile, &score).await,
            Err(AdvisorError::ApiError(_))
        ));

        let (advice, degraded) = client.analyze_or_fallback(&profile, &score).await;
        assert!(degraded);
        assert_eq!(advice, FALLBACK_ADVICE);
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate")
            .with_status(401)
            .create_async()
            .await;

        let client = AdvisorClient::new(options(format!("{}/generate", server.url()))).unwrap();
        let profile = graduate_profile();

        assert!(matches!(
            client.analyze(&profile, &compute_score(&profile)).await,
            Err(AdvisorError::Unauthorized)
        ));
    }
}
