use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{
    compute_score, express_entry_status, generate_suggestions, refresh_crs, tables,
};
use crate::models::{
    AdviceRequest, AdviceResponse, CrsResponse, ErrorResponse, EvaluateRequest, HealthResponse,
    Profile, StatusResponse, Stream, StreamInfo, StreamsResponse, SuggestionsResponse,
    TablesResponse,
};
use crate::services::{AdvisorClient, EvaluationCache};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<EvaluationCache>,
    pub advisor: Option<Arc<AdvisorClient>>,
}

/// Configure all scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/streams", web::get().to(list_streams))
        .route("/tables", web::get().to(list_tables))
        .route("/score", web::post().to(score))
        .route("/crs", web::post().to(estimate))
        .route("/status", web::post().to(status))
        .route("/suggestions", web::post().to(suggestions))
        .route("/evaluate", web::post().to(evaluate))
        .route("/advice", web::post().to(advice));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: field_errors={:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.stats().await,
        crs_estimate: state.cache.evaluator().includes_crs_estimate(),
    })
}

/// List selectable streams
///
/// GET /api/v1/streams
async fn list_streams() -> impl Responder {
    let streams = Stream::ALL
        .iter()
        .map(|stream| StreamInfo {
            id: *stream,
            label: stream.label(),
            category: stream.category(),
            points_pool: stream.is_points_pool(),
        })
        .collect();

    HttpResponse::Ok().json(StreamsResponse { streams })
}

/// Provincial point grids
///
/// GET /api/v1/tables
async fn list_tables() -> impl Responder {
    HttpResponse::Ok().json(TablesResponse {
        teer_levels: tables::TEER_LEVELS,
        noc_broad_categories: tables::NOC_BROAD_CATEGORIES,
        wage_bands: tables::WAGE_BANDS,
        education_levels: tables::EDUCATION_LEVELS,
        fields_of_study: tables::FIELDS_OF_STUDY,
        regions: tables::REGIONS,
        canadian_credentials: tables::CANADIAN_CREDENTIALS,
        clb_levels: tables::CLB_LEVELS,
        tech_occupations: tables::TECH_OCCUPATIONS,
    })
}

/// Points score for a profile
///
/// POST /api/v1/score
///
/// Request body: a profile, e.g.
/// ```json
/// {
///   "stream": "Foreign Worker",
///   "nocTeer": "1",
///   "wageAmount": 32.5,
///   "workLocation": "outside_gta"
/// }
/// ```
async fn score(req: web::Json<Profile>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    HttpResponse::Ok().json(compute_score(&req))
}

/// CRS estimate for a profile
///
/// POST /api/v1/crs
async fn estimate(req: web::Json<Profile>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let (crs_score, changed) = match refresh_crs(&req) {
        Some(score) => (score, true),
        // Unchanged, so the stored score is the estimate
        None => (req.crs_score.unwrap_or_default(), false),
    };

    tracing::debug!("CRS estimate for {}: {} (changed: {})", req.stream, crs_score, changed);

    HttpResponse::Ok().json(CrsResponse { crs_score, changed })
}

/// Express Entry outlook
///
/// POST /api/v1/status
async fn status(req: web::Json<Profile>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    HttpResponse::Ok().json(StatusResponse {
        stream: req.stream,
        status: express_entry_status(&req),
    })
}

/// Improvement suggestions
///
/// POST /api/v1/suggestions
async fn suggestions(req: web::Json<Profile>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let suggestions = generate_suggestions(&req);
    let total_points = suggestions.iter().filter_map(|s| s.points).sum();

    HttpResponse::Ok().json(SuggestionsResponse {
        suggestions,
        total_points,
    })
}

/// Full evaluation, served from the derivation cache when possible
///
/// POST /api/v1/evaluate
///
/// Request body:
/// ```json
/// {
///   "profile": { "stream": "Human Capital Priorities", "age": 29, "clbLevel": 9 },
///   "estimateCrs": true
/// }
/// ```
async fn evaluate(
    state: web::Data<AppState>,
    req: web::Json<EvaluateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let EvaluateRequest {
        mut profile,
        estimate_crs,
    } = req.into_inner();

    if estimate_crs {
        if let Some(score) = refresh_crs(&profile) {
            profile.crs_score = Some(score);
        }
    }

    match state.cache.evaluate(&profile).await {
        Ok(evaluation) => HttpResponse::Ok().json(evaluation.as_ref()),
        Err(e) => {
            tracing::error!("Failed to evaluate {} profile: {}", profile.stream, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to evaluate profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Narrative advice from the text-generation collaborator
///
/// POST /api/v1/advice
async fn advice(
    state: web::Data<AppState>,
    req: web::Json<AdviceRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let Some(advisor) = state.advisor.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Advisor not configured".to_string(),
            message: "Set advisor.endpoint and advisor.api_key to enable advice".to_string(),
            status_code: 503,
        });
    };

    let score = compute_score(&req.profile);
    let (advice, degraded) = advisor.analyze_or_fallback(&req.profile, &score).await;

    tracing::info!(
        "Returning advice for {} profile (degraded: {})",
        req.profile.stream,
        degraded
    );

    HttpResponse::Ok().json(AdviceResponse {
        advice_id: uuid::Uuid::new_v4().to_string(),
        advice,
        degraded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Evaluator;
    use actix_web::{test, App};

    fn state(advisor: Option<Arc<AdvisorClient>>) -> AppState {
        AppState {
            cache: Arc::new(EvaluationCache::new(Evaluator::default(), 100, 60)),
            advisor,
        }
    }

    #[actix_web::test]
    async fn test_score_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/score")
            .set_json(serde_json::json!({
                "stream": "International Student",
                "wageAmount": 26.0,
                "nocBroadCategory": "sales_service_arts",
                "workLocation": "toronto"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 6);
        assert_eq!(body["breakdown"]["Job Level (TEER) (Excluded for Students)"], 0);
        assert_eq!(body["eligible"], true);
    }

    #[actix_web::test]
    async fn test_invalid_profile_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/suggestions")
            .set_json(serde_json::json!({ "stream": "PhD Graduate", "clbLevel": 30 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_advice_without_advisor() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/advice")
            .set_json(serde_json::json!({ "profile": { "stream": "Foreign Worker" } }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 503);
    }

    #[actix_web::test]
    async fn test_health_reports_cache() {
        let state = state(None);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/evaluate")
            .set_json(serde_json::json!({ "profile": { "stream": "PhD Graduate" } }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cache"]["entries"], 1);
        assert_eq!(body["crsEstimate"], true);
    }

    #[actix_web::test]
    async fn test_tables_list_tech_occupations() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/tables").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let occupations = body["techOccupations"].as_array().unwrap();
        assert_eq!(occupations.len(), 15);
        assert_eq!(occupations[0]["noc"], "20012");
        assert_eq!(occupations[7]["title"], "Software engineers and designers");
    }
}
