//! Web API Module
//!
//! Thin transport over the engine: validates input, calls the engine, and
//! serializes the result. All endpoints return JSON and require no
//! authentication (prototype mode). No engine logic lives here — the engine
//! never fails, so well-formed requests always get a 200.

use crate::config::{AppConfig, EngineConfig};
use crate::engine::backend::GeminiBackend;
use crate::engine::catalog::default_catalog;
use crate::engine::types::{CareerRecommendation, UserContext, UserProfile};
use crate::engine::CareerMentor;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================
// APPLICATION STATE
// ============================================================

/// Shared application state. The engine serializes its own mutable state,
/// so one instance is shared across all workers.
pub struct AppState {
    pub mentor: CareerMentor,
}

// ============================================================
// API REQUEST/RESPONSE TYPES
// ============================================================

#[derive(Deserialize)]
pub struct ChatRequest {
    pub user_message: Option<String>,
    pub user_context: Option<UserContext>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub response: String,
}

/// Required fields are optional here so the transport can reject each
/// omission with a named error instead of a generic deserialization failure.
#[derive(Deserialize)]
pub struct AssessRequest {
    pub interests: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub education: Option<String>,
    #[serde(default)]
    pub work_values: Vec<String>,
}

#[derive(Serialize)]
pub struct AssessReply {
    pub recommendations: Vec<CareerRecommendation>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

fn validate_profile(req: AssessRequest) -> Result<UserProfile, String> {
    let interests = req.interests.ok_or("Missing field: interests")?;
    let skills = req.skills.ok_or("Missing field: skills")?;
    let experience_level = req.experience_level.ok_or("Missing field: experience_level")?;
    let education = req.education.ok_or("Missing field: education")?;

    Ok(UserProfile {
        interests,
        skills,
        experience_level,
        education,
        work_values: req.work_values,
    })
}

// ============================================================
// API HANDLERS
// ============================================================

/// Service overview
async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "Career Mentor API is running",
        "endpoints": ["/chat", "/assess-career", "/status", "/health"]
    }))
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "Career Mentor API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Engine introspection for monitoring
async fn status(data: web::Data<Arc<AppState>>) -> impl Responder {
    let status = data.mentor.describe().await;
    HttpResponse::Ok().json(ApiResponse::success(status))
}

/// One chat turn
async fn chat(data: web::Data<Arc<AppState>>, req: web::Json<ChatRequest>) -> impl Responder {
    let req = req.into_inner();
    let message = match req.user_message.filter(|m| !m.trim().is_empty()) {
        Some(message) => message,
        None => {
            return HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error("No user_message provided"));
        }
    };

    let response = data.mentor.respond(&message, req.user_context).await;
    HttpResponse::Ok().json(ApiResponse::success(ChatReply { response }))
}

/// Structured career assessment
async fn assess_career(
    data: web::Data<Arc<AppState>>,
    req: web::Json<AssessRequest>,
) -> impl Responder {
    let profile = match validate_profile(req.into_inner()) {
        Ok(profile) => profile,
        Err(message) => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::error(&message));
        }
    };

    let recommendations = data.mentor.assess(&profile).await;
    HttpResponse::Ok().json(ApiResponse::success(AssessReply { recommendations }))
}

// ============================================================
// SERVER CONFIGURATION
// ============================================================

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/health", web::get().to(health_check))
        .route("/status", web::get().to(status))
        .route("/chat", web::post().to(chat))
        .route("/assess-career", web::post().to(assess_career));
}

/// Configure and run the API server
pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let engine_config = EngineConfig::default();
    let backend = GeminiBackend::new(
        config.api_key.clone(),
        config.model.clone(),
        engine_config.request_timeout,
    )
    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;

    let mentor = CareerMentor::new(Arc::new(backend), default_catalog(), engine_config);
    let state = Arc::new(AppState { mentor });

    println!(
        "🚀 Career Mentor API starting at http://{}:{}",
        config.host, config.port
    );
    println!("📚 API Endpoints:");
    println!("   POST /chat            - Career counseling chat");
    println!("   POST /assess-career   - Structured career assessment");
    println!("   GET  /status          - Engine status");
    println!("   GET  /health          - Health check");
    log::info!("using Gemini model '{}'", config.model);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::testing::{FailingBackend, StaticBackend};
    use crate::engine::backend::GenerativeBackend;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    fn state(backend: Arc<dyn GenerativeBackend>) -> web::Data<Arc<AppState>> {
        let mentor = CareerMentor::new(backend, default_catalog(), EngineConfig::default());
        web::Data::new(Arc::new(AppState { mentor }))
    }

    #[actix_web::test]
    async fn chat_returns_backend_reply() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(StaticBackend::replying("Halo juga!"))))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({ "user_message": "Halo" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["response"], "Halo juga!");
    }

    #[actix_web::test]
    async fn chat_without_message_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(StaticBackend::replying("x"))))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn chat_stays_up_when_backend_is_down() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FailingBackend)))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({ "user_message": "Halo" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        let response = body["data"]["response"].as_str().unwrap();
        assert!(!response.is_empty());
    }

    #[actix_web::test]
    async fn assess_requires_each_named_field() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FailingBackend)))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/assess-career")
            .set_json(json!({
                "interests": ["teknologi"],
                "skills": ["python"],
                "education": "S1"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Missing field: experience_level");
    }

    #[actix_web::test]
    async fn assess_returns_recommendations_without_backend() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FailingBackend)))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/assess-career")
            .set_json(json!({
                "interests": [],
                "skills": ["Python"],
                "experience_level": "Entry level",
                "education": "S1"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        let recommendations = body["data"]["recommendations"].as_array().unwrap();
        assert!(!recommendations.is_empty());
        assert_eq!(recommendations[0]["career_title"], "Software Engineer");
    }

    #[actix_web::test]
    async fn status_reports_engine_counters() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(StaticBackend::replying("ok"))))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["turn_count"], 0);
        assert!(body["data"]["prompt_length"].as_u64().unwrap() > 0);
        assert_eq!(body["data"]["catalog_size"], 5);
    }
}
