use crate::agent::{ ChatAgent, ChatError };
use crate::models::chat::{ ChatRequest, ChatResponse };

use axum::{
    extract::{ Request, State },
    http::{ HeaderName, HeaderValue, Method, StatusCode },
    middleware::{ self, Next },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use chrono::Utc;
use governor::{ clock::DefaultClock, state::{ InMemoryState, NotKeyed }, Quota, RateLimiter };
use log::{ debug, info, warn };
use serde::Serialize;
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{ Duration, Instant };
use tower_http::cors::{ AllowHeaders, AllowMethods, AllowOrigin, CorsLayer };
use tower_http::set_header::SetResponseHeaderLayer;

pub const SERVICE_NAME: &str = "NutriLeaf Malunggay Chatbot API";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Added to every response unless a handler already set them.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("x-xss-protection", "0"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
];

pub type RequestLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<ChatAgent>,
    pub limiter: Option<Arc<RequestLimiter>>,
    pub started_at: Instant,
}

impl AppState {
    /// `per_second == 0` turns rate limiting off.
    pub fn new(agent: Arc<ChatAgent>, per_second: u32) -> Self {
        let limiter = NonZeroU32::new(per_second).map(|n|
            Arc::new(RateLimiter::direct(Quota::per_second(n)))
        );
        Self { agent, limiter, started_at: Instant::now() }
    }
}

#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChatError::MissingMessage => StatusCode::BAD_REQUEST,
            ChatError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorDetail { detail: self.to_string() })).into_response()
    }
}

pub fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(access_log))
        .layer(cors);

    SECURITY_HEADERS.iter()
        .fold(app, |app, &(name, value)| {
            app.layer(
                SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value)
                )
            )
        })
        .with_state(state)
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let res = next.run(req).await;
    info!("{}", access_line(&method, &path, res.status(), started.elapsed()));
    res
}

fn access_line(method: &Method, path: &str, status: StatusCode, elapsed: Duration) -> String {
    format!("{} {} {} {:.3} ms", method, path, status.as_u16(), elapsed.as_secs_f64() * 1000.0)
}

async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(limiter) = &state.limiter {
        if limiter.check().is_err() {
            warn!("Global request rate limit exceeded. Rejecting {} {}", req.method(), req.uri());
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorDetail { detail: "Too many requests".into() }),
            ).into_response();
        }
    }
    next.run(req).await
}

async fn root_handler() -> impl IntoResponse {
    Json(
        json!({
            "status": "online",
            "service": SERVICE_NAME,
            "version": SERVICE_VERSION,
            "message": "API is running. Use POST /api/chat to interact with Molly.",
        })
    )
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(
        json!({
            "status": "OK",
            "timestamp": Utc::now().to_rfc3339(),
            "uptime": state.started_at.elapsed().as_secs_f64(),
        })
    )
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> Result<Json<ChatResponse>, ChatError> {
    debug!(
        "POST /api/chat: {} chars, {} history turns, language {:?}",
        req.message.len(),
        req.history.len(),
        req.language
    );
    state.agent.process_message(&req).await.map(Json)
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use crate::config::settings::ServiceConfig;
    use crate::config::tables::off_topic_response;
    use crate::llm::fallback::ModelFallbackRunner;
    use crate::llm::mock::{ ScriptedClient, ScriptedReply };
    use crate::llm::GenerationConfig;
    use crate::models::chat::Language;
    use axum::body::Body;
    use axum::http::{ header, Method, Request };
    use clap::Parser;
    use tower::ServiceExt;

    fn app_with(client: Arc<ScriptedClient>, per_second: u32) -> Router {
        let runner = ModelFallbackRunner::new(
            client,
            vec!["gemini-a".into(), "gemini-b".into()],
            GenerationConfig::default()
        );
        let state = AppState::new(Arc::new(ChatAgent::new(runner)), per_second);
        router(state, cors_layer(vec![HeaderValue::from_static("http://localhost:3000")]))
    }

    fn app(client: Arc<ScriptedClient>) -> Router {
        app_with(client, 0)
    }

    fn post_chat(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_online() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let res = app(Arc::new(ScriptedClient::default())).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["status"], "online");
        assert_eq!(json["service"], SERVICE_NAME);
        assert_eq!(json["version"], "1.0.0");
        assert!(json["message"].as_str().unwrap().contains("POST /api/chat"));
    }

    #[tokio::test]
    async fn health_reports_uptime() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = app(Arc::new(ScriptedClient::default())).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["status"], "OK");
        assert!(json["uptime"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn empty_message_is_bad_request() {
        let client = Arc::new(ScriptedClient::default());
        let res = app(client.clone()).oneshot(post_chat(json!({ "message": "" }))).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["detail"], "Message is required");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_message_is_bad_request() {
        let res = app(Arc::new(ScriptedClient::default()))
            .oneshot(post_chat(json!({ "history": [] }))).await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blocked_tagalog_message_gets_tagalog_refusal() {
        let client = Arc::new(ScriptedClient::default());
        let body = json!({
            "message": "Can you explain to me who the president of this country is",
            "language": "tagalog",
        });
        let res = app(client.clone()).oneshot(post_chat(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["message"], off_topic_response(Language::Tagalog));
        assert!(!json["conversationId"].as_str().unwrap().is_empty());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn unsupported_language_falls_back_to_taglish_refusal() {
        let client = Arc::new(ScriptedClient::default());
        let body = json!({
            "message": "Can you explain to me who the president of this country is",
            "language": "cebuano",
        });
        let res = app(client.clone()).oneshot(post_chat(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["message"], off_topic_response(Language::Taglish));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_chat_echoes_conversation_id() {
        let client = Arc::new(ScriptedClient::new(vec![ScriptedReply::Text("Plant cuttings at 45°.")]));
        let body = json!({
            "message": "How do I plant malunggay cuttings?",
            "history": [{ "role": "assistant", "content": "Kumusta! Ako si Molly." }],
            "language": "english",
            "conversationId": "1700000000000",
        });
        let res = app(client.clone()).oneshot(post_chat(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["message"], "Plant cuttings at 45°.");
        assert_eq!(json["conversationId"], "1700000000000");
        assert_eq!(client.calls(), ["gemini-a"]);
    }

    #[tokio::test]
    async fn provider_failure_is_internal_error_with_detail() {
        let client = Arc::new(
            ScriptedClient::new(
                vec![ScriptedReply::Status(429, "quota"), ScriptedReply::Status(403, "permission denied")]
            )
        );
        let res = app(client.clone())
            .oneshot(post_chat(json!({ "message": "how do I water it" }))).await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = body_json(res).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Chat failed:"));
        assert!(detail.contains("permission denied"));
        assert_eq!(client.calls(), ["gemini-a", "gemini-b"]);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let req = Request::builder().uri("/api/unknown").body(Body::empty()).unwrap();
        let res = app(Arc::new(ScriptedClient::default())).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["error"], "Route not found");
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_with_credentials() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let res = app(Arc::new(ScriptedClient::default())).oneshot(req).await.unwrap();

        let headers = res.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn rate_limit_rejects_excess_requests() {
        let app = app_with(Arc::new(ScriptedClient::default()), 1);

        let first = app.clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn default_config_never_rate_limits() {
        let args = Args::try_parse_from(["nutrileaf-chat", "--google-api-key", "test-key"]).unwrap();
        let config = ServiceConfig::from_args(&args).unwrap();
        let runner = ModelFallbackRunner::new(
            Arc::new(ScriptedClient::default()),
            config.models.clone(),
            config.generation
        );
        let state = AppState::new(Arc::new(ChatAgent::new(runner)), config.rate_limit_per_second);
        let app = router(state, cors_layer(config.cors_origins));

        let blocked = json!({ "message": "Can you explain to me who the president of this country is" });
        for _ in 0..12 {
            let res = app.clone().oneshot(post_chat(blocked.clone())).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn security_headers_are_set_on_every_response() {
        let limited = app_with(Arc::new(ScriptedClient::default()), 1);
        let mut responses = Vec::new();
        for uri in ["/", "/api/unknown", "/"] {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            responses.push(limited.clone().oneshot(req).await.unwrap());
        }
        let statuses: Vec<_> = responses.iter().map(|r| r.status()).collect();
        assert_eq!(statuses, [StatusCode::OK, StatusCode::TOO_MANY_REQUESTS, StatusCode::TOO_MANY_REQUESTS]);

        for res in &responses {
            for (name, value) in SECURITY_HEADERS {
                assert_eq!(res.headers()[*name], *value, "{} on {}", name, res.status());
            }
        }
    }

    #[tokio::test]
    async fn security_headers_cover_not_found_and_preflight() {
        let not_found = app(Arc::new(ScriptedClient::default()))
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.headers()["x-content-type-options"], "nosniff");

        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let res = app(Arc::new(ScriptedClient::default())).oneshot(preflight).await.unwrap();
        assert_eq!(res.headers()["x-frame-options"], "SAMEORIGIN");
    }

    #[tokio::test]
    async fn access_log_passes_responses_through() {
        let app = Router::new()
            .route("/", get(|| async { (StatusCode::ACCEPTED, "queued") }))
            .layer(middleware::from_fn(access_log));
        let res = app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"queued");
    }

    #[test]
    fn access_line_has_method_path_status_and_elapsed() {
        let line = access_line(
            &Method::POST,
            "/api/chat",
            StatusCode::TOO_MANY_REQUESTS,
            Duration::from_micros(12_500)
        );
        assert_eq!(line, "POST /api/chat 429 12.500 ms");
    }
}
