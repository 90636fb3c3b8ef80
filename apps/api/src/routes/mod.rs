pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::resume::handlers::handle_extract_resume;
use crate::state::AppState;

/// Upper bound on résumé uploads.
const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze-job", post(handlers::handle_analyze_job))
        .route(
            "/api/prepare-interview",
            post(handlers::handle_prepare_interview),
        )
        .route("/api/chat", post(handlers::handle_chat))
        .route(
            "/api/completion-check",
            get(handlers::handle_completion_check),
        )
        .route(
            "/api/extract-resume",
            post(handle_extract_resume).layer(DefaultBodyLimit::max(MAX_RESUME_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use mockito::Matcher;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::{AnalysisService, CompletionConfig};
    use crate::scraping::testing::{FixtureFetcher, INDEED_POSTING};
    use crate::scraping::{JobExtractionPipeline, SiteAdapter};

    fn app(fetcher: Arc<FixtureFetcher>, base_url: &str, api_key: Option<&str>) -> Router {
        let analysis = AnalysisService::new(CompletionConfig {
            api_key: api_key.map(String::from),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        build_router(AppState {
            pipeline: Arc::new(JobExtractionPipeline::new(fetcher, SiteAdapter::default())),
            analysis,
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn completion(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(FixtureFetcher::failing(), "http://unused", None);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["completion_configured"], false);
    }

    #[tokio::test]
    async fn test_analyze_job_returns_job_data_and_analysis() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({"model": "gpt-4"})))
            .with_status(200)
            .with_body(completion("1. Required skills: Go"))
            .create_async()
            .await;

        let url = "https://www.indeed.com/viewjob?jk=backend";
        let app = app(FixtureFetcher::serving(INDEED_POSTING), &server.url(), Some("k"));
        let (status, body) = send(app, post_json("/api/analyze-job", json!({ "url": url }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobData"]["title"], "Backend Engineer");
        assert_eq!(body["jobData"]["company"], "Acme");
        assert_eq!(body["jobData"]["description"], "5 years Go experience...");
        assert_eq!(body["jobData"]["sourceUrl"], url);
        assert_eq!(body["analysis"], "1. Required skills: Go");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_analyze_job_requires_url() {
        let app = app(FixtureFetcher::serving(INDEED_POSTING), "http://unused", Some("k"));
        let (status, body) = send(app, post_json("/api/analyze-job", json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn test_analyze_job_fetch_failure_is_opaque() {
        let app = app(FixtureFetcher::failing(), "http://unused", Some("k"));
        let (status, body) = send(
            app,
            post_json("/api/analyze-job", json!({"url": "https://example.com/job"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let message = body["error"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(!body.to_string().contains("Timeout while waiting"));
    }

    #[tokio::test]
    async fn test_analyze_job_empty_description_is_422() {
        let app = app(
            FixtureFetcher::serving("<html><body></body></html>"),
            "http://unused",
            Some("k"),
        );
        let (status, body) = send(
            app,
            post_json("/api/analyze-job", json!({"url": "https://example.com/job"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "EMPTY_DESCRIPTION");
    }

    #[tokio::test]
    async fn test_prepare_interview_returns_briefing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({"model": "gpt-3.5-turbo", "max_tokens": 1500})),
                Matcher::Regex("conducting a technical interview".to_string()),
                Matcher::Regex("Built payment APIs".to_string()),
            ]))
            .with_status(200)
            .with_body(completion("# Introduction\nHi, I'm your interviewer."))
            .create_async()
            .await;

        let app = app(FixtureFetcher::serving(INDEED_POSTING), &server.url(), Some("k"));
        let (status, body) = send(
            app,
            post_json(
                "/api/prepare-interview",
                json!({
                    "jobUrl": "https://www.indeed.com/viewjob?jk=1",
                    "interviewType": "technical",
                    "resumeText": "Built payment APIs in Go."
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "# Introduction\nHi, I'm your interviewer.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_prepare_interview_quota_is_429_with_details() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(
                json!({"error": {"message": "You exceeded your current quota", "code": "insufficient_quota"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let app = app(FixtureFetcher::serving(INDEED_POSTING), &server.url(), Some("k"));
        let (status, body) = send(
            app,
            post_json(
                "/api/prepare-interview",
                json!({
                    "jobUrl": "https://www.indeed.com/viewjob?jk=1",
                    "interviewType": "behavioral",
                    "resumeText": "resume"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
        assert_eq!(body["details"], "You exceeded your current quota");
    }

    #[tokio::test]
    async fn test_prepare_interview_without_key_fails_before_scraping() {
        let fetcher = FixtureFetcher::serving(INDEED_POSTING);
        let app = app(fetcher.clone(), "http://unused", None);
        let (status, body) = send(
            app,
            post_json(
                "/api/prepare-interview",
                json!({"jobUrl": "https://www.indeed.com/viewjob?jk=1", "interviewType": "general"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "CONFIGURATION_ERROR");
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_prepare_interview_rejects_unknown_type() {
        let fetcher = FixtureFetcher::serving(INDEED_POSTING);
        let app = app(fetcher.clone(), "http://unused", Some("k"));
        let (status, body) = send(
            app,
            post_json(
                "/api/prepare-interview",
                json!({"jobUrl": "https://www.indeed.com/viewjob?jk=1", "interviewType": "panel"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("panel"));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_forwards_context() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r##""role":"assistant","content":"# Introduction\\nWelcome\."##.to_string()),
                Matcher::Regex(r#""role":"user","content":"I led a migration to Kafka\."#.to_string()),
            ]))
            .with_status(200)
            .with_body(completion("What was the hardest part?"))
            .create_async()
            .await;

        let app = app(FixtureFetcher::failing(), &server.url(), Some("k"));
        let (status, body) = send(
            app,
            post_json(
                "/api/chat",
                json!({
                    "message": "I led a migration to Kafka.",
                    "context": [{"role": "assistant", "content": "# Introduction\nWelcome."}]
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "What was the hardest part?");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_forwards_only_newest_twenty_turns() {
        let role = |i: usize| if i % 2 == 0 { "user" } else { "assistant" };
        let context: Vec<Value> = (0..25)
            .map(|i| json!({"role": role(i), "content": format!("turn {i}")}))
            .collect();

        // System prompt directly followed by turn 5, then turns 6..=24 in order, then the new message.
        let forwarded = (5..25)
            .map(|i| format!(r#"\{{"role":"{}","content":"turn {i}"\}}"#, role(i)))
            .collect::<Vec<_>>()
            .join(",");
        let messages = format!(
            r#""messages":\[\{{"role":"system","content":"[^"]*"\}},{forwarded},\{{"role":"user","content":"Next question please"\}}\]"#
        );

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex(messages))
            .with_status(200)
            .with_body(completion("Tell me about turn 24."))
            .create_async()
            .await;

        let app = app(FixtureFetcher::failing(), &server.url(), Some("k"));
        let (status, body) = send(
            app,
            post_json(
                "/api/chat",
                json!({"message": "Next question please", "context": context}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Tell me about turn 24.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let app = app(FixtureFetcher::failing(), "http://unused", Some("k"));
        let (status, _) = send(app, post_json("/api/chat", json!({"message": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_empty_completion_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": null}}]}).to_string())
            .create_async()
            .await;

        let app = app(FixtureFetcher::failing(), &server.url(), Some("k"));
        let (status, body) = send(app, post_json("/api/chat", json!({"message": "Hello"}))).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "EMPTY_RESPONSE");
    }

    #[tokio::test]
    async fn test_completion_check() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("Hello!"))
            .create_async()
            .await;

        let app = app(FixtureFetcher::failing(), &server.url(), Some("k"));
        let request = Request::builder()
            .uri("/api/completion-check")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Hello!");
    }

    fn multipart(field: &str, content: &[u8]) -> Request<Body> {
        let boundary = "X-INTERVIEW-PREP-BOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/extract-resume")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extract_resume_requires_resume_field() {
        let app = app(FixtureFetcher::failing(), "http://unused", None);
        let (status, body) = send(app, multipart("attachment", b"%PDF-1.4")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("resume"));
    }

    #[tokio::test]
    async fn test_extract_resume_rejects_non_pdf() {
        let app = app(FixtureFetcher::failing(), "http://unused", None);
        let (status, body) = send(app, multipart("resume", b"plain text, not a pdf")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "RESUME_ERROR");
    }
}
