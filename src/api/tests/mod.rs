use super::*;
use crate::api::routes::{LIVENESS_MESSAGE, MISSING_URL_MESSAGE};
use crate::error::PIPELINE_FAILURE_SUMMARY;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use std::io::Cursor;
use std::time::Duration;
use tower::ServiceExt; // for oneshot()
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_app(config: Config) -> Router {
    let config = Arc::new(config);
    let bundler = Arc::new(AssetBundler::new(&config).unwrap());
    create_router(bundler, config)
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn zip_names(bytes: Vec<u8>) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

fn encode(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

#[tokio::test]
async fn test_root_returns_liveness_message() {
    let response = get(create_test_app(Config::default()), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(body, LIVENESS_MESSAGE);
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = get(create_test_app(Config::default()), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["bind_address"], "0.0.0.0:3001");
}

#[tokio::test]
async fn test_health_reports_configured_bind_address() {
    let mut config = Config::default();
    config.apply_port("8088").unwrap();

    let response = get(create_test_app(config), "/health").await;

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["bind_address"], "0.0.0.0:8088");
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let response = get(create_test_app(Config::default()), "/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(json["paths"]["/download"].is_object());
}

#[tokio::test]
async fn test_missing_url_is_400() {
    for uri in ["/download", "/download?url=", "/download?other=1"] {
        let response = get(create_test_app(Config::default()), uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json, serde_json::json!({ "error": MISSING_URL_MESSAGE }));
    }
}

/// Counts fetch calls; every call fails
#[derive(Default)]
struct CountingFetcher {
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait::async_trait]
impl crate::fetcher::Fetcher for CountingFetcher {
    async fn fetch(
        &self,
        url: &url::Url,
        _options: crate::fetcher::FetchOptions,
    ) -> std::result::Result<bytes::Bytes, crate::error::FetchError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Err(crate::error::FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

#[tokio::test]
async fn test_missing_url_performs_no_network_activity() {
    let fetcher = Arc::new(CountingFetcher::default());
    let config = Arc::new(Config::default());
    let bundler = Arc::new(AssetBundler::with_fetcher(fetcher.clone(), &config));
    let app = create_router(bundler, config);

    let response = get(app, "/download").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        fetcher.calls.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn test_malformed_url_is_400() {
    let uri = format!("/download?url={}", encode("not a url"));
    let response = get(create_test_app(Config::default()), &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Invalid URL"));
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_download_returns_zip_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<link rel="stylesheet" href="/s.css"><script src="/a.js"></script>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/s.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body{}"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("run()"))
        .mount(&server)
        .await;

    let uri = format!("/download?url={}", encode(&format!("{}/", server.uri())));
    let response = get(create_test_app(Config::default()), &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/zip"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"127.0.0.1-assets.zip\""
    );
    assert_eq!(
        zip_names(body_bytes(response).await),
        vec!["css/s.css", "index.html", "js/a.js"]
    );
}

#[tokio::test]
async fn test_unreachable_page_is_500_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let uri = format!("/download?url={}", encode(&format!("{}/page", server.uri())));
    let response = get(create_test_app(Config::default()), &uri).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"], PIPELINE_FAILURE_SUMMARY);
    assert!(json["details"].as_str().unwrap().contains("502"));
}

#[tokio::test]
async fn test_cors_enabled() {
    let request = Request::builder()
        .uri("/")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app(Config::default())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = Config::default();
    config.api.cors_enabled = false;

    let request = Request::builder()
        .uri("/")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app(config).oneshot(request).await.unwrap();

    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_specific_origins() {
    let mut config = Config::default();
    config.api.cors_origins = vec!["http://allowed.test".to_string()];
    let app = create_test_app(config);

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("Origin", "http://allowed.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://allowed.test"
    );

    let denied = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("Origin", "http://evil.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!denied.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_server_starts_and_serves_liveness() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_handle = tokio::spawn(async move {
        let app = create_test_app(Config::default());
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), LIVENESS_MESSAGE);

    server_handle.abort();
}
