use themekit_http::{HttpClient, HttpClientTrait, HttpConfig, HttpError, StatusCode};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_get_bytes_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/registry.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"a\":1}"))
        .mount(&server)
        .await;

    let client = HttpClient::new(HttpConfig::registry()).unwrap();
    let body = client
        .get_bytes(&format!("{}/registry.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, b"{\"a\":1}".to_vec());
}

#[tokio::test]
async fn test_get_bytes_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = HttpClient::with_defaults().unwrap();
    let err = client
        .get_bytes(&format!("{}/registry.json", server.uri()))
        .await
        .unwrap_err();

    match err {
        HttpError::HttpStatus { status, message } => {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_get_bytes_connection_refused() {
    // Port 9 (discard) is not expected to be listening on loopback
    let client = HttpClient::new(HttpConfig::registry()).unwrap();
    let err = client
        .get_bytes("http://127.0.0.1:9/registry.json")
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::RequestFailed(_)));
}
