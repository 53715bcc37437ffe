use super::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher() -> Dispatcher {
    Dispatcher::new(DispatcherConfig::default()).unwrap()
}

#[tokio::test]
async fn test_dispatch_with_secret_sends_bearer_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hook"))
        .and(header("authorization", "Bearer s1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let job = Job::new(format!("{}/hook", mock_server.uri()), "* * * * *").with_secret("s1");
    let result = dispatcher().dispatch(&job).await;

    assert_eq!(result.outcome, DispatchOutcome::Status(200));
    assert!(result.is_success());
}

#[tokio::test]
async fn test_dispatch_without_secret_omits_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let job = Job::new(format!("{}/hook", mock_server.uri()), "* * * * *");
    let result = dispatcher().dispatch(&job).await;
    assert!(result.is_success());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_dispatch_uses_get_with_no_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let job = Job::new(format!("{}/hook", mock_server.uri()), "* * * * *");
    let result = dispatcher().dispatch(&job).await;
    assert_eq!(result.outcome, DispatchOutcome::Status(204));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_dispatch_non_2xx_is_captured_not_raised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let job = Job::new(format!("{}/hook", mock_server.uri()), "* * * * *");
    let result = dispatcher().dispatch(&job).await;

    assert_eq!(result.outcome, DispatchOutcome::Status(500));
    assert!(!result.is_success());
}

#[tokio::test]
async fn test_dispatch_malformed_endpoint() {
    let job = Job::new("not-a-url", "* * * * *");
    let result = dispatcher().dispatch(&job).await;

    match result.outcome {
        DispatchOutcome::Error(e) => assert!(e.contains("invalid endpoint")),
        other => panic!("expected error outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dispatch_connection_refused() {
    // Port 1 is essentially never listening.
    let job = Job::new("http://127.0.0.1:1/hook", "* * * * *");
    let result = dispatcher().dispatch(&job).await;

    assert!(matches!(result.outcome, DispatchOutcome::Error(_)));
    assert!(!result.is_success());
}

#[tokio::test]
async fn test_dispatch_timeout_is_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let dispatcher = Dispatcher::new(DispatcherConfig {
        request_timeout: std::time::Duration::from_millis(200),
        ..Default::default()
    })
    .unwrap();

    let job = Job::new(format!("{}/slow", mock_server.uri()), "* * * * *");
    let result = dispatcher.dispatch(&job).await;

    assert!(matches!(result.outcome, DispatchOutcome::Error(_)));
}

#[tokio::test]
async fn test_dispatch_result_never_contains_secret() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let job = Job::new(format!("{}/hook", mock_server.uri()), "* * * * *")
        .with_secret("super-secret-token");
    let result = dispatcher().dispatch(&job).await;

    let rendered = format!("{:?} {}", result, result.outcome);
    assert!(!rendered.contains("super-secret-token"));
}

#[test]
fn test_default_config() {
    let config = DispatcherConfig::default();
    assert_eq!(config.request_timeout, std::time::Duration::from_secs(30));
    assert!(config.user_agent.starts_with("pulsehook/"));
}
