//! 单区间状态机对接真实 HTTP 服务（wiremock）的测试。

use std::sync::Arc;

use reqwest::header::HeaderMap;
use tokio::fs::OpenOptions;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::internal::download::range_fetch::RangeFetch;
use crate::internal::download::structs::ChunkError;
use crate::internal::download::traits::DownloadLinkFetcher;
use crate::internal::range::ByteRange;
use crate::tests::{CountingLinkFetcher, RecordingProgress, destination_of_len, init_test_tracing};

async fn fetch(
    server_url: &str,
    destination: &std::path::Path,
    range: ByteRange,
    link_fetcher: Arc<dyn DownloadLinkFetcher>,
    progress: Arc<RecordingProgress>,
) -> Result<(), ChunkError> {
    let file = OpenOptions::new().write(true).open(destination).await.unwrap();
    RangeFetch {
        transport: Arc::new(reqwest::Client::builder().no_proxy().build().unwrap()),
        url: Url::parse(server_url).unwrap(),
        range,
        file,
        link_fetcher,
        progress,
        headers: HeaderMap::new(),
    }
    .run()
    .await
}

#[tokio::test]
async fn ranges_are_stitched_into_the_file() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file"))
        .and(header("Range", "bytes=0-4"))
        .respond_with(ResponseTemplate::new(206).set_body_string("Hello"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file"))
        .and(header("Range", "bytes=5-9"))
        .respond_with(ResponseTemplate::new(206).set_body_string("World"))
        .mount(&server)
        .await;

    let destination = destination_of_len(10);
    let progress = Arc::new(RecordingProgress::default());
    let fetcher = Arc::new(CountingLinkFetcher::new(&[]));
    let url = format!("{}/file", server.uri());

    let (first, second) = tokio::join!(
        fetch(&url, destination.path(), ByteRange::new(5, 10), fetcher.clone(), progress.clone()),
        fetch(&url, destination.path(), ByteRange::new(0, 5), fetcher.clone(), progress.clone()),
    );
    first.unwrap();
    second.unwrap();

    assert_eq!(std::fs::read(destination.path()).unwrap(), b"HelloWorld");
    assert_eq!(progress.running(), 10);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn forbidden_switches_to_a_fresh_link() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/expired"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fresh"))
        .and(header("Range", "bytes=0-6"))
        .respond_with(ResponseTemplate::new(206).set_body_string("payload"))
        .expect(1)
        .mount(&server)
        .await;

    let destination = destination_of_len(7);
    let progress = Arc::new(RecordingProgress::default());
    let fresh = format!("{}/fresh", server.uri());
    let fetcher = Arc::new(CountingLinkFetcher::new(&[fresh.as_str()]));

    fetch(
        &format!("{}/expired", server.uri()),
        destination.path(),
        ByteRange::new(0, 7),
        fetcher.clone(),
        progress.clone(),
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read(destination.path()).unwrap(), b"payload");
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn full_body_response_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("whole file"))
        .expect(1)
        .mount(&server)
        .await;

    let destination = destination_of_len(10);
    let err = fetch(
        &format!("{}/file", server.uri()),
        destination.path(),
        ByteRange::new(0, 10),
        Arc::new(CountingLinkFetcher::new(&[])),
        Arc::new(RecordingProgress::default()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ChunkError::UnexpectedStatus(status) if status == 200));
    assert_eq!(
        err.to_string(),
        "during GET unexpected status code was returned: 200"
    );
}
