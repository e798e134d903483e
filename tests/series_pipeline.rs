mod helpers;

use std::sync::Arc;

use feedhub::config::MalformedValuePolicy;
use feedhub::series::SeriesFetcher;
use feedhub::types::PricePoint;
use feedhub::Error;
use helpers::*;

fn fetcher(upstream: Arc<FakeUpstream>, api_key: Option<&str>) -> SeriesFetcher {
    let config = test_config(api_key, vec![]);
    SeriesFetcher::new(upstream, config.series)
}

#[tokio::test]
async fn sentinel_fixture_round_trip() {
    let upstream = Arc::new(FakeUpstream::new().route(
        SERIES_URL,
        Reply::Body(observations_json(&[
            ("2020-01-01", "5.00"),
            ("2020-02-01", "."),
            ("2020-03-01", "5.50"),
        ])),
    ));

    let points = fetcher(upstream.clone(), Some(TEST_API_KEY)).fetch().await.unwrap();

    assert_eq!(
        points,
        vec![PricePoint::new("2020-01-01", 5.00), PricePoint::new("2020-03-01", 5.50)]
    );
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn sends_one_ascending_monthly_request() {
    let upstream = Arc::new(
        FakeUpstream::new().route(SERIES_URL, Reply::Body(observations_json(&[("2020-01-01", "1")]))),
    );

    fetcher(upstream.clone(), Some(TEST_API_KEY))
        .fetch_series("APU0000708111", "1990-06-01")
        .await
        .unwrap();

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, SERIES_URL);

    let param = |key: &str| {
        requests[0]
            .query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    assert_eq!(param("series_id").as_deref(), Some("APU0000708111"));
    assert_eq!(param("api_key").as_deref(), Some(TEST_API_KEY));
    assert_eq!(param("file_type").as_deref(), Some("json"));
    assert_eq!(param("frequency").as_deref(), Some("m"));
    assert_eq!(param("sort_order").as_deref(), Some("asc"));
    assert_eq!(param("observation_start").as_deref(), Some("1990-06-01"));
}

#[tokio::test]
async fn missing_credential_makes_no_upstream_call() {
    let upstream = Arc::new(
        FakeUpstream::new().route(SERIES_URL, Reply::Body(observations_json(&[("2020-01-01", "1")]))),
    );

    let err = fetcher(upstream.clone(), None).fetch().await.unwrap_err();

    assert!(matches!(err, Error::MissingCredential));
    assert!(err.is_configuration());
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn blank_credential_counts_as_missing() {
    let upstream = Arc::new(FakeUpstream::new());
    let err = fetcher(upstream.clone(), Some("  ")).fetch().await.unwrap_err();
    assert!(matches!(err, Error::MissingCredential));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn non_success_status_fails_whole_request() {
    let upstream = Arc::new(FakeUpstream::new().route(SERIES_URL, Reply::Status(400)));

    let err = fetcher(upstream, Some(TEST_API_KEY)).fetch().await.unwrap_err();

    match err {
        Error::UpstreamStatus { status, .. } => assert_eq!(status, 400),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let upstream = Arc::new(FakeUpstream::new().route(SERIES_URL, Reply::Transport("connection refused")));

    let err = fetcher(upstream.clone(), Some(TEST_API_KEY)).fetch().await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(!err.is_configuration());
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let upstream = Arc::new(FakeUpstream::new().route(SERIES_URL, Reply::Body("<html>oops</html>".into())));

    let err = fetcher(upstream, Some(TEST_API_KEY)).fetch().await.unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn output_is_ascending_and_non_empty() {
    let upstream = Arc::new(FakeUpstream::new().route(
        SERIES_URL,
        Reply::Body(observations_json(&[
            ("2021-03-01", "3.1"),
            ("2021-01-01", "."),
            ("2021-02-01", "2.9"),
            ("2021-01-01", "2.5"),
        ])),
    ));

    let points = fetcher(upstream, Some(TEST_API_KEY)).fetch().await.unwrap();

    assert!(!points.is_empty());
    assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    assert_eq!(points.len(), 3);
}

#[tokio::test]
async fn reject_policy_surfaces_parse_error() {
    let upstream = Arc::new(FakeUpstream::new().route(
        SERIES_URL,
        Reply::Body(observations_json(&[("2020-01-01", "1.0"), ("2020-02-01", "bad")])),
    ));
    let mut config = test_config(Some(TEST_API_KEY), vec![]).series;
    config.malformed_values = MalformedValuePolicy::Reject;

    let err = SeriesFetcher::new(upstream, config).fetch().await.unwrap_err();

    assert!(matches!(err, Error::MalformedObservation { .. }));
}
