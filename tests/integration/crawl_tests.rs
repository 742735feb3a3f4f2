//! Integration tests for the crawler and the catalog collectors
//!
//! These tests use wiremock as a stub transport and exercise dispatch,
//! aggregation and the collectors end-to-end.

use podcast_catalog::catalog::{
    details_request_options, fetch_details, fetch_genres, fetch_shows, load_details,
    save_details, Genre, Show,
};
use podcast_catalog::crawler::{Dispatcher, RequestOptions};
use podcast_catalog::{CatalogError, DecodeError};
use std::collections::HashSet;
use std::num::ParseIntError;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENRES_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Test Page</title>
</head>
<body>
<a class="target" href="http://x.com/podcasts-test1-first/id1">link #1</a>
<a class="target" href="http://x.com/podcasts-test1-second/id2">link #2</a>
<a class="target" href="http://x.com/podcasts-test2-first/id3">link #3</a>
</body>
</html>"#;

const SHOWS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Test Page</title>
</head>
<body>
<a class="target" href="http://x.com/sh/1">Sh1</a>
<a class="target" href="http://x.com/sh/2">Sh2</a>
<a class="target" href="http://x.com/sh/3">Sh3</a>
</body>
</html>"#;

const INVALID_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Test Page</title>
</head>
<body>
<a class="target" href="http://x.com/podcasts-test1-first/idd">invalid</a>
</body>
</html>"#;

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404)
        .set_body_string("<p>error</p>")
        .insert_header("content-type", "text/html")
}

fn lookup_body(id: u64) -> String {
    format!(
        concat!(
            r#"{{"resultCount":1,"results":[{{"collectionId":{id},"#,
            r#""artistName":"Artist {id}","collectionName":"Show {id}","genreIds":["26"],"#,
            r#""artworkURL30":"s","artworkURL60":"m","artworkURL100":"b","#,
            r#""feedUrl":"https://feed/{id}"}}]}}"#
        ),
        id = id
    )
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(reqwest::Client::new())
}

fn body_len(_url: &str, body: &[u8]) -> Result<usize, DecodeError> {
    Ok(body.len())
}

/// Walks an error's source chain looking for a `ParseIntError`
fn find_parse_int_error<'a>(
    err: &'a (dyn std::error::Error + 'static),
) -> Option<&'a ParseIntError> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(parse) = e.downcast_ref::<ParseIntError>() {
            return Some(parse);
        }
        current = e.source();
    }
    None
}

async fn directory_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(GENRES_PAGE))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/shows"))
        .respond_with(html(SHOWS_PAGE))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/invalid"))
        .respond_with(html(INVALID_PAGE))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/404"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_genres_from_web() {
    let server = directory_server().await;
    let client = reqwest::Client::new();

    let genres = fetch_genres(&client, &format!("{}/", server.uri()), ".target")
        .await
        .expect("genre page decodes");

    assert_eq!(genres.len(), 3);
    for expected in [
        Genre::new(1, "test1-first"),
        Genre::new(2, "test1-second"),
        Genre::new(3, "test2-first"),
    ] {
        assert!(genres.contains(&expected), "missing {:?}", expected);
    }
}

#[tokio::test]
async fn test_genres_page_not_found_is_fatal() {
    let server = directory_server().await;
    let client = reqwest::Client::new();

    let err = fetch_genres(&client, &format!("{}/404", server.uri()), ".target")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Not Found");
}

#[tokio::test]
async fn test_genres_page_with_bad_link_is_fatal() {
    let server = directory_server().await;
    let client = reqwest::Client::new();

    let err = fetch_genres(&client, &format!("{}/invalid", server.uri()), ".target")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Decode {
            source: DecodeError::InvalidId { .. },
            ..
        }
    ));
    assert_eq!(err.url(), Some(format!("{}/invalid", server.uri()).as_str()));
}

#[tokio::test]
async fn test_shows_from_web() {
    let server = directory_server().await;

    let options =
        RequestOptions::new(vec![format!("{}/shows", server.uri())]).with_selector(".target");
    let shows = fetch_shows(&dispatcher(), &options).await.unwrap();

    assert!(shows.failures.is_empty());
    assert_eq!(shows.successes.len(), 3);
    for expected in [
        Show::new(1, "http://x.com/sh/1", "Sh1"),
        Show::new(2, "http://x.com/sh/2", "Sh2"),
        Show::new(3, "http://x.com/sh/3", "Sh3"),
    ] {
        assert!(shows.successes.contains(&expected), "missing {:?}", expected);
    }
}

#[tokio::test]
async fn test_shows_batch_isolates_bad_pages() {
    let server = directory_server().await;
    let invalid_url = format!("{}/invalid", server.uri());

    let options = RequestOptions::new(vec![
        format!("{}/shows", server.uri()),
        invalid_url.clone(),
        format!("{}/404", server.uri()),
    ])
    .with_selector(".target");

    let shows = fetch_shows(&dispatcher(), &options).await.unwrap();

    // The good page is unaffected by its failing siblings
    assert_eq!(shows.successes.len(), 3);
    assert_eq!(shows.failures.len(), 2);

    let not_found = shows
        .failures
        .iter()
        .find(|e| matches!(e, CatalogError::HttpStatus { .. }))
        .expect("404 page reported");
    assert_eq!(not_found.to_string(), "Not Found");

    let decode = shows
        .failures
        .iter()
        .find(|e| matches!(e, CatalogError::Decode { .. }))
        .expect("invalid page reported");
    // Attributed to the page that was dispatched, not just the bad link on it
    assert_eq!(decode.url(), Some(invalid_url.as_str()));
    assert!(decode.to_string().contains(&invalid_url));
    assert!(decode.to_string().contains("\"d\""));
    let CatalogError::Decode { source, .. } = decode else {
        unreachable!()
    };
    assert_eq!(source.url(), "http://x.com/podcasts-test1-first/idd");
    let cause = find_parse_int_error(decode).expect("parse error is kept as the cause");
    assert_eq!(cause.to_string(), "invalid digit found in string");
}

#[tokio::test]
async fn test_single_not_found_yields_one_error_envelope() {
    let server = directory_server().await;
    let url = format!("{}/404", server.uri());

    let mut stream = dispatcher().dispatch(vec![url.clone()], Duration::ZERO, body_len);

    let envelope = stream.next().await.expect("one envelope");
    assert_eq!(envelope.url(), url);
    assert!(envelope.entity().is_none());
    assert_eq!(envelope.error().unwrap().to_string(), "Not Found");
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_mixed_batch_accounts_for_every_url() {
    let server = directory_server().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/", server.uri()),
        format!("{}/shows", server.uri()),
        format!("{}/404", server.uri()),
        format!("{}/broken", server.uri()),
        "not a url".to_string(),
        // Nothing listens on port 1
        "http://127.0.0.1:1/".to_string(),
    ];
    let count = urls.len();

    let aggregate = dispatcher()
        .dispatch(urls, Duration::ZERO, body_len)
        .partition()
        .await;

    assert_eq!(aggregate.successes.len() + aggregate.failures.len(), count);
    assert_eq!(aggregate.successes.len(), 2);
    assert!(aggregate
        .failures
        .iter()
        .any(|e| matches!(e, CatalogError::Transport { .. })));
    assert!(aggregate
        .failures
        .iter()
        .any(|e| matches!(e, CatalogError::InvalidUrl { .. })));
    assert!(aggregate
        .failures
        .iter()
        .any(|e| e.to_string() == "Internal Server Error"));
}

#[tokio::test]
async fn test_varying_latencies_deliver_each_url_once() {
    let server = MockServer::start().await;

    // Later URLs answer faster, so completion order differs from input order
    for i in 0..5u64 {
        Mock::given(method("GET"))
            .and(path(format!("/slow/{}", i)))
            .respond_with(html("ok").set_delay(Duration::from_millis(200 - i * 40)))
            .mount(&server)
            .await;
    }

    let urls: Vec<String> = (0..5).map(|i| format!("{}/slow/{}", server.uri(), i)).collect();
    let mut stream = dispatcher().dispatch(urls.clone(), Duration::ZERO, body_len);

    let mut seen = Vec::new();
    while let Some(envelope) = stream.next().await {
        assert!(envelope.is_success());
        seen.push(envelope.url().to_string());
    }

    assert_eq!(seen.len(), 5);
    let unique: HashSet<&String> = seen.iter().collect();
    assert_eq!(unique.len(), 5);
    for url in &urls {
        assert!(unique.contains(url));
    }
}

#[tokio::test]
async fn test_min_interval_staggers_starts() {
    let server = directory_server().await;
    let urls: Vec<String> = (0..3).map(|_| format!("{}/shows", server.uri())).collect();

    let started = Instant::now();
    let aggregate = dispatcher()
        .dispatch(urls, Duration::from_millis(100), body_len)
        .partition()
        .await;

    assert_eq!(aggregate.successes.len(), 3);
    // The third request cannot start before two intervals have passed
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_panicking_decoder_still_yields_envelope() {
    let server = directory_server().await;

    let decoder = |url: &str, _body: &[u8]| -> Result<usize, DecodeError> {
        if url.ends_with("/shows") {
            panic!("decoder bug");
        }
        Ok(0)
    };

    let aggregate = dispatcher()
        .dispatch(
            vec![format!("{}/shows", server.uri()), format!("{}/", server.uri())],
            Duration::ZERO,
            decoder,
        )
        .partition()
        .await;

    assert_eq!(aggregate.successes, vec![0]);
    assert_eq!(aggregate.failures.len(), 1);
    assert!(matches!(
        aggregate.failures[0],
        CatalogError::TaskFailed { .. }
    ));
}

#[tokio::test]
async fn test_details_batch() {
    let server = MockServer::start().await;

    for id in [1u64, 2] {
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("id", id.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(lookup_body(id)))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"resultCount":0,"results":[]}"#),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "4"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let shows: Vec<Show> = (1..=4).map(|id| Show::new(id, "u", "n")).collect();
    let options = details_request_options(
        &shows,
        &format!("{}/lookup?id", server.uri()),
        Duration::from_millis(10),
    );

    let details = fetch_details(&dispatcher(), &options).await;

    assert_eq!(details.len(), 4);
    let mut ids: Vec<u64> = details.successes.iter().map(|d| d.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);

    assert!(details
        .failures
        .iter()
        .any(|e| matches!(
            e,
            CatalogError::Decode {
                source: DecodeError::ShowNotFound { .. },
                ..
            }
        )));
    assert!(details
        .failures
        .iter()
        .any(|e| e.to_string() == "Service Unavailable"));
}

#[tokio::test]
async fn test_details_round_trip_through_file() {
    let server = MockServer::start().await;

    for id in [7u64, 3, 9] {
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("id", id.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(lookup_body(id)))
            .mount(&server)
            .await;
    }

    let shows: Vec<Show> = [7u64, 3, 9].iter().map(|&id| Show::new(id, "u", "n")).collect();
    let options =
        details_request_options(&shows, &format!("{}/lookup?id", server.uri()), Duration::ZERO);
    let details = fetch_details(&dispatcher(), &options).await.successes;
    assert_eq!(details.len(), 3);

    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("details.json");
    save_details(&file, &details).unwrap();

    let loaded = load_details(&file).unwrap();
    assert_eq!(loaded, details);
}

#[tokio::test]
async fn test_details_for_repeated_shows_stay_count_exact() {
    let server = MockServer::start().await;

    for id in [5u64, 6] {
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("id", id.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(lookup_body(id)))
            .mount(&server)
            .await;
    }

    // The same show is listed under two genres
    let shows = vec![
        Show::new(5, "http://x.com/sh/5", "Five"),
        Show::new(6, "http://x.com/sh/6", "Six"),
        Show::new(5, "http://x.com/sh/5", "Five"),
    ];
    let options =
        details_request_options(&shows, &format!("{}/lookup?id", server.uri()), Duration::ZERO);
    assert_eq!(options.urls.len(), 2);

    let details = fetch_details(&dispatcher(), &options).await;

    assert_eq!(details.len(), options.urls.len());
    assert_eq!(details.successes.len(), 2);
    assert!(details.failures.is_empty());
}
