use crate::common::{create_test_config, listing_page, print_item, show_more, NoPrompt};
use crossword_fetch::crawler::{crawl, Crawler};
use crossword_fetch::query::SearchQuery;
use crossword_fetch::session::{Credentials, Session};
use crossword_fetch::CrosswordError;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_single_page_returns_links_in_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let page = listing_page(
        &[
            print_item(&format!("{}/print/303", base_url)),
            print_item(&format!("{}/print/101", base_url)),
            print_item(&format!("{}/print/202", base_url)),
        ],
        None,
    );
    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(page))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let links = crawler
        .fetch_links(&format!("{}/puzzles-list", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(
        links,
        vec![
            format!("{}/print/303", base_url),
            format!("{}/print/101", base_url),
            format!("{}/print/202", base_url),
        ]
    );
}

#[tokio::test]
async fn test_two_pages_are_concatenated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let first = listing_page(
        &[print_item("/print/1"), print_item("/print/2")],
        Some(show_more("/puzzles-list/more?page=2")),
    );
    let second = listing_page(&[print_item("/print/3")], None);

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(first))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/puzzles-list/more"))
        .and(query_param("page", "2"))
        .respond_with(html(second))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let links = crawler
        .fetch_links(&format!("{}/puzzles-list", base_url))
        .await
        .unwrap();

    assert_eq!(
        links,
        vec![
            format!("{}/print/1", base_url),
            format!("{}/print/2", base_url),
            format!("{}/print/3", base_url),
        ]
    );
}

#[tokio::test]
async fn test_empty_page_ignores_show_more() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(listing_page(&[], Some(show_more("/page2")))))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html(listing_page(&[print_item("/print/9")], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let links = crawler
        .fetch_links(&format!("{}/puzzles-list", base_url))
        .await
        .unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_show_more_loop_stops() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    // The page links to itself
    let page = listing_page(
        &[print_item("/print/1")],
        Some(show_more(&format!("{}/puzzles-list", base_url))),
    );
    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(page))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let links = crawler
        .fetch_links(&format!("{}/puzzles-list", base_url))
        .await
        .unwrap();
    assert_eq!(links, vec![format!("{}/print/1", base_url)]);
}

#[tokio::test]
async fn test_listing_failure_carries_url_and_status() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let url = format!("{}/puzzles-list", base_url);
    let err = crawler.fetch_links(&url).await.unwrap_err();

    match err {
        CrosswordError::Fetch {
            url: failed,
            status,
        } => {
            assert_eq!(failed, url);
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("Expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_page_failure_aborts_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(listing_page(
            &[print_item("/print/1")],
            Some(show_more("/page2")),
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let result = crawler
        .fetch_links(&format!("{}/puzzles-list", base_url))
        .await;
    assert!(matches!(result, Err(CrosswordError::Fetch { .. })));
}

#[tokio::test]
async fn test_download_and_save_writes_body() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let body: Vec<u8> = b"%PDF-1.4\n\x00\x01\xfe\xff binary tail".to_vec();
    Mock::given(method("GET"))
        .and(path("/path/document123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.clone())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let saved = crawler
        .download_and_save(&format!("{}/path/document123", base_url))
        .await
        .unwrap();

    assert_eq!(saved, dir.path().join("out").join("document123.pdf"));
    assert_eq!(std::fs::read(&saved).unwrap(), body);
}

#[tokio::test]
async fn test_download_overwrites_existing_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/print/42"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    std::fs::write(dir.path().join("out").join("42.pdf"), b"old content").unwrap();

    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();
    let saved = crawler
        .download_and_save(&format!("{}/print/42", base_url))
        .await
        .unwrap();

    assert_eq!(std::fs::read(saved).unwrap(), b"new");
}

#[tokio::test]
async fn test_get_crosswords_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .and(query_param("filter[puzzle_type]", "8"))
        .and(query_param("filter[publish_at][from]", "01/01/2020"))
        .and(query_param("filter[publish_at][to]", "31/01/2020"))
        .respond_with(html(listing_page(
            &[print_item("/print/m1"), print_item("/print/m2")],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/print/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"one".to_vec()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/print/m2"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"two".to_vec()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let query = SearchQuery::new("8", "01/01/2020", "31/01/2020");
    let report = crawler.get_crosswords(&query, false).await.unwrap();

    let out = dir.path().join("out");
    assert_eq!(report.found, 2);
    assert_eq!(report.saved, vec![out.join("m1.pdf"), out.join("m2.pdf")]);
    assert_eq!(std::fs::read(out.join("m1.pdf")).unwrap(), b"one");
    assert_eq!(std::fs::read(out.join("m2.pdf")).unwrap(), b"two");
    assert!(report.search_url.starts_with(&format!("{}/puzzles-list?search=", base_url)));
}

#[tokio::test]
async fn test_crawl_uses_saved_credentials_and_saves_jar() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(listing_page(&[print_item("/print/7")], None)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/print/7"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"seven".to_vec()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    Credentials::new("A", "B")
        .save(std::path::Path::new(&config.session.credentials_path))
        .unwrap();

    let query = SearchQuery::new("2", "01/01/2020", "02/01/2020");
    let report = crawl(&config, &query, false, &mut NoPrompt).await.unwrap();

    assert_eq!(report.saved.len(), 1);
    assert!(std::path::Path::new(&config.session.cache_path).exists());
}

#[tokio::test]
async fn test_crawl_saves_jar_when_listing_fails() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    Credentials::new("A", "B")
        .save(std::path::Path::new(&config.session.credentials_path))
        .unwrap();

    let query = SearchQuery::new("2", "01/01/2020", "02/01/2020");
    let result = crawl(&config, &query, false, &mut NoPrompt).await;

    assert!(matches!(result, Err(CrosswordError::Fetch { .. })));
    assert!(std::path::Path::new(&config.session.cache_path).exists());
}

#[tokio::test]
async fn test_show_more_back_to_unescaped_start_url_stops() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    // The start URL carries a raw space; the page links back to its encoded form
    let page = listing_page(
        &[print_item("/print/1")],
        Some(show_more("/puzzles-list?search=&filter[puzzle_type]=a%20b")),
    );
    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(page))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path());
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let links = crawler
        .fetch_links(&format!(
            "{}/puzzles-list?search=&filter[puzzle_type]=a b",
            base_url
        ))
        .await
        .unwrap();
    assert_eq!(links, vec![format!("{}/print/1", base_url)]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_get_crosswords_hands_each_file_to_print_command() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/puzzles-list"))
        .respond_with(html(listing_page(
            &[print_item("/print/p1"), print_item("/print/p2")],
            None,
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/print/p[12]$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .mount(&mock_server)
        .await;

    // `rm` stands in for `lp`, so every file handed over disappears
    let mut config = create_test_config(&base_url, dir.path());
    config.download.print_command = "rm".to_string();
    let session = Session::with_credentials(&config, Credentials::new("A", "B")).unwrap();
    let crawler = Crawler::new(&session, &config).unwrap();

    let query = SearchQuery::new("8", "01/01/2020", "31/01/2020");
    let report = crawler.get_crosswords(&query, true).await.unwrap();
    assert_eq!(report.saved.len(), 2);

    for _ in 0..100 {
        if report.saved.iter().all(|saved| !saved.exists()) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    for saved in &report.saved {
        assert!(!saved.exists(), "{} was not printed", saved.display());
    }
}
