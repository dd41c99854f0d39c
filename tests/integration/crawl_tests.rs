//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the decision directory and run
//! the full search, listing, detail and document cycle end-to-end.

use chrono::NaiveDate;
use putusan_scraper::config::Config;
use putusan_scraper::crawler::{ArtifactError, Coordinator, TextConverter};
use putusan_scraper::model::{SearchQuery, COLUMNS};
use putusan_scraper::output::output_file_name;
use putusan_scraper::ScraperError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Reads the downloaded file as if it were already text
struct PlainText;

impl TextConverter for PlainText {
    fn convert(&self, path: &Path) -> Result<String, ArtifactError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.search_url = format!("{}/search.html", base_url);
    config.crawler.workers = 2;
    config.crawler.max_attempts = 2;
    config.crawler.retry_delay = 0;
    config.crawler.request_timeout = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.output_dir = dir.join("putusan").to_string_lossy().into_owned();
    config.output.artifact_dir = dir.join("pdf-putusan").to_string_lossy().into_owned();
    config
}

fn coordinator(config: Config) -> Coordinator {
    Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_converter(Arc::new(PlainText))
        .with_run_date(run_date())
}

fn output_path(dir: &Path, keyword: &str) -> PathBuf {
    dir.join("putusan").join(output_file_name(keyword, run_date()))
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV");
    let header: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

fn listing_page(banner: &str, last_page: u32, details: &[&str]) -> String {
    let pages: String = (2..=last_page)
        .map(|p| format!(r#"<li><a class="page-link" data-ci-pagination-page="{p}" href="?page={p}">{p}</a></li>"#))
        .collect();
    let entries: String = details
        .iter()
        .map(|d| format!(r#"<div class="entri-item"><a href="/direktori/putusan/{d}.html">{d}</a></div>"#))
        .collect();
    format!(
        r#"<html><body>
        <div class="row"><div class="col-md-7">{banner}</div></div>
        <a href="/direktori/index/kategori/pidana.html">Pidana</a>
        {entries}
        <ul class="pagination">{pages}</ul>
        </body></html>"#
    )
}

fn detail_page(number: &str, with_pdf: bool) -> String {
    let pdf = if with_pdf {
        r#"<ul><li><a href="/direktori/download_file/x1/pdf/x1">Download PDF</a></li></ul>"#
    } else {
        ""
    };
    format!(
        r#"<html><body>
        <table class="table">
            <tr><td colspan="2"><h2>Putusan {number}</h2></td></tr>
            <tr><td>Nomor</td><td>{number}</td></tr>
            <tr><td>Tingkat Proses</td><td>Pertama</td></tr>
            <tr><td>Klasifikasi</td><td>Pidana Khusus Korupsi</td></tr>
            <tr><td>Tahun</td><td>2021</td></tr>
            <tr><td>Lembaga Peradilan</td><td>PN SURABAYA</td></tr>
            <tr><td>Amar</td><td>Lain-lain</td></tr>
        </table>
        {pdf}
        </body></html>"#
    )
}

/// Mounts a two-page result set with three decisions
///
/// - d1 links a PDF document
/// - d2 has no document
/// - d3 (on page 2) is unreachable
async fn mount_directory(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search.html"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page("Ditemukan 3 data", 2, &["d1", "d2"])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.html"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page("Ditemukan 3 data", 2, &["d3"])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/direktori/putusan/d1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("1/Pid.Sus-TPK/2021/PN Sby", true)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/direktori/putusan/d2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("2/Pid.Sus-TPK/2021/PN Sby", false)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/direktori/putusan/d3.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/direktori/download_file/x1/pdf/x1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    r#"attachment; filename="putusan_1_pid.sus-tpk_2021_pn_sby.pdf""#,
                )
                .set_body_string("Disclaimer\nMENGADILI\nMenyatakan Terdakwa bersalah\n"),
        )
        .mount(server)
        .await;
}

fn row_for<'a>(rows: &'a [Vec<String>], detail: &str) -> &'a [String] {
    rows.iter()
        .find(|row| row[19].ends_with(&format!("/direktori/putusan/{detail}.html")))
        .unwrap_or_else(|| panic!("no row for {detail}"))
}

#[tokio::test]
async fn test_full_crawl_writes_one_row_per_decision() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_directory(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&base_url, dir.path());
    let query = SearchQuery::new("korupsi", &config.crawler.search_url).unwrap();

    let report = coordinator(config).run(&query).await.expect("Crawl failed");

    assert_eq!(report.pagination.total_results, 3);
    assert_eq!(report.pagination.last_page, 2);
    assert_eq!(report.pages_completed, 2);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.records_written, 3);

    let (header, rows) = read_csv(&output_path(dir.path(), "korupsi"));
    assert_eq!(header, COLUMNS.to_vec());
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == COLUMNS.len()));

    // Metadata and document text
    let d1 = row_for(&rows, "d1");
    assert_eq!(d1[0], "Putusan 1/Pid.Sus-TPK/2021/PN Sby");
    assert_eq!(d1[1], "1/Pid.Sus-TPK/2021/PN Sby");
    assert_eq!(d1[2], "Pertama");
    assert_eq!(d1[3], "Pidana Khusus Korupsi");
    assert_eq!(d1[5], "2021");
    assert_eq!(d1[7], "PN SURABAYA");
    assert_eq!(d1[12], "Lain-lain");
    assert_eq!(d1[20], format!("{}/direktori/download_file/x1/pdf/x1", base_url));
    assert_eq!(d1[21], "putusan_1_pid.sus-tpk_2021_pn_sby.pdf");
    assert_eq!(d1[22], "MENGADILI\nMenyatakan Terdakwa bersalah\n");
    assert!(dir
        .path()
        .join("pdf-putusan")
        .join("putusan_1_pid.sus-tpk_2021_pn_sby.pdf")
        .exists());

    // No document: metadata kept, document columns empty
    let d2 = row_for(&rows, "d2");
    assert_eq!(d2[1], "2/Pid.Sus-TPK/2021/PN Sby");
    assert_eq!(d2[20], "");
    assert_eq!(d2[21], "");
    assert_eq!(d2[22], "");

    // Unreachable: only the link survives
    let d3 = row_for(&rows, "d3");
    assert!(d3[..19].iter().all(String::is_empty));
    assert!(d3[20..].iter().all(String::is_empty));
}

#[tokio::test]
async fn test_rerun_same_day_appends_without_second_header() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());
    let query = SearchQuery::new("korupsi", &config.crawler.search_url).unwrap();

    coordinator(config.clone()).run(&query).await.unwrap();
    coordinator(config).run(&query).await.unwrap();

    let path = output_path(dir.path(), "korupsi");
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("judul,nomor,tingkat_proses").count(), 1);

    let (_, rows) = read_csv(&path);
    assert_eq!(rows.len(), 6);
}

#[tokio::test]
async fn test_missing_result_banner_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Sedang dalam perbaikan</body></html>"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());
    let query = SearchQuery::new("korupsi", &config.crawler.search_url).unwrap();

    let result = coordinator(config).run(&query).await;

    assert!(matches!(result, Err(ScraperError::Pagination { .. })));
    assert!(!output_path(dir.path(), "korupsi").exists());
}

#[tokio::test]
async fn test_keyword_with_separator() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.html"))
        .and(query_param("q", "Pdt.Sus/BPSK"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page("Ditemukan 1 data", 1, &["d2"])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/direktori/putusan/d2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("9/Pdt.Sus-BPSK/2022/PN Mdn", false)))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path());
    let query = SearchQuery::new("Pdt.Sus/BPSK", &config.crawler.search_url).unwrap();

    let report = coordinator(config).run(&query).await.unwrap();
    assert_eq!(report.pagination.last_page, 1);
    assert_eq!(report.records_written, 1);

    let path = dir
        .path()
        .join("putusan")
        .join("putusan_ma_Pdt.Sus BPSK_2024-05-17.csv");
    let (_, rows) = read_csv(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "9/Pdt.Sus-BPSK/2022/PN Mdn");
}
