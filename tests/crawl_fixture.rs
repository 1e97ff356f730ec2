//! End-to-end crawl tests against static fixture pages.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use hrb_crawler::error::{AppError, Result};
use hrb_crawler::models::{Config, DateRange};
use hrb_crawler::output::OutputFormat;
use hrb_crawler::pipeline::{CrawlRequest, run_crawler};
use hrb_crawler::services::{PageRequest, RegistrationCrawler};
use hrb_crawler::utils::http::Fetcher;

const SEARCH_URL: &str = "https://www.handelsregisterbekanntmachungen.de/?aktion=suche#Ergebnis";
const DETAIL_BASE: &str = "https://www.handelsregisterbekanntmachungen.de/skripte/hrb.php";

/// Serves canned bodies and records every request.
#[derive(Default)]
struct FixtureFetcher {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<PageRequest>>,
    started: Mutex<Vec<Instant>>,
}

impl FixtureFetcher {
    fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    fn with_delay(mut self, url: impl Into<String>, millis: u64) -> Self {
        self.delays.insert(url.into(), Duration::from_millis(millis));
        self
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn start_times(&self) -> Vec<Instant> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.started.lock().unwrap().push(Instant::now());

        let url = request.url().to_string();
        if let Some(delay) = self.delays.get(&url) {
            tokio::time::sleep(*delay).await;
        }
        self.pages
            .get(&url)
            .cloned()
            .ok_or_else(|| AppError::crawl(url, "404 Not Found"))
    }
}

/// Shared handle so tests can inspect requests after the crawler is done.
struct SharedFetcher(Arc<FixtureFetcher>);

#[async_trait]
impl Fetcher for SharedFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<String> {
        self.0.fetch(request).await
    }
}

fn detail_url(rb_id: &str) -> String {
    format!("{DETAIL_BASE}?rb_id={rb_id}&land_abk=bw")
}

fn results_page(rb_ids: &[&str]) -> String {
    let items: String = rb_ids
        .iter()
        .map(|id| {
            format!(
                "<li><a href=\"javascript:NeuFenster('rb_id={id}&land_abk=bw')\">Firma {id}</a></li>\n"
            )
        })
        .collect();
    format!(
        "<html><body><ul>{items}<li><a href=\"/hilfe.html\">Hilfe</a></li></ul></body></html>"
    )
}

fn detail_page(reg_no: &str, name: &str, city: &str, street: &str, postal: &str) -> String {
    format!(
        "<html><body><font face=\"Arial\"><table>\
         <tr><td>Amtsgericht {city} Aktenzeichen: {reg_no}\nBekannt gemacht am: 12.03.2024 15:00 Uhr\n</td></tr>\
         <tr><td></td></tr>\
         <tr><td>Neueintragungen</td></tr>\
         <tr><td></td></tr>\
         <tr><td>12.03.2024</td></tr>\
         <tr><td>{reg_no}: {name}, {city}, {street}, {postal} {city}.</td></tr>\
         </table></font></body></html>"
    )
}

fn range() -> DateRange {
    let day = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
    DateRange::new(day, day)
}

fn crawler(fetcher: &Arc<FixtureFetcher>) -> RegistrationCrawler<SharedFetcher> {
    crawler_with(Config::default(), fetcher)
}

fn crawler_with(config: Config, fetcher: &Arc<FixtureFetcher>) -> RegistrationCrawler<SharedFetcher> {
    RegistrationCrawler::new(Arc::new(config), SharedFetcher(Arc::clone(fetcher))).unwrap()
}

#[tokio::test]
async fn two_links_trigger_two_detail_fetches() {
    let fetcher = Arc::new(
        FixtureFetcher::default()
            .with_page(SEARCH_URL, results_page(&["100", "200"]))
            .with_page(
                detail_url("100"),
                detail_page("HRB 100", "Alpha GmbH", "Stuttgart", "Hauptstr. 1", "70173"),
            )
            .with_page(
                detail_url("200"),
                detail_page("HRB 200", "Beta AG", "Ulm", "Bahnhofstr. 2", "89073"),
            ),
    );

    let outcome = crawler(&fetcher).collect(&range()).await.unwrap();

    let requests = fetcher.requests();
    assert_eq!(requests.len(), 3);
    assert!(matches!(&requests[0], PageRequest::PostForm { url, .. } if url == SEARCH_URL));

    let detail_urls: Vec<&str> = requests[1..].iter().map(|r| r.url()).collect();
    assert_eq!(detail_urls, vec![detail_url("100"), detail_url("200")]);

    assert_eq!(outcome.detail_total, 2);
    assert_eq!(outcome.detail_failures, 0);
    assert_eq!(outcome.registrations.len(), 2);

    let alpha = &outcome.registrations[0];
    assert_eq!(alpha.reg_no, "HRB 100");
    assert_eq!(
        alpha.date,
        Some(Utc.with_ymd_and_hms(2024, 3, 12, 15, 0, 0).unwrap())
    );
    assert_eq!(alpha.name, "Alpha GmbH");
    assert_eq!(alpha.city, "Stuttgart");
    assert_eq!(alpha.address, "Hauptstr. 1");
    assert_eq!(alpha.postal_code, "70173");
}

#[tokio::test]
async fn search_form_carries_date_range() {
    let fetcher = Arc::new(FixtureFetcher::default().with_page(SEARCH_URL, results_page(&[])));
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

    let outcome = crawler(&fetcher)
        .collect(&DateRange::new(start, end))
        .await
        .unwrap();
    assert!(outcome.registrations.is_empty());

    let requests = fetcher.requests();
    assert_eq!(requests.len(), 1);
    let PageRequest::PostForm { form, .. } = &requests[0] else {
        panic!("search must be a form post");
    };
    let value = |key: &str| {
        form.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap()
    };
    assert_eq!(value("vt"), "5");
    assert_eq!(value("vm"), "1");
    assert_eq!(value("vj"), "2024");
    assert_eq!(value("bt"), "29");
    assert_eq!(value("bm"), "2");
    assert_eq!(value("bj"), "2024");
    assert_eq!(value("order"), "4");
}

#[tokio::test]
async fn records_keep_discovery_order() {
    // The first detail page answers last.
    let fetcher = Arc::new(
        FixtureFetcher::default()
            .with_page(SEARCH_URL, results_page(&["1", "2", "3"]))
            .with_page(
                detail_url("1"),
                detail_page("HRB 1", "Erste GmbH", "Stuttgart", "A-Str. 1", "70173"),
            )
            .with_page(
                detail_url("2"),
                detail_page("HRB 2", "Zweite GmbH", "Stuttgart", "B-Str. 2", "70174"),
            )
            .with_page(
                detail_url("3"),
                detail_page("HRB 3", "Dritte GmbH", "Stuttgart", "C-Str. 3", "70176"),
            )
            .with_delay(detail_url("1"), 60)
            .with_delay(detail_url("2"), 30),
    );

    let outcome = crawler(&fetcher).collect(&range()).await.unwrap();
    let reg_nos: Vec<&str> = outcome
        .registrations
        .iter()
        .map(|r| r.reg_no.as_str())
        .collect();
    assert_eq!(reg_nos, vec!["HRB 1", "HRB 2", "HRB 3"]);
}

#[tokio::test]
async fn request_delay_spaces_detail_fetches() {
    let fetcher = Arc::new(
        FixtureFetcher::default()
            .with_page(SEARCH_URL, results_page(&["1", "2"]))
            .with_page(
                detail_url("1"),
                detail_page("HRB 1", "Erste GmbH", "Ulm", "Weg 1", "89073"),
            )
            .with_page(
                detail_url("2"),
                detail_page("HRB 2", "Zweite GmbH", "Ulm", "Weg 2", "89075"),
            ),
    );
    let mut config = Config::default();
    config.crawler.max_concurrent = 1;
    config.crawler.request_delay_ms = 40;

    let outcome = crawler_with(config, &fetcher)
        .collect(&range())
        .await
        .unwrap();
    assert_eq!(outcome.registrations.len(), 2);

    let started = fetcher.start_times();
    assert_eq!(started.len(), 3);
    let pause = Duration::from_millis(40);
    assert!(started[1] - started[0] >= pause);
    assert!(started[2] - started[1] >= pause);
}

#[tokio::test]
async fn repeated_links_yield_repeated_records() {
    let fetcher = Arc::new(
        FixtureFetcher::default()
            .with_page(SEARCH_URL, results_page(&["7", "7"]))
            .with_page(
                detail_url("7"),
                detail_page("HRB 7", "Doppel KG", "Ulm", "Ring 7", "89073"),
            ),
    );

    let outcome = crawler(&fetcher).collect(&range()).await.unwrap();
    assert_eq!(fetcher.requests().len(), 3);
    assert_eq!(outcome.registrations.len(), 2);
    assert_eq!(outcome.registrations[0], outcome.registrations[1]);
}

#[tokio::test]
async fn failed_detail_page_does_not_abort() {
    let fetcher = Arc::new(
        FixtureFetcher::default()
            .with_page(SEARCH_URL, results_page(&["10", "11", "12"]))
            .with_page(
                detail_url("10"),
                detail_page("HRB 10", "Eins GmbH", "Ulm", "Weg 1", "89073"),
            )
            .with_page(
                detail_url("12"),
                detail_page("HRB 12", "Drei GmbH", "Ulm", "Weg 3", "89075"),
            ),
    );

    let outcome = crawler(&fetcher).collect(&range()).await.unwrap();
    assert_eq!(outcome.detail_total, 3);
    assert_eq!(outcome.detail_failures, 1);
    assert_eq!(outcome.registrations.len(), 2);
    assert_eq!(outcome.registrations[1].reg_no, "HRB 12");
}

#[tokio::test]
async fn detail_page_without_announcement_is_skipped() {
    let fetcher = Arc::new(
        FixtureFetcher::default()
            .with_page(SEARCH_URL, results_page(&["5"]))
            .with_page(detail_url("5"), "<html><body><p>Sitzung abgelaufen</p></body></html>"),
    );

    let outcome = crawler(&fetcher).collect(&range()).await.unwrap();
    assert!(outcome.registrations.is_empty());
    assert_eq!(outcome.detail_skipped, 1);
    assert_eq!(outcome.detail_failures, 0);
}

#[tokio::test]
async fn short_detail_page_yields_partial_record() {
    let short = "<html><body><font><table>\
                 <tr><td>Aktenzeichen: HRB 3\nBekannt gemacht am: 01.02.2024 14:30 Uhr\n</td></tr>\
                 <tr><td>x</td></tr>\
                 <tr><td>y</td></tr>\
                 </table></font></body></html>";
    let fetcher = Arc::new(
        FixtureFetcher::default()
            .with_page(SEARCH_URL, results_page(&["3"]))
            .with_page(detail_url("3"), short),
    );

    let outcome = crawler(&fetcher).collect(&range()).await.unwrap();
    let reg = &outcome.registrations[0];
    assert_eq!(reg.reg_no, "HRB 3");
    assert_eq!(
        reg.date,
        Some(Utc.with_ymd_and_hms(2024, 2, 1, 14, 30, 0).unwrap())
    );
    assert!(reg.name.is_empty());
    assert!(reg.address.is_empty());
    assert!(reg.city.is_empty());
    assert!(reg.postal_code.is_empty());
}

#[tokio::test]
async fn failed_search_is_fatal() {
    let fetcher = Arc::new(FixtureFetcher::default());

    let err = crawler(&fetcher).collect(&range()).await.unwrap_err();
    assert!(matches!(err, AppError::Crawl { ref context, .. } if context == "search"));
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn run_crawler_exports_csv_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("registrations.csv");
    let fetcher = FixtureFetcher::default()
        .with_page(SEARCH_URL, results_page(&["100"]))
        .with_page(
            detail_url("100"),
            detail_page("HRB 100", "Alpha GmbH", "Stuttgart", "Hauptstr. 1", "70173"),
        );

    let request = CrawlRequest {
        range: range(),
        format: OutputFormat::Csv,
        output: Some(output.clone()),
    };
    let stats = run_crawler(Arc::new(Config::default()), fetcher, &request)
        .await
        .unwrap();
    assert_eq!(stats.registration_count, 1);

    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        text,
        "RegNo;Date;Name;Address;City;PostalCode\n\
         HRB 100;2024-03-12 15:00:00 +0000 UTC;Alpha GmbH;Hauptstr. 1;Stuttgart;70173\n"
    );
}

#[tokio::test]
async fn run_crawler_rejects_invalid_config_before_fetching() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let mut config = Config::default();
    config.crawler.max_concurrent = 0;

    let request = CrawlRequest {
        range: range(),
        format: OutputFormat::Jsonl,
        output: None,
    };
    let result = run_crawler(Arc::new(config), SharedFetcher(Arc::clone(&fetcher)), &request).await;
    assert!(matches!(result, Err(AppError::Config(_))));
    assert!(fetcher.requests().is_empty());
}
