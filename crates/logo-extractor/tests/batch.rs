//! Batch runner tests driven by Parquet site tables.

use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use logo_extractor::{dispatch, load_sites, run, ExtractError, ExtractorConfig, ProcessSite, SiteOutcome};
use parquet::data_type::{ByteArray, ByteArrayType};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ─────────────────────── helpers ───────────────────────

/// Write a Parquet file with nullable UTF-8 columns.
fn write_table(file: &Path, columns: &[(&str, Vec<Option<&str>>)]) {
    let fields: String = columns
        .iter()
        .map(|(name, _)| format!("OPTIONAL BYTE_ARRAY {name} (UTF8);"))
        .collect::<Vec<_>>()
        .join(" ");
    let schema = Arc::new(parse_message_type(&format!("message schema {{ {fields} }}")).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(File::create(file).unwrap(), schema, props).unwrap();

    let mut row_group = writer.next_row_group().unwrap();
    for (_, values) in columns {
        let mut column = row_group.next_column().unwrap().unwrap();
        let data: Vec<ByteArray> = values.iter().flatten().map(|s| ByteArray::from(*s)).collect();
        let def_levels: Vec<i16> = values.iter().map(|v| i16::from(v.is_some())).collect();
        column
            .typed::<ByteArrayType>()
            .write_batch(&data, Some(&def_levels), None)
            .unwrap();
        column.close().unwrap();
    }
    row_group.close().unwrap();
    writer.close().unwrap();
}

/// Records every site it is asked to process.
#[derive(Default)]
struct RecordingProcessor {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl ProcessSite for RecordingProcessor {
    async fn process(&self, site: &str, _output_dir: &Path) -> SiteOutcome {
        self.seen.lock().unwrap().push(site.to_string());
        SiteOutcome::NoCandidates
    }
}

fn make_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    img.write_with_encoder(encoder).unwrap();
    buf
}

// ─────────────────────── loading ───────────────────────

#[tokio::test]
async fn duplicates_and_nulls_are_dropped_before_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sites.parquet");
    write_table(
        &table,
        &[(
            "domain",
            vec![Some("a.com"), Some("a.com"), Some("b.com"), None],
        )],
    );

    let sites = load_sites(&table, "domain").unwrap();
    assert_eq!(sites, vec!["a.com", "b.com"]);

    let processor = Arc::new(RecordingProcessor::default());
    let summary = dispatch(sites, dir.path(), processor.clone(), 5).await;

    let mut seen = processor.seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["a.com", "b.com"]);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.no_candidates, 2);
}

#[test]
fn missing_column_lists_available_columns() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sites.parquet");
    write_table(
        &table,
        &[
            ("website", vec![Some("a.com")]),
            ("name", vec![Some("A Inc")]),
        ],
    );

    match load_sites(&table, "domain") {
        Err(ExtractError::MissingColumn {
            column, available, ..
        }) => {
            assert_eq!(column, "domain");
            assert_eq!(available, vec!["website", "name"]);
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn picks_the_requested_column() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sites.parquet");
    write_table(
        &table,
        &[
            ("name", vec![Some("A Inc"), Some("B Inc")]),
            ("website", vec![Some("a.com"), None]),
        ],
    );

    assert_eq!(load_sites(&table, "website").unwrap(), vec!["a.com"]);
}

// ─────────────────────── end to end ───────────────────────

#[tokio::test]
async fn run_extracts_logo_for_each_distinct_site() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<html><head><link rel="shortcut icon" href="/favicon.ico"></head></html>"#.to_vec(),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(make_png(32, 32), "image/x-icon"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sites.parquet");
    let site = server.uri();
    write_table(
        &table,
        &[("domain", vec![Some(site.as_str()), Some(site.as_str()), None])],
    );
    let out = dir.path().join("logo");

    let summary = run(&table, &out, "domain", &ExtractorConfig::default())
        .await
        .unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.downloaded, 1);

    let domain = logo_extractor::domain_of(&site);
    assert!(out.join(format!("{domain} - logo.ico")).is_file());
}

#[tokio::test]
async fn run_with_missing_column_processes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sites.parquet");
    write_table(&table, &[("website", vec![Some("a.com")])]);
    let out = dir.path().join("logo");

    let err = run(&table, &out, "domain", &ExtractorConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::MissingColumn { .. }));
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
}
