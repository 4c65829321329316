use std::collections::HashMap;

use wastemap::{Category, LoadError, PipelineError, WasteReport, EXCLUDED_YEAR};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sipsn_sample.csv");

fn averages(report: &WasteReport) -> HashMap<&str, (f64, usize, Category)> {
    report
        .tables()
        .provinces
        .iter()
        .map(|p| (p.province.as_str(), (p.average, p.years_covered, p.category)))
        .collect()
}

#[test]
fn test_full_pipeline_from_file() {
    let report = WasteReport::load(FIXTURE).expect("Failed to load fixture");
    let info = report.info();

    assert_eq!(info.raw_rows, 16);
    assert_eq!(info.excluded_rows, 3);
    assert_eq!(info.retained_rows, 13);
    let format = info.format.as_ref().unwrap();
    assert_eq!(format.delimiter, ';');
    assert_eq!(format.header.len(), 5);
    assert!(info.source.as_deref().unwrap().ends_with("sipsn_sample.csv"));

    let tables = report.tables();
    assert!(tables.totals.iter().all(|t| t.year != EXCLUDED_YEAR));

    let aceh_2019 = tables
        .totals
        .iter()
        .find(|t| t.year == 2019 && t.province == "Aceh")
        .unwrap();
    assert_eq!(aceh_2019.total, 83_982.5);

    let avg = averages(&report);
    assert_eq!(avg["Aceh"], (79_566.25, 2, Category::Green));
    assert_eq!(avg["Bali"], (657_000.0, 2, Category::Orange));
    assert_eq!(avg["Jawa Barat"], (1_633_375.0, 2, Category::Red));
    assert_eq!(avg["Kalimantan Utara"], (21_900.0, 1, Category::Green));
    assert!(!avg.contains_key("Papua Barat Daya"));

    assert_eq!(tables.without_data, vec!["Papua Barat Daya".to_string()]);
}

#[test]
fn test_category_counts_from_file() {
    let report = WasteReport::load(FIXTURE).unwrap();
    let counts = report.tables().counts;

    assert_eq!(
        counts.entries(),
        [
            (Category::Green, 2),
            (Category::Orange, 1),
            (Category::Red, 1),
        ]
    );
    assert_eq!(counts.total(), report.tables().provinces.len());
}

#[test]
fn test_row_order_does_not_change_tables() {
    let content = std::fs::read_to_string(FIXTURE).unwrap();
    let mut lines: Vec<&str> = content.lines().collect();
    let data = lines.split_off(2);
    let mut shuffled = data.clone();
    shuffled.reverse();
    shuffled.rotate_left(5);
    lines.extend(shuffled);
    let reordered = lines.join("\n");

    let original = WasteReport::from_bytes(content.as_bytes()).unwrap();
    let reordered = WasteReport::from_bytes(reordered.as_bytes()).unwrap();

    assert_eq!(original.tables(), reordered.tables());
}

#[test]
fn test_pipeline_is_idempotent() {
    let first = WasteReport::load(FIXTURE).unwrap();
    let second = WasteReport::load(FIXTURE).unwrap();

    assert_eq!(
        serde_json::to_vec(first.tables()).unwrap(),
        serde_json::to_vec(second.tables()).unwrap()
    );
}

#[test]
fn test_bad_value_aborts_load() {
    let content = std::fs::read_to_string(FIXTURE)
        .unwrap()
        .replace("2020;Bali;Kab. Badung;800.00;292000.00", "2020;Bali;Kab. Badung;800.00;dua ratus");

    let err = WasteReport::from_bytes(content.as_bytes()).unwrap_err();
    match err {
        PipelineError::Load(LoadError::InvalidValue { column, value, .. }) => {
            assert_eq!(column, "annual_waste");
            assert_eq!(value, "dua ratus");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_column_drift_aborts_load() {
    let content = std::fs::read_to_string(FIXTURE)
        .unwrap()
        .replacen("Timbulan Sampah Harian (ton);", "", 1);

    let err = WasteReport::from_bytes(content.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load(LoadError::ColumnCount { line: 1, found: 4, .. })
    ));
}

#[test]
fn test_missing_file_aborts_load() {
    let err = WasteReport::load("tests/fixtures/missing.csv").unwrap_err();
    assert!(matches!(err, PipelineError::Load(LoadError::Io(_))));
}
