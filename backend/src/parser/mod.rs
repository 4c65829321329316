//! Loader for the SIPSN waste-generation export.
//!
//! The source table has five positional columns and an untrustworthy header,
//! followed by a units/footnote row. Column names are assigned by position,
//! the footnote row is dropped, and every remaining row is coerced into an
//! [`Observation`]. Any row that fails coercion fails the whole load.

pub mod clean;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{LoadError, LoadResult};
use crate::models::Observation;

pub use clean::{exclude_incomplete_year, CleanedObservations, EXCLUDED_YEAR};

/// Canonical column names, by position.
pub const COLUMNS: [&str; 5] = ["year", "province", "regency", "daily_waste", "annual_waste"];

/// Number of columns every row must have.
pub const COLUMN_COUNT: usize = COLUMNS.len();

/// What the loader detected about the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFormat {
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
    /// Header as found in the source; columns are still read by position
    pub header: Vec<String>,
}

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Validated observations, footnote row removed
    pub observations: Vec<Observation>,
    pub format: SourceFormat,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .map_err(|e| LoadError::Encoding(format!("invalid UTF-8: {}", e))),
        // WHATWG maps the Latin-1 labels to windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => Ok(enc.decode(bytes).0.into_owned()),
            None => Err(LoadError::Encoding(format!("unsupported encoding '{}'", other))),
        },
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ';';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Load the dataset file with auto-detection of encoding and delimiter.
pub fn load_file<P: AsRef<Path>>(path: P) -> LoadResult<LoadedDataset> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading dataset");
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes)
}

/// Load dataset bytes with auto-detection of encoding and delimiter.
pub fn load_bytes(bytes: &[u8]) -> LoadResult<LoadedDataset> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    debug!(%encoding, delimiter = %delimiter.escape_default(), "detected dataset format");

    let (header, observations) = parse_observations(&content, delimiter)?;
    info!(rows = observations.len(), "dataset loaded");

    Ok(LoadedDataset {
        observations,
        format: SourceFormat {
            encoding,
            delimiter,
            header,
        },
    })
}

/// Parse decoded content into observations.
///
/// Returns the source header alongside the rows. The header only has to be
/// five columns wide; its names are discarded. The first record after it is
/// the footnote row and is skipped.
pub fn parse_observations(
    content: &str,
    delimiter: char,
) -> LoadResult<(Vec<String>, Vec<Observation>)> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyDataset);
    }
    if !delimiter.is_ascii() {
        return Err(LoadError::Encoding(format!(
            "delimiter '{}' is not a single-byte character",
            delimiter
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let header = reader.headers()?.clone();
    check_width(1, header.len())?;
    let source_header: Vec<String> = header.iter().map(str::to_string).collect();

    let mut observations = Vec::new();
    let mut footnote_seen = false;

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);

        check_width(line, record.len())?;

        if !footnote_seen {
            footnote_seen = true;
            debug!(line, "dropping footnote row");
            continue;
        }

        observations.push(parse_record(&record, line)?);
    }

    if observations.is_empty() {
        return Err(LoadError::EmptyDataset);
    }

    Ok((source_header, observations))
}

fn check_width(line: u64, found: usize) -> LoadResult<()> {
    if found != COLUMN_COUNT {
        return Err(LoadError::ColumnCount {
            line,
            expected: COLUMN_COUNT,
            found,
        });
    }
    Ok(())
}

fn parse_record(record: &csv::StringRecord, line: u64) -> LoadResult<Observation> {
    let field = |i: usize| record.get(i).unwrap_or("");

    let year = parse_year(field(0), line)?;

    let province = field(1).to_string();
    if province.is_empty() {
        return Err(invalid(line, COLUMNS[1], "", "province must not be empty"));
    }

    let annual_waste = parse_tonnage(field(4), line, COLUMNS[4])?;

    Ok(Observation {
        year,
        province,
        regency: field(2).to_string(),
        daily_waste: field(3).parse::<f64>().ok().filter(|v| v.is_finite()),
        annual_waste,
    })
}

/// Integer year; float literals with no fractional part (`2019.0`) are accepted.
fn parse_year(raw: &str, line: u64) -> LoadResult<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite()
            && v.fract() == 0.0
            && v >= f64::from(i32::MIN)
            && v <= f64::from(i32::MAX) =>
        {
            Ok(v as i32)
        }
        _ => Err(invalid(line, COLUMNS[0], raw, "expected an integer year")),
    }
}

fn parse_tonnage(raw: &str, line: u64, column: &'static str) -> LoadResult<f64> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| invalid(line, column, raw, "expected a number"))?;
    if !value.is_finite() {
        return Err(invalid(line, column, raw, "value must be finite"));
    }
    if value < 0.0 {
        return Err(invalid(line, column, raw, "tonnage cannot be negative"));
    }
    Ok(value)
}

fn invalid(line: u64, column: &'static str, value: &str, message: &str) -> LoadError {
    LoadError::InvalidValue {
        line,
        column,
        value: value.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Tahun;Provinsi;Kabupaten/Kota;Timbulan Harian;Timbulan Tahunan";
    const FOOTNOTE: &str = ";;;(ton);(ton)";

    fn dataset(rows: &[&str]) -> String {
        let mut lines = vec![HEADER, FOOTNOTE];
        lines.extend_from_slice(rows);
        lines.join("\n")
    }

    #[test]
    fn test_parses_rows_positionally() {
        let csv = dataset(&[
            "2019;Jawa Barat;Kab. Bogor;2100.5;766682.5",
            "2020;Bali;Kota Denpasar;900;328500",
        ]);
        let (header, rows) = parse_observations(&csv, ';').unwrap();

        assert_eq!(header.len(), 5);
        assert_eq!(header[1], "Provinsi");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2019);
        assert_eq!(rows[0].province, "Jawa Barat");
        assert_eq!(rows[0].regency, "Kab. Bogor");
        assert_eq!(rows[0].daily_waste, Some(2100.5));
        assert_eq!(rows[0].annual_waste, 766682.5);
        assert_eq!(rows[1].province, "Bali");
    }

    #[test]
    fn test_footnote_row_is_dropped() {
        // The footnote row would fail year coercion if it were parsed
        let csv = dataset(&["2019;Aceh;Kab. Aceh Besar;100;36500"]);
        let (_, rows) = parse_observations(&csv, ';').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].province, "Aceh");
    }

    #[test]
    fn test_float_year_accepted() {
        let csv = dataset(&["2021.0;Aceh;Kab. Aceh Besar;100;36500"]);
        let (_, rows) = parse_observations(&csv, ';').unwrap();
        assert_eq!(rows[0].year, 2021);
    }

    #[test]
    fn test_fractional_year_rejected() {
        let csv = dataset(&["2021.5;Aceh;Kab. Aceh Besar;100;36500"]);
        let err = parse_observations(&csv, ';').unwrap_err();
        match err {
            LoadError::InvalidValue { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "year");
                assert_eq!(value, "2021.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_annual_waste_is_fatal() {
        let csv = dataset(&[
            "2019;Aceh;Kab. Aceh Besar;100;36500",
            "2019;Aceh;Kab. Pidie;100;n/a",
        ]);
        let err = parse_observations(&csv, ';').unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { column: "annual_waste", line: 4, .. }
        ));
    }

    #[test]
    fn test_negative_and_nan_waste_rejected() {
        let negative = dataset(&["2019;Aceh;Kab. Pidie;1;-5"]);
        assert!(parse_observations(&negative, ';').is_err());

        let nan = dataset(&["2019;Aceh;Kab. Pidie;1;NaN"]);
        assert!(parse_observations(&nan, ';').is_err());
    }

    #[test]
    fn test_daily_waste_is_optional() {
        let csv = dataset(&["2019;Aceh;Kab. Pidie;;36500"]);
        let (_, rows) = parse_observations(&csv, ';').unwrap();
        assert_eq!(rows[0].daily_waste, None);
    }

    #[test]
    fn test_empty_province_rejected() {
        let csv = dataset(&["2019;;Kab. Pidie;1;36500"]);
        let err = parse_observations(&csv, ';').unwrap_err();
        assert!(err.to_string().contains("province"));
    }

    #[test]
    fn test_header_width_checked() {
        let csv = "Tahun;Provinsi;Timbulan\n;;\n2019;Aceh;1";
        let err = parse_observations(csv, ';').unwrap_err();
        assert!(matches!(
            err,
            LoadError::ColumnCount { line: 1, expected: 5, found: 3 }
        ));
    }

    #[test]
    fn test_record_width_checked() {
        let csv = dataset(&["2019;Aceh;Kab. Pidie;36500"]);
        let err = parse_observations(&csv, ';').unwrap_err();
        assert!(matches!(err, LoadError::ColumnCount { line: 3, found: 4, .. }));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(matches!(
            parse_observations("", ';').unwrap_err(),
            LoadError::EmptyDataset
        ));

        let only_footnote = format!("{}\n{}", HEADER, FOOTNOTE);
        assert!(matches!(
            parse_observations(&only_footnote, ';').unwrap_err(),
            LoadError::EmptyDataset
        ));
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter(HEADER), ';');
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c,d,e\n1,2,3,4,5"), ',');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_load_bytes_auto() {
        let csv = "Tahun,Provinsi,Kabupaten/Kota,Harian,Tahunan\n,,,(ton),(ton)\n2020,Aceh,Kab. Pidie,10,3650\n";
        let loaded = load_bytes(csv.as_bytes()).unwrap();

        assert_eq!(loaded.format.delimiter, ',');
        assert_eq!(loaded.format.encoding, "utf-8");
        assert_eq!(
            loaded.format.header,
            vec!["Tahun", "Provinsi", "Kabupaten/Kota", "Harian", "Tahunan"]
        );
        assert_eq!(loaded.observations.len(), 1);
    }

    #[test]
    fn test_quoted_fields_with_delimiter() {
        let csv = "Tahun,Provinsi,Kabupaten/Kota,Harian,Tahunan\n,,,(ton),(ton)\n2020,\"Kepulauan Bangka Belitung\",\"Kab. Bangka, Barat\",10,3650\n";
        let loaded = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(loaded.observations[0].regency, "Kab. Bangka, Barat");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_currency_sign() {
        // 0xA4 is the currency sign in Latin-1, the euro sign only in Latin-9
        let decoded = decode_content(&[0xA4], "latin1").unwrap();
        assert_eq!(decoded, "\u{a4}");
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = decode_content(b"abc", "klingon-8").unwrap_err();
        assert!(matches!(err, LoadError::Encoding(_)));
        assert!(decode_content(b"abc", "utf-16le-not").is_err());
    }

    #[test]
    fn test_load_file_missing() {
        let err = load_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waste.csv");
        std::fs::write(&path, dataset(&["2022;Bali;Kab. Badung;500;182500"])).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.observations.len(), 1);
        assert_eq!(loaded.observations[0].year, 2022);
    }
}
