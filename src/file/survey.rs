// src/file/survey.rs
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::Encoding;
use log::{info, warn};
use crate::config::{BarrierCategory, Indicator, Record, Response, UNKNOWN_VALUE};
use crate::error::{HygieneError, Result};

pub const COMPANY_ID_COLUMN: &str = "ID_entreprise";
pub const LOCATION_COLUMN: &str = "Localisation";
// The survey export spells this header with a stray space
pub const PRODUCT_TYPE_COLUMNS: [&str; 2] = ["Type _de_produit", "Type_de_produit"];
pub const STAFF_SIZE_COLUMN: &str = "Effectif_du_personnel";
pub const TRAINING_COLUMN: &str = "Formation_reçue";
pub const OTHER_OBSTACLES_COLUMN: &str = "Autres_obstacles";

/// Identifies one version of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModificationMarker {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl ModificationMarker {
    pub fn read(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
        if !metadata.is_file() {
            return Err(HygieneError::FileNotFound(path.display().to_string()));
        }
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified.map(DateTime::<Utc>::from)
    }
}

/// Survey rows loaded from one CSV file. Immutable once built.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    records: Vec<Record>,
    path: PathBuf,
    encoding: String,
    marker: ModificationMarker,
    loaded_at: DateTime<Utc>,
    column_count: usize,
    unknown_cells: usize,
}

impl SurveyTable {
    /// Builds a table from records already in memory, counting every
    /// column as present.
    pub fn from_records(records: Vec<Record>) -> Self {
        let unknown_cells = records.iter()
            .map(|r| unknown_fields(r, [true; 5]))
            .sum();

        Self {
            records,
            path: PathBuf::from("<memory>"),
            encoding: "utf-8".to_string(),
            marker: ModificationMarker { modified: None, len: 0 },
            loaded_at: Utc::now(),
            // Company id, five descriptive fields, nine practices, four barriers
            column_count: 19,
            unknown_cells,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn marker(&self) -> ModificationMarker {
        self.marker
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Number of columns in the header row.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Cells whose loaded value is unknown: Unknown answers (including
    /// unrecognised ones) and empty or "Inconnu" descriptive fields, over the
    /// columns present.
    pub fn unknown_cells(&self) -> usize {
        self.unknown_cells
    }

    /// Distinct company identifiers in file order.
    pub fn company_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for record in &self.records {
            if !ids.contains(&record.company_id) {
                ids.push(record.company_id.clone());
            }
        }
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads and validates the survey CSV at `path`.
pub fn load_survey(path: &Path, encoding_label: &str) -> Result<SurveyTable> {
    let marker = ModificationMarker::read(path)?;
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    let content = decode(&bytes, encoding_label, path)?;

    if content.trim().is_empty() {
        return Err(HygieneError::EmptyFile(path.display().to_string()));
    }

    let parsed = parse_survey(&content)?;
    if parsed.coerced_cells > 0 {
        warn!(
            "{}: {} unrecognised answers mapped to {}",
            path.display(),
            parsed.coerced_cells,
            UNKNOWN_VALUE
        );
    }
    info!("Loaded {} records from {}", parsed.records.len(), path.display());

    Ok(SurveyTable {
        records: parsed.records,
        path: path.to_path_buf(),
        encoding: encoding_label.to_string(),
        marker,
        loaded_at: Utc::now(),
        column_count: parsed.column_count,
        unknown_cells: parsed.unknown_cells,
    })
}

fn io_error(path: &Path, err: std::io::Error) -> HygieneError {
    if err.kind() == ErrorKind::NotFound {
        HygieneError::FileNotFound(path.display().to_string())
    } else {
        HygieneError::Io(err)
    }
}

// Unknown cells of one record. `present` flags location, product type,
// staff size, training and other obstacles.
fn unknown_fields(record: &Record, present: [bool; 5]) -> usize {
    let answers = record.practices.iter()
        .chain(record.barriers.iter())
        .filter(|response| **response == Response::Unknown)
        .count();
    let fields = [&record.location, &record.product_type, &record.staff_size, &record.training_received]
        .iter()
        .zip(present)
        .filter(|(value, present)| *present && value.as_str() == UNKNOWN_VALUE)
        .count();
    let obstacles = match record.other_obstacles.as_deref() {
        _ if !present[4] => 0,
        None | Some(UNKNOWN_VALUE) => 1,
        Some(_) => 0,
    };
    answers + fields + obstacles
}

/// A BOM overrides the declared encoding. Malformed input is an error.
fn decode(bytes: &[u8], encoding_label: &str, path: &Path) -> Result<String> {
    let label = encoding_label.trim().to_lowercase();
    let label = label.strip_suffix("-sig").unwrap_or(&label);
    let declared = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| HygieneError::UnknownEncoding(encoding_label.to_string()))?;

    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| HygieneError::Undecodable {
            path: path.display().to_string(),
            encoding: encoding.name().to_string(),
        })
}

#[derive(Debug)]
pub(crate) struct ParsedSurvey {
    pub records: Vec<Record>,
    pub column_count: usize,
    pub unknown_cells: usize,
    pub coerced_cells: usize,
}

// Column positions resolved once from the header row.
struct ColumnMap {
    company_id: usize,
    practices: [usize; 9],
    barriers: [usize; 4],
    location: Option<usize>,
    product_type: Option<usize>,
    staff_size: Option<usize>,
    training: Option<usize>,
    other_obstacles: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let positions: HashMap<&str, usize> = headers.iter()
            .enumerate()
            .map(|(i, name)| (name.trim_start_matches('\u{feff}').trim(), i))
            .collect();

        let mut missing = Vec::new();
        let mut require = |name: &str| -> usize {
            match positions.get(name) {
                Some(&i) => i,
                None => {
                    missing.push(name.to_string());
                    0
                }
            }
        };

        let company_id = require(COMPANY_ID_COLUMN);
        let practices = Indicator::ALL.map(|indicator| require(indicator.column()));
        let barriers = BarrierCategory::ALL.map(|category| require(category.column()));

        if !missing.is_empty() {
            return Err(HygieneError::MissingColumns(missing));
        }

        let optional = |name: &str| positions.get(name).copied();
        Ok(Self {
            company_id,
            practices,
            barriers,
            location: optional(LOCATION_COLUMN),
            product_type: PRODUCT_TYPE_COLUMNS.iter().find_map(|name| optional(name)),
            staff_size: optional(STAFF_SIZE_COLUMN),
            training: optional(TRAINING_COLUMN),
            other_obstacles: optional(OTHER_OBSTACLES_COLUMN),
        })
    }
}

impl ColumnMap {
    fn present(&self) -> [bool; 5] {
        [
            self.location.is_some(),
            self.product_type.is_some(),
            self.staff_size.is_some(),
            self.training.is_some(),
            self.other_obstacles.is_some(),
        ]
    }
}

pub(crate) fn parse_survey(content: &str) -> Result<ParsedSurvey> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(HygieneError::EmptyFile("header row is blank".to_string()));
    }
    let columns = ColumnMap::resolve(&headers)?;

    let mut records = Vec::new();
    let mut unknown_cells = 0;
    let mut coerced_cells = 0;

    for row in reader.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).unwrap_or("");
        let text = |i: Option<usize>| match i.map(cell) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => UNKNOWN_VALUE.to_string(),
        };
        let mut response = |i: usize| {
            let raw = cell(i);
            if !Response::is_recognised(raw) {
                coerced_cells += 1;
            }
            Response::parse(raw)
        };

        let practices = columns.practices.map(&mut response);
        let barriers = columns.barriers.map(&mut response);

        let record = Record {
            company_id: cell(columns.company_id).to_string(),
            location: text(columns.location),
            product_type: text(columns.product_type),
            staff_size: text(columns.staff_size),
            training_received: text(columns.training),
            other_obstacles: columns.other_obstacles
                .map(cell)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            practices,
            barriers,
        };
        unknown_cells += unknown_fields(&record, columns.present());
        records.push(record);
    }

    Ok(ParsedSurvey {
        records,
        column_count: headers.len(),
        unknown_cells,
        coerced_cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        let mut columns = vec![COMPANY_ID_COLUMN.to_string(), "Type _de_produit".to_string()];
        columns.extend(Indicator::ALL.iter().map(|i| i.column().to_string()));
        columns.extend(BarrierCategory::ALL.iter().map(|b| b.column().to_string()));
        columns.join(",")
    }

    fn row(id: &str, product: &str, practice: &str) -> String {
        let mut cells = vec![id.to_string(), product.to_string()];
        cells.extend(std::iter::repeat(practice.to_string()).take(13));
        cells.join(",")
    }

    #[test]
    fn test_parse_maps_values() {
        let content = format!("{}\n{}\n{}\n", header(), row("E1", "Jus", "Oui"), row("E2", "", "peut-être"));
        let parsed = parse_survey(&content).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.column_count, 15);
        assert_eq!(parsed.records[0].practice(Indicator::Haccp), Response::Yes);
        assert_eq!(parsed.records[1].barrier(BarrierCategory::Human), Response::Unknown);
        assert_eq!(parsed.records[1].product_type, UNKNOWN_VALUE);
        assert_eq!(parsed.records[0].location, UNKNOWN_VALUE);
        assert_eq!(parsed.coerced_cells, 13);
        // Empty product type plus the thirteen unrecognised answers
        assert_eq!(parsed.unknown_cells, 14);
    }

    #[test]
    fn test_parse_counts_unknown_cells() {
        let content = format!("{}\n{}\n", header(), row("E1", "Inconnu", "Inconnu"));
        let parsed = parse_survey(&content).unwrap();
        assert_eq!(parsed.unknown_cells, 14);
        assert_eq!(parsed.coerced_cells, 0);
    }

    #[test]
    fn test_unknown_cells_match_in_memory_table() {
        let mut columns = vec![
            COMPANY_ID_COLUMN,
            LOCATION_COLUMN,
            "Type _de_produit",
            STAFF_SIZE_COLUMN,
            TRAINING_COLUMN,
            OTHER_OBSTACLES_COLUMN,
        ];
        columns.extend(Indicator::ALL.iter().map(|i| i.column()));
        columns.extend(BarrierCategory::ALL.iter().map(|b| b.column()));

        let mut row = vec!["E1", "", "Jus", "Inconnu", "BPH", ""];
        row.extend(["Oui", "", "peut-être", "Inconnu", "Non", "Oui", "Oui", "Oui", "Oui"]);
        row.extend(["Non", "Oui", "Inconnu", "Non"]);

        let content = format!("{}\n{}\n", columns.join(","), row.join(","));
        let parsed = parse_survey(&content).unwrap();
        assert_eq!(parsed.column_count, 19);
        // location, staff size, obstacles text, three answers, one barrier
        assert_eq!(parsed.unknown_cells, 7);

        let table = SurveyTable::from_records(parsed.records.clone());
        assert_eq!(table.column_count(), parsed.column_count);
        assert_eq!(table.unknown_cells(), parsed.unknown_cells);
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let content = "ID_entreprise,Existence_BPH\nE1,Oui\n";
        match parse_survey(content) {
            Err(HygieneError::MissingColumns(missing)) => {
                assert_eq!(missing.len(), 12);
                assert!(missing.contains(&"Existence_HACCP".to_string()));
                assert!(missing.contains(&"Obstacle_humain".to_string()));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_prefers_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Formation_reçue".as_bytes());
        let text = decode(&bytes, "windows-1252", Path::new("x.csv")).unwrap();
        assert_eq!(text, "Formation_reçue");
    }

    #[test]
    fn test_decode_rejects_malformed_utf8() {
        let bytes = [b'a', 0xFF, b'b'];
        assert!(matches!(
            decode(&bytes, "utf-8", Path::new("x.csv")),
            Err(HygieneError::Undecodable { .. })
        ));
        assert!(matches!(
            decode(&bytes, "klingon", Path::new("x.csv")),
            Err(HygieneError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_decode_accepts_sig_label() {
        assert_eq!(decode(b"abc", "utf-8-sig", Path::new("x.csv")).unwrap(), "abc");
    }
}
