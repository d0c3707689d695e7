use std::{fs::File, path::Path};

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::error::SplitError;

/// Column name that pandas-style tooling emits when a frame is saved with
/// its index. Never domain data; dropped on load.
pub const INDEX_ARTIFACT_COLUMN: &str = "Unnamed: 0";

#[derive(Debug)]
pub struct RawTable {
    /// Column names from the header row, in file order, minus any dropped
    /// index artifact.
    pub headers: Vec<String>,
    /// Each data row as a Vec of fields, one per entry in `headers`.
    pub rows: Vec<Vec<String>>,
    /// Coerced date column, one entry per row. `None` marks a value that
    /// failed to parse; the row itself is kept.
    pub dates: Vec<Option<NaiveDateTime>>,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date-column value, trying full datetimes first and falling back
/// to bare dates at midnight. Returns `None` for anything unparseable.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Read the whole CSV at `path` into memory, coercing `date_field` to a
/// timestamp per row.
///
/// Rows with an unparseable date are kept (with a `None` marker) and counted
/// in a single aggregate warning; excluding them is the splitter's job. The
/// [`INDEX_ARTIFACT_COLUMN`], if present, is dropped from headers and rows.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load<P: AsRef<Path>>(path: P, date_field: &str) -> Result<RawTable, SplitError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SplitError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);
    let header = rdr.headers()?.clone();

    let date_idx = header
        .iter()
        .position(|h| h == date_field)
        .ok_or_else(|| SplitError::MissingColumn {
            column: date_field.to_string(),
            path: path.to_path_buf(),
        })?;
    let artifact_idx = header.iter().position(|h| h == INDEX_ARTIFACT_COLUMN);

    let headers: Vec<String> = header
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != artifact_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut dates = Vec::new();
    let mut invalid = 0usize;

    for result in rdr.records() {
        let record = result?;
        let parsed = record.get(date_idx).and_then(parse_datetime);
        if parsed.is_none() {
            invalid += 1;
        }
        dates.push(parsed);

        let row: Vec<String> = record
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != artifact_idx)
            .map(|(_, f)| f.to_string())
            .collect();
        rows.push(row);
    }

    if invalid > 0 {
        warn!(count = invalid, column = date_field, "rows had an invalid date format");
    }
    if artifact_idx.is_some() {
        info!(column = INDEX_ARTIFACT_COLUMN, "dropping non-domain index column");
    }
    if rows.is_empty() {
        warn!("input file is empty, nothing to split");
    }

    Ok(RawTable {
        headers,
        rows,
        dates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(content.as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn parses_datetimes_and_bare_dates() {
        let dt = parse_datetime("2025-04-10 13:01:00").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());

        let midnight = parse_datetime("2025-04-10").unwrap();
        assert_eq!(midnight, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap().and_hms_opt(0, 0, 0).unwrap());

        assert!(parse_datetime("2025/04/10 13:01:00").is_some());
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("not-a-date").is_none());
        assert!(parse_datetime("2025-13-40 99:00:00").is_none());
    }

    #[test]
    fn load_keeps_rows_with_invalid_dates() -> Result<()> {
        let tmp = write_csv(
            "trans_date_trans_time,cc_num,merchant\n\
             2025-04-10 13:01:00,1,A\n\
             garbage,2,B\n\
             2025-04-11 09:30:00,3,C\n",
        )?;

        let table = load(tmp.path(), "trans_date_trans_time")?;
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.dates.len(), 3);
        assert!(table.dates[0].is_some());
        assert!(table.dates[1].is_none());
        assert!(table.dates[2].is_some());
        // the bad row is still present, untouched
        assert_eq!(table.rows[1], vec!["garbage", "2", "B"]);
        Ok(())
    }

    #[test]
    fn load_drops_index_artifact_column() -> Result<()> {
        let tmp = write_csv(
            "Unnamed: 0,trans_date_trans_time,merchant\n\
             0,2025-04-10 13:01:00,A\n\
             1,2025-04-11 09:30:00,B\n",
        )?;

        let table = load(tmp.path(), "trans_date_trans_time")?;
        assert_eq!(table.headers, vec!["trans_date_trans_time", "merchant"]);
        assert_eq!(table.rows[0], vec!["2025-04-10 13:01:00", "A"]);
        assert!(table.dates[0].is_some());
        Ok(())
    }

    #[test]
    fn load_empty_input_is_not_an_error() -> Result<()> {
        let tmp = write_csv("trans_date_trans_time,cc_num\n")?;
        let table = load(tmp.path(), "trans_date_trans_time")?;
        assert!(table.rows.is_empty());
        assert!(table.dates.is_empty());
        Ok(())
    }

    #[test]
    fn load_missing_date_column_fails() -> Result<()> {
        let tmp = write_csv("a,b\n1,2\n")?;
        let err = load(tmp.path(), "trans_date_trans_time").unwrap_err();
        assert!(matches!(
            err,
            SplitError::MissingColumn { ref column, .. } if column == "trans_date_trans_time"
        ));
        Ok(())
    }

    #[test]
    fn load_missing_file_fails_with_not_found() {
        let err = load("/definitely/not/here.csv", "x").unwrap_err();
        assert!(matches!(err, SplitError::NotFound { .. }));
    }
}
