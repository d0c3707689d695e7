use std::{collections::BTreeMap, fs, path::Path};

use chrono::NaiveDate;
use csv::Writer;
use tracing::info;

use crate::{
    error::SplitError,
    load::{load, RawTable},
};

/// Split the CSV at `input_path` into one file per calendar day of
/// `date_field`, written as `{output_dir}/{YYYY-MM-DD}.csv`.
///
/// The output directory is created if absent. Rows whose date failed to
/// coerce appear in no output file. Returns the number of files written;
/// an empty or all-invalid input yields 0 (the directory is still created).
#[tracing::instrument(level = "info", skip_all, fields(input = %input_path.as_ref().display()))]
pub fn split_by_day<P, Q>(
    input_path: P,
    output_dir: Q,
    date_field: &str,
) -> Result<usize, SplitError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let table = load(&input_path, date_field)?;

    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let groups = group_by_day(&table);
    for (date, row_indices) in &groups {
        let out_path = output_dir.join(format!("{}.csv", date.format("%Y-%m-%d")));
        let mut wtr = Writer::from_path(&out_path)?;
        wtr.write_record(&table.headers)?;
        for &i in row_indices {
            wtr.write_record(&table.rows[i])?;
        }
        wtr.flush()?;
        info!(rows = row_indices.len(), path = %out_path.display(), "wrote day file");
    }

    Ok(groups.len())
}

/// One linear pass over the loaded rows: calendar date → indices of its
/// rows, in input order. Rows without a coerced date belong to no group.
fn group_by_day(table: &RawTable) -> BTreeMap<NaiveDate, Vec<usize>> {
    let mut groups: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (i, parsed) in table.dates.iter().enumerate() {
        if let Some(dt) = parsed {
            groups.entry(dt.date()).or_default().push(i);
        }
    }
    groups
}
