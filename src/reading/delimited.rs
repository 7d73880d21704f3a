//! CSV loader, optionally gzip-compressed.

use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::debug;

use super::{parse_time, parse_value, ColumnMapping, ResolvedColumns};
use crate::record::{Dataset, GeoRecord};

/// Loads a CSV file. Files ending in `.gz` are decompressed on the fly.
pub fn load_csv(path: &Path, mapping: &ColumnMapping) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let table = path.display().to_string();

    let is_gzip = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    if is_gzip {
        read_csv(GzDecoder::new(file), &table, mapping)
    } else {
        read_csv(file, &table, mapping)
    }
}

/// Reads CSV with a header row from any reader. `table` names the source in
/// errors and logs.
pub fn read_csv<R: Read>(reader: R, table: &str, mapping: &ColumnMapping) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = mapping.resolve(table, &headers)?;

    let mut dataset = Dataset::default();
    let mut skipped = 0;

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("{table}: CSV row {row_no}"))?;

        match record_from_row(&row, &columns) {
            Some(record) => dataset.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("{table}: skipped {skipped} rows with unparseable coordinates or time");
    }

    Ok(dataset)
}

/// Builds a record unless the coordinates or the time cannot be parsed.
fn record_from_row(row: &csv::StringRecord, columns: &ResolvedColumns) -> Option<GeoRecord> {
    let cell = |idx: usize| row.get(idx).unwrap_or("");

    let latitude = parse_value(cell(columns.latitude)).filter(|v| v.is_finite())?;
    let longitude = parse_value(cell(columns.longitude)).filter(|v| v.is_finite())?;
    let timestamp = parse_time(cell(columns.time))?;
    let value = parse_value(cell(columns.value));

    let variable = columns
        .variable
        .map(cell)
        .filter(|v| !v.is_empty())
        .unwrap_or(columns.default_variable.as_str());

    Some(GeoRecord::new(latitude, longitude, timestamp, variable, value))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;
    use flate2::{write::GzEncoder, Compression};
    use tempfile::TempDir;

    use super::*;
    use crate::error::MatchError;

    const MAIZE: &str = "\
lat,lon,time,value,variable,year
40.0,-3.0,2020-06-01,1.5,TWSO,2020
40.25,-3.5,2020-06-01,,TWSO,2020
41.0,-4.0,not-a-date,2.0,TWSO,2020
,-4.0,2020-06-01,2.0,TWSO,2020
42.0,-5.0,2020-06-01,NaN,TWSO,2020
";

    #[test]
    fn should_read_long_format_rows() {
        let dataset = read_csv(MAIZE.as_bytes(), "maize", &ColumnMapping::default()).unwrap();

        assert_eq!(dataset.len(), 3);

        let first = &dataset.records()[0];
        assert_eq!(first.latitude, 40.0);
        assert_eq!(first.longitude, -3.0);
        assert_eq!(first.timestamp, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        assert_eq!(first.variable_name, "TWSO");
        assert_eq!(first.value, Some(1.5));

        assert_eq!(dataset.records()[1].value, None);
        assert_eq!(dataset.records()[2].value, None);
    }

    #[test]
    fn should_raise_schema_error_for_missing_column() {
        let csv = "lat,lon,value\n40.0,-3.0,1.0\n";

        let err = read_csv(csv.as_bytes(), "agro", &ColumnMapping::default()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<MatchError>(),
            Some(&MatchError::missing_column("agro", "time"))
        );
    }

    #[test]
    fn should_use_value_column_as_variable_name() {
        let csv = "latitude,longitude,date,GSL\n40.0,-3.0,15/03/2011,210\n";
        let mapping = ColumnMapping {
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            time: "date".to_string(),
            value: "GSL".to_string(),
            variable: None,
        };

        let dataset = read_csv(csv.as_bytes(), "agro", &mapping).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].variable_name, "GSL");
        assert_eq!(dataset.records()[0].year(), 2011);
    }

    #[test]
    fn should_load_gzip_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agro.csv.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(MAIZE.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let dataset = load_csv(&path, &ColumnMapping::default()).unwrap();

        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn should_load_plain_csv_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maize.csv");
        std::fs::write(&path, MAIZE).unwrap();

        let dataset = crate::reading::load_dataset(&path, &ColumnMapping::default()).unwrap();

        assert_eq!(dataset.len(), 3);
    }
}
