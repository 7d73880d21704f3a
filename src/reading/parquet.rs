//! Parquet loader.

use std::{fs::File, path::Path};

use anyhow::{bail, Context, Result};
use arrow::{
    array::{Array, AsArray, Float64Array, RecordBatch},
    compute::cast,
    datatypes::{DataType, Date32Type, Float64Type, Int64Type},
};
use chrono::NaiveDate;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::{parse_time, time::from_epoch_days, ColumnMapping, ResolvedColumns};
use crate::record::{Dataset, GeoRecord};

/// Loads a Parquet file. Numeric columns of any width are widened to `f64`;
/// the time column may hold dates, timestamps, strings or integer years.
pub fn load_parquet(path: &Path, mapping: &ColumnMapping) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let table = path.display().to_string();

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading Parquet metadata of {table}"))?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let columns = mapping.resolve(&table, &names)?;

    let reader = builder.build()?;

    let mut dataset = Dataset::default();
    let mut skipped = 0;

    for batch in reader {
        let batch = batch?;
        skipped += append_batch(&batch, &columns, &mut dataset)?;
    }

    if skipped > 0 {
        debug!("{table}: skipped {skipped} rows with missing coordinates or time");
    }

    Ok(dataset)
}

/// Appends the rows of `batch`, returning how many were skipped.
fn append_batch(
    batch: &RecordBatch,
    columns: &ResolvedColumns,
    dataset: &mut Dataset,
) -> Result<usize> {
    let lats = float_column(batch, columns.latitude)?;
    let lons = float_column(batch, columns.longitude)?;
    let values = float_column(batch, columns.value)?;
    let times = time_column(batch, columns.time)?;
    let variables = match columns.variable {
        Some(idx) => Some(
            cast(batch.column(idx), &DataType::Utf8).context("variable column is not text")?,
        ),
        None => None,
    };

    let mut skipped = 0;
    for row in 0..batch.num_rows() {
        let lat = float_at(&lats, row).filter(|v| v.is_finite());
        let lon = float_at(&lons, row).filter(|v| v.is_finite());
        let (Some(latitude), Some(longitude), Some(timestamp)) = (lat, lon, times[row]) else {
            skipped += 1;
            continue;
        };

        let variable = variables
            .as_ref()
            .map(|v| v.as_string::<i32>())
            .filter(|v| v.is_valid(row))
            .map(|v| v.value(row))
            .filter(|v| !v.is_empty())
            .unwrap_or(columns.default_variable.as_str());

        dataset.push(GeoRecord::new(
            latitude,
            longitude,
            timestamp,
            variable,
            float_at(&values, row),
        ));
    }

    Ok(skipped)
}

fn float_column(batch: &RecordBatch, idx: usize) -> Result<Float64Array> {
    let name = batch.schema().field(idx).name().clone();
    let array = cast(batch.column(idx), &DataType::Float64)
        .with_context(|| format!("column `{name}` is not numeric"))?;

    Ok(array.as_primitive::<Float64Type>().clone())
}

fn float_at(array: &Float64Array, row: usize) -> Option<f64> {
    if array.is_valid(row) {
        Some(array.value(row)).filter(|v| !v.is_nan())
    } else {
        None
    }
}

fn time_column(batch: &RecordBatch, idx: usize) -> Result<Vec<Option<NaiveDate>>> {
    let column = batch.column(idx);

    let dates = match column.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let strings = cast(column, &DataType::Utf8)?;
            strings
                .as_string::<i32>()
                .iter()
                .map(|s| s.and_then(parse_time))
                .collect()
        }
        t if t.is_integer() => {
            let years = cast(column, &DataType::Int64)?;
            years
                .as_primitive::<Int64Type>()
                .iter()
                .map(|y| {
                    y.and_then(|y| i32::try_from(y).ok())
                        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
                })
                .collect()
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            // Timestamps are truncated to their UTC day.
            let days = cast(column, &DataType::Date32)?;
            days.as_primitive::<Date32Type>()
                .iter()
                .map(|d| d.and_then(from_epoch_days))
                .collect()
        }
        other => bail!("time column has unsupported type {other}"),
    };

    Ok(dates)
}

// -- Tests -------------------------------------------------------------------
