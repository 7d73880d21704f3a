//! Save a matched table to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::{Context, Result};
use arrow::{
    array::{Date32Builder, Float64Builder, StringBuilder},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};
use log::debug;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};

use crate::{
    matcher::{MatchedPair, MatchedTable},
    reading::time::to_epoch_days,
};

const CHUNK_SIZE: usize = 100_000;

pub fn save_parquet(table: &MatchedTable, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("creating {}", file_path.display()))?;

    let schema = matched_schema();
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_dictionary_enabled(true)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
    let mut builders = ColumnBuilders::with_capacity(CHUNK_SIZE.min(table.len()));

    for chunk in table.pairs().chunks(CHUNK_SIZE) {
        for pair in chunk {
            builders.append(pair);
        }
        writer.write(&builders.finish(&schema)?)?;
    }

    writer.close()?;
    debug!("Wrote {} rows to {}", table.len(), file_path.display());

    Ok(())
}

fn matched_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
        Field::new("time", DataType::Date32, false),
        Field::new("variable_primary", DataType::Utf8, false),
        Field::new("value_primary", DataType::Float64, false),
        Field::new("lat_secondary", DataType::Float64, false),
        Field::new("lon_secondary", DataType::Float64, false),
        Field::new("time_secondary", DataType::Date32, false),
        Field::new("variable_secondary", DataType::Utf8, false),
        Field::new("value_secondary", DataType::Float64, false),
        Field::new("key_lat", DataType::Float64, false),
        Field::new("key_lon", DataType::Float64, false),
        Field::new("key_time", DataType::Utf8, false),
        Field::new("distance", DataType::Float64, false),
    ]))
}

struct ColumnBuilders {
    lat: Float64Builder,
    lon: Float64Builder,
    time: Date32Builder,
    variable_primary: StringBuilder,
    value_primary: Float64Builder,
    lat_secondary: Float64Builder,
    lon_secondary: Float64Builder,
    time_secondary: Date32Builder,
    variable_secondary: StringBuilder,
    value_secondary: Float64Builder,
    key_lat: Float64Builder,
    key_lon: Float64Builder,
    key_time: StringBuilder,
    distance: Float64Builder,
}

impl ColumnBuilders {
    fn with_capacity(rows: usize) -> Self {
        ColumnBuilders {
            lat: Float64Builder::with_capacity(rows),
            lon: Float64Builder::with_capacity(rows),
            time: Date32Builder::with_capacity(rows),
            variable_primary: StringBuilder::with_capacity(rows, rows * 8),
            value_primary: Float64Builder::with_capacity(rows),
            lat_secondary: Float64Builder::with_capacity(rows),
            lon_secondary: Float64Builder::with_capacity(rows),
            time_secondary: Date32Builder::with_capacity(rows),
            variable_secondary: StringBuilder::with_capacity(rows, rows * 8),
            value_secondary: Float64Builder::with_capacity(rows),
            key_lat: Float64Builder::with_capacity(rows),
            key_lon: Float64Builder::with_capacity(rows),
            key_time: StringBuilder::with_capacity(rows, rows * 10),
            distance: Float64Builder::with_capacity(rows),
        }
    }

    fn append(&mut self, pair: &MatchedPair) {
        let row = pair.row();

        self.lat.append_value(row.lat);
        self.lon.append_value(row.lon);
        self.time.append_value(to_epoch_days(pair.primary.timestamp));
        self.variable_primary.append_value(row.variable_primary);
        self.value_primary.append_value(row.value_primary);
        self.lat_secondary.append_value(row.lat_secondary);
        self.lon_secondary.append_value(row.lon_secondary);
        self.time_secondary.append_value(to_epoch_days(pair.secondary.timestamp));
        self.variable_secondary.append_value(row.variable_secondary);
        self.value_secondary.append_value(row.value_secondary);
        self.key_lat.append_value(row.key_lat);
        self.key_lon.append_value(row.key_lon);
        self.key_time.append_value(&row.key_time);
        self.distance.append_value(row.distance);
    }

    /// Drains the builders into a batch.
    fn finish(&mut self, schema: &SchemaRef) -> Result<RecordBatch> {
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(self.lat.finish()),
                Arc::new(self.lon.finish()),
                Arc::new(self.time.finish()),
                Arc::new(self.variable_primary.finish()),
                Arc::new(self.value_primary.finish()),
                Arc::new(self.lat_secondary.finish()),
                Arc::new(self.lon_secondary.finish()),
                Arc::new(self.time_secondary.finish()),
                Arc::new(self.variable_secondary.finish()),
                Arc::new(self.value_secondary.finish()),
                Arc::new(self.key_lat.finish()),
                Arc::new(self.key_lon.finish()),
                Arc::new(self.key_time.finish()),
                Arc::new(self.distance.finish()),
            ],
        )?;

        Ok(batch)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use arrow::array::{Array, Date32Array, Float64Array, StringArray};
    use chrono::NaiveDate;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::{
        matcher::{match_datasets, JoinMode, MatchConfig, COLUMNS},
        record::{Dataset, GeoRecord},
    };

    fn table_fixture() -> MatchedTable {
        let date = NaiveDate::from_ymd_opt(2021, 5, 1).unwrap();
        let primary = Dataset::new(vec![
            GeoRecord::new(40.0, -3.0, date, "TAGP", Some(1.0)),
            GeoRecord::new(41.0, -4.0, date, "TAGP", Some(2.0)),
        ]);
        let secondary = Dataset::new(vec![
            GeoRecord::new(40.0, -3.0, date, "GSL", Some(10.0)),
            GeoRecord::new(41.0, -4.0, date, "GSL", Some(20.0)),
        ]);

        let config = MatchConfig::default().with_join_mode(JoinMode::ExactRounded);
        match_datasets(&primary, &secondary, &config).unwrap()
    }

    #[test]
    fn should_validate_schema_and_data() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().to_path_buf();

        save_parquet(&table_fixture(), &temp_path).unwrap();

        let file = File::open(&temp_path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();

        let mut total_rows = 0;
        for batch_result in reader {
            let batch = batch_result.unwrap();
            total_rows += batch.num_rows();

            let schema = batch.schema();
            let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
            assert_eq!(names, COLUMNS);

            let values = batch.column(4).as_any().downcast_ref::<Float64Array>().unwrap();
            assert_eq!(values.null_count(), 0);
            assert_eq!(values.value(0), 1.0);
            assert_eq!(values.value(1), 2.0);

            let variables = batch.column(8).as_any().downcast_ref::<StringArray>().unwrap();
            assert_eq!(variables.value(0), "GSL");

            let times = batch.column(2).as_any().downcast_ref::<Date32Array>().unwrap();
            assert_eq!(
                times.value(0),
                to_epoch_days(NaiveDate::from_ymd_opt(2021, 5, 1).unwrap())
            );
        }

        assert_eq!(total_rows, 2);
    }

    #[test]
    fn should_write_empty_table() {
        let temp_file = NamedTempFile::new().unwrap();

        save_parquet(&MatchedTable::default(), temp_file.path()).unwrap();

        let file = File::open(temp_file.path()).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        assert_eq!(builder.schema().fields().len(), COLUMNS.len());
        assert_eq!(builder.metadata().file_metadata().num_rows(), 0);
    }
}
