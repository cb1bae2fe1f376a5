// CSV observation source and writer
use crate::application::observation_source::{LoadReport, ObservationSource};
use crate::domain::error::ChartError;
use crate::domain::observation::{Manufacturer, Observation};
use crate::infrastructure::config::DataSettings;
use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Column names of the benchmark table.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvSchema {
    pub processor: String,
    pub threads: String,
    pub om_time: String,
    pub sa_time: String,
    /// Optional column; when present it overrides name-based inference.
    pub manufacturer: String,
}

impl Default for CsvSchema {
    fn default() -> Self {
        Self {
            processor: "Processor".to_string(),
            threads: "Threads".to_string(),
            om_time: "OM_Time".to_string(),
            sa_time: "SA_Time".to_string(),
            manufacturer: "Manufacturer".to_string(),
        }
    }
}

impl CsvSchema {
    pub fn from_settings(settings: &DataSettings) -> Self {
        Self {
            om_time: settings.om_column.clone(),
            sa_time: settings.sa_column.clone(),
            ..Self::default()
        }
    }

    fn required(&self) -> [&str; 4] {
        [&self.processor, &self.threads, &self.om_time, &self.sa_time]
    }
}

#[derive(Debug, Clone)]
pub struct CsvObservationSource {
    path: PathBuf,
    schema: CsvSchema,
}

impl CsvObservationSource {
    pub fn new(path: impl Into<PathBuf>, schema: CsvSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    /// Parse a benchmark table from any reader.
    ///
    /// A missing column (in the header or in a short row) aborts the whole table; a
    /// value that does not parse skips its row. Processor names are taken verbatim;
    /// only numeric fields and the manufacturer label are trimmed.
    pub fn read_from<R: io::Read>(reader: R, origin: &str, schema: &CsvSchema) -> Result<LoadReport> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .with_context(|| format!("Failed to read CSV header of {}", origin))?
            .clone();

        let mut columns = [0usize; 4];
        for (slot, name) in schema.required().into_iter().enumerate() {
            match headers.iter().position(|h| h.trim() == name) {
                Some(idx) => columns[slot] = idx,
                None => {
                    tracing::warn!("Required column '{}' missing from {}", name, origin);
                    return Ok(LoadReport::aborted(ChartError::MissingColumn {
                        origin: origin.to_string(),
                        column: name.to_string(),
                    }));
                }
            }
        }
        let manufacturer_column = headers.iter().position(|h| h.trim() == schema.manufacturer);

        let mut observations = Vec::new();
        let mut diagnostics = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    if let csv::ErrorKind::Utf8 { pos, .. } = e.kind() {
                        let line = pos.as_ref().map(|p| p.line()).unwrap_or(row as u64 + 2);
                        tracing::warn!("Skipping line {} of {}: invalid UTF-8", line, origin);
                        diagnostics.push(ChartError::MalformedValue {
                            line,
                            column: String::new(),
                            value: "<invalid UTF-8>".to_string(),
                        });
                        continue;
                    }
                    return Err(e).with_context(|| format!("Failed to read {}", origin));
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(row as u64 + 2);

            match parse_row(&record, line, &columns, manufacturer_column, schema) {
                Ok(observation) => observations.push(observation),
                Err(e @ ChartError::MissingColumn { .. }) => {
                    tracing::warn!("Line {} of {} is missing a field; discarding the file", line, origin);
                    return Ok(LoadReport::aborted(e));
                }
                Err(e) => {
                    tracing::warn!("Skipping line {} of {}: {}", line, origin, e);
                    diagnostics.push(e);
                }
            }
        }

        tracing::debug!(
            "Loaded {} observations from {} ({} rows skipped)",
            observations.len(),
            origin,
            diagnostics.len()
        );
        Ok(LoadReport::new(observations, diagnostics))
    }
}

impl ObservationSource for CsvObservationSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<LoadReport> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        Self::read_from(file, &self.describe(), &self.schema)
    }
}

fn parse_row(
    record: &csv::StringRecord,
    line: u64,
    columns: &[usize; 4],
    manufacturer_column: Option<usize>,
    schema: &CsvSchema,
) -> Result<Observation, ChartError> {
    let [processor_col, threads_col, om_col, sa_col] = *columns;
    let field = |idx: usize, name: &str| {
        record.get(idx).ok_or_else(|| ChartError::MissingColumn {
            origin: format!("line {}", line),
            column: name.to_string(),
        })
    };
    let malformed = |name: &str, value: &str| ChartError::MalformedValue {
        line,
        column: name.to_string(),
        value: value.to_string(),
    };

    let processor = field(processor_col, &schema.processor)?;
    let threads = field(threads_col, &schema.threads)?.trim();
    let om_time = field(om_col, &schema.om_time)?.trim();
    let sa_time = field(sa_col, &schema.sa_time)?.trim();

    if processor.trim().is_empty() {
        return Err(malformed(&schema.processor, processor));
    }
    let threads_value = threads
        .parse::<u32>()
        .ok()
        .filter(|&t| t >= 1)
        .ok_or_else(|| malformed(&schema.threads, threads))?;
    let parse_time = |name: &str, value: &str| {
        value
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite() && *t >= 0.0)
            .ok_or_else(|| malformed(name, value))
    };
    let om_value = parse_time(&schema.om_time, om_time)?;
    let sa_value = parse_time(&schema.sa_time, sa_time)?;

    let mut observation = Observation::new(processor, threads_value, om_value, sa_value);
    if let Some(label) = manufacturer_column
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        let manufacturer =
            Manufacturer::parse(label).ok_or_else(|| malformed(&schema.manufacturer, label))?;
        observation = observation.with_manufacturer(manufacturer);
    }

    Ok(observation)
}

/// Write observations as a benchmark table readable by `CsvObservationSource`.
pub fn write_observations(path: &Path, observations: &[Observation], schema: &CsvSchema) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_to(file, observations, schema).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_to<W: io::Write>(writer: W, observations: &[Observation], schema: &CsvSchema) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let [processor, threads, om_time, sa_time] = schema.required();
    wtr.write_record([processor, threads, om_time, sa_time, schema.manufacturer.as_str()])?;
    for o in observations {
        wtr.write_record([
            o.processor.clone(),
            o.threads.to_string(),
            o.om_time.to_string(),
            o.sa_time.to_string(),
            o.manufacturer.label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> LoadReport {
        CsvObservationSource::read_from(text.as_bytes(), "test.csv", &CsvSchema::default()).unwrap()
    }

    #[test]
    fn test_reads_rows_in_any_column_order() {
        let report = read(
            "Threads,Processor,SA_Time,OM_Time\n\
             1,Intel Core i5-12400,11.84313,220.85\n\
             2,AMD Ryzen 5 7530U,3.375539,252.505\n",
        );

        assert!(report.diagnostics.is_empty());
        assert_eq!(
            report.observations,
            vec![
                Observation::new("Intel Core i5-12400", 1, 220.85, 11.84313),
                Observation::new("AMD Ryzen 5 7530U", 2, 252.505, 3.375539),
            ]
        );
    }

    #[test]
    fn test_non_numeric_threads_skips_only_that_row() {
        let report = read(
            "Processor,Threads,OM_Time,SA_Time\n\
             X,1,10.0,5.0\n\
             X,abc,10.0,4.0\n\
             X,2,10.0,2.0\n",
        );

        assert_eq!(report.observations.len(), 2);
        assert_eq!(report.observations[1].threads, 2);
        assert_eq!(
            report.diagnostics,
            vec![ChartError::MalformedValue {
                line: 3,
                column: "Threads".to_string(),
                value: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_processor_names_are_kept_verbatim() {
        let report = read(
            "Processor,Threads,OM_Time,SA_Time,Manufacturer\n\
             Intel Core i7 , 1 , 10.0 ,5.0, amd \n\
             Intel Core i7,2,10.0,2.0,\n",
        );

        assert!(report.diagnostics.is_empty());
        assert_eq!(report.observations[0].processor, "Intel Core i7 ");
        assert_eq!(report.observations[0].threads, 1);
        assert_eq!(report.observations[0].om_time, 10.0);
        assert_eq!(report.observations[0].manufacturer, Manufacturer::Amd);
        assert_eq!(report.observations[1].processor, "Intel Core i7");
    }

    #[test]
    fn test_blank_processor_name_is_malformed() {
        let report = read("Processor,Threads,OM_Time,SA_Time\n  ,1,10.0,5.0\nX,1,10.0,5.0\n");

        assert_eq!(report.observations.len(), 1);
        assert!(matches!(
            report.diagnostics.as_slice(),
            [ChartError::MalformedValue { column, .. }] if column == "Processor"
        ));
    }

    #[test]
    fn test_only_row_malformed_yields_no_observations() {
        let report = read("Processor,Threads,OM_Time,SA_Time\nX,abc,1,1\n");
        assert!(report.observations.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_out_of_range_values_are_malformed() {
        let report = read(
            "Processor,Threads,OM_Time,SA_Time\n\
             X,0,10.0,5.0\n\
             X,1,-1.0,5.0\n\
             X,2,10.0,NaN\n\
             ,3,10.0,5.0\n\
             X,4,0,5.0\n",
        );

        assert_eq!(report.observations.len(), 1);
        assert_eq!(report.observations[0].threads, 4);
        assert_eq!(report.diagnostics.len(), 4);
    }

    #[test]
    fn test_missing_header_column_aborts_source() {
        let report = read("Processor,Threads,OM_Time\nX,1,10.0\n");

        assert!(report.observations.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![ChartError::MissingColumn {
                origin: "test.csv".to_string(),
                column: "SA_Time".to_string(),
            }]
        );
    }

    #[test]
    fn test_short_row_aborts_source() {
        let report = read(
            "Processor,Threads,OM_Time,SA_Time\n\
             X,1,10.0,5.0\n\
             X,2,10.0\n",
        );

        assert!(report.observations.is_empty());
        assert!(matches!(
            report.diagnostics.as_slice(),
            [ChartError::MissingColumn { column, .. }] if column == "SA_Time"
        ));
    }

    #[test]
    fn test_manufacturer_column_overrides_inference() {
        let report = read(
            "Processor,Threads,OM_Time,SA_Time,Manufacturer\n\
             Xeon X5680,1,400.0,20.0,Intel\n\
             Intel Core i7,1,300.0,15.0,\n\
             Mystery,1,300.0,15.0,Cyrix\n",
        );

        assert_eq!(report.observations.len(), 2);
        assert_eq!(report.observations[0].manufacturer, Manufacturer::Intel);
        assert_eq!(report.observations[1].manufacturer, Manufacturer::Intel);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_custom_metric_columns() {
        let settings = DataSettings {
            om_column: "om".to_string(),
            sa_column: "sa".to_string(),
            ..DataSettings::default()
        };
        let schema = CsvSchema::from_settings(&settings);
        let report = CsvObservationSource::read_from(
            "Processor,Threads,om,sa\nX,1,10,5\n".as_bytes(),
            "custom.csv",
            &schema,
        )
        .unwrap();

        assert_eq!(report.observations, vec![Observation::new("X", 1, 10.0, 5.0)]);
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("performance_data.csv");
        let observations = vec![
            Observation::new("Intel Core i9-13900K", 1, 165.998, 7.6108),
            Observation::new("Intel Core i9-13900K", 32, 178.498, 0.311),
            Observation::new("AMD Ryzen 5 7530U, rev B", 12, 252.505, 2.502371),
            Observation::new("Other \"quoted\" CPU", 3, 0.1 + 0.2, 1.0 / 3.0),
            Observation::new("Xeon X5680", 1, 400.0, 20.0).with_manufacturer(Manufacturer::Intel),
            Observation::new("Intel Core i7 ", 2, 300.0, 15.0),
        ];

        write_observations(&path, &observations, &CsvSchema::default()).unwrap();
        let report = CsvObservationSource::new(&path, CsvSchema::default()).load().unwrap();

        assert!(report.diagnostics.is_empty());
        assert_eq!(report.observations.len(), observations.len());
        for (read, written) in report.observations.iter().zip(&observations) {
            assert_eq!(read.processor, written.processor);
            assert_eq!(read.manufacturer, written.manufacturer);
            assert_eq!(read.threads, written.threads);
            assert!((read.om_time - written.om_time).abs() < 1e-6);
            assert!((read.sa_time - written.sa_time).abs() < 1e-6);
        }
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let source = CsvObservationSource::new("/definitely/not/here.csv", CsvSchema::default());
        assert!(source.load().is_err());
    }
}
