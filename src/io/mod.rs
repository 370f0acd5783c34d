mod csv_io;
mod json_io;

use std::path::Path;

use crate::error::LimeError;
use crate::models::{AggregateResult, SoilRecord};

pub use csv_io::{read_zones_csv, read_zones_csv_from_bytes, write_results_csv};
pub use json_io::{
    read_request_json, read_request_json_from_bytes, read_zones_json, read_zones_json_from_bytes,
    write_results_json,
};

/// Trait for reading soil zones from a file.
pub trait ZoneReader {
    fn read(&self, path: &Path) -> Result<Vec<SoilRecord>, LimeError>;
}

/// Trait for writing calculation results to a file.
pub trait ResultWriter {
    fn write(&self, result: &AggregateResult, path: &Path) -> Result<(), LimeError>;
}

/// CSV format reader/writer.
pub struct CsvFormat;

impl ZoneReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<Vec<SoilRecord>, LimeError> {
        read_zones_csv(path)
    }
}

impl ResultWriter for CsvFormat {
    fn write(&self, result: &AggregateResult, path: &Path) -> Result<(), LimeError> {
        write_results_csv(result, path)
    }
}

/// JSON format reader/writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ZoneReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<Vec<SoilRecord>, LimeError> {
        read_zones_json(path)
    }
}

impl ResultWriter for JsonFormat {
    fn write(&self, result: &AggregateResult, path: &Path) -> Result<(), LimeError> {
        write_results_json(result, path, self.pretty)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Pick a reader by file extension (`.csv` or `.json`).
pub fn reader_for_path(path: &Path) -> Result<Box<dyn ZoneReader>, LimeError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat::default())),
        other => Err(LimeError::ParseError(format!(
            "Unsupported input format '.{other}' (expected .csv or .json)"
        ))),
    }
}

/// Pick a writer by file extension. JSON output is pretty-printed.
pub fn writer_for_path(path: &Path) -> Result<Box<dyn ResultWriter>, LimeError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat { pretty: true })),
        other => Err(LimeError::ParseError(format!(
            "Unsupported output format '.{other}' (expected .csv or .json)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregate;
    use crate::models::{CropType, LimingMode, Method, MethodParameters};

    fn sample_zones() -> Vec<SoilRecord> {
        vec![
            SoilRecord::new("West", "Z1", 5.6, "sandy loam", 6.0),
            SoilRecord::new("West", "Z2", 6.3, "silt loam", 4.0),
        ]
    }

    #[test]
    fn test_json_trait_reads_written_zones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");
        std::fs::write(&path, serde_json::to_string(&sample_zones()).unwrap()).unwrap();

        let reader: &dyn ZoneReader = &JsonFormat::default();
        let loaded = reader.read(&path).unwrap();
        assert_eq!(loaded, sample_zones());
    }

    #[test]
    fn test_writers_by_extension() {
        let params = MethodParameters::new(CropType::StandardCrops, "CaCO3", LimingMode::Improvement);
        let result = aggregate(&sample_zones(), &params, Method::Cec).unwrap();
        let dir = tempfile::tempdir().unwrap();

        for name in ["out.csv", "out.JSON"] {
            let path = dir.path().join(name);
            writer_for_path(&path).unwrap().write(&result, &path).unwrap();
            assert!(path.exists());
        }
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(reader_for_path(Path::new("zones.xlsx")).is_err());
        assert!(writer_for_path(Path::new("out")).is_err());
    }

    #[test]
    fn test_json_format_default() {
        let fmt = JsonFormat::default();
        assert!(!fmt.pretty);
    }
}
