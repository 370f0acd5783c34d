use std::path::Path;

use crate::error::LimeError;
use crate::models::{AggregateResult, CalculationRequest, SoilRecord};

fn utf8(data: &[u8]) -> Result<&str, LimeError> {
    std::str::from_utf8(data).map_err(|e| LimeError::ParseError(format!("Invalid UTF-8: {e}")))
}

/// Read soil zones from a JSON array of records.
pub fn read_zones_json(path: impl AsRef<Path>) -> Result<Vec<SoilRecord>, LimeError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

/// Read soil zones from JSON bytes.
pub fn read_zones_json_from_bytes(data: &[u8]) -> Result<Vec<SoilRecord>, LimeError> {
    Ok(serde_json::from_str(utf8(data)?)?)
}

/// Read a full calculation request (zones plus parameters) from a JSON file.
pub fn read_request_json(path: impl AsRef<Path>) -> Result<CalculationRequest, LimeError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a calculation request from JSON bytes.
pub fn read_request_json_from_bytes(data: &[u8]) -> Result<CalculationRequest, LimeError> {
    Ok(serde_json::from_str(utf8(data)?)?)
}

/// Write an aggregate result to a JSON file.
pub fn write_results_json(
    result: &AggregateResult,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), LimeError> {
    let content = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
