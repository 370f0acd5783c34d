use serde::{Deserialize, Serialize};

use super::{MethodParameters, SoilRecord};

/// A complete calculation request: the zones plus the shared parameters.
///
/// Mirrors the JSON body accepted by the calculation endpoint, e.g.
///
/// ```json
/// {
///   "soil_data": [{"ph_value": 5.5, "soil_texture": "sandy loam", "area": 10.0}],
///   "crop_type": "Standard crops",
///   "lime_type": "CaCO3",
///   "liming_mode": "pH Improvement",
///   "nv": 95.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub soil_data: Vec<SoilRecord>,
    #[serde(flatten)]
    pub parameters: MethodParameters,
}

impl CalculationRequest {
    pub fn new(soil_data: Vec<SoilRecord>, parameters: MethodParameters) -> Self {
        Self {
            soil_data,
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CropType, LimingMode};

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "soil_data": [
                {"field_name": "North", "zone_name": "Z1", "ph_value": 5.5, "soil_texture": "sandy loam", "area": 10.0},
                {"ph_value": 6.1, "soil_texture": "Toniger Lehm b.Ton", "area": 4.5}
            ],
            "crop_type": "Other crops",
            "lime_type": "CaO",
            "liming_mode": "pH Maintenance",
            "nv": 53.0,
            "rainfall_mm": 750.0
        }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.soil_data.len(), 2);
        assert_eq!(request.soil_data[1].field_name, "Unknown Field");
        assert_eq!(request.parameters.crop_type, CropType::OtherCrops);
        assert_eq!(request.parameters.liming_mode, LimingMode::Maintenance);
        assert_eq!(request.parameters.nv, Some(53.0));
        assert_eq!(request.parameters.rainfall_mm, Some(750.0));
    }

    #[test]
    fn test_request_parameters_default_when_omitted() {
        let json = r#"{"soil_data": []}"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert!(request.soil_data.is_empty());
        assert_eq!(request.parameters, MethodParameters::default());
    }

    #[test]
    fn test_request_missing_soil_data_is_error() {
        let result: Result<CalculationRequest, _> = serde_json::from_str(r#"{"lime_type": "CaO"}"#);
        assert!(result.is_err());
    }
}
