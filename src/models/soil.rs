use serde::{Deserialize, Serialize};

use crate::error::LimeError;

fn default_field_name() -> String {
    "Unknown Field".to_string()
}

fn default_zone_name() -> String {
    "Main Zone".to_string()
}

/// A single soil zone measurement. One record per management zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRecord {
    /// Field the zone belongs to
    #[serde(default = "default_field_name")]
    pub field_name: String,
    /// Zone name within the field
    #[serde(default = "default_zone_name")]
    pub zone_name: String,
    /// Measured soil pH (0 - 14)
    pub ph_value: f64,
    /// Free-text soil texture description (e.g., "sandy loam", "SANDY_LOAM")
    pub soil_texture: String,
    /// Zone area in hectares
    pub area: f64,
    /// Annual rainfall for this zone in mm, overriding the shared parameter
    #[serde(default)]
    pub rainfall_mm: Option<f64>,
    /// Measured annual CaCO3 leaching loss in kg/ha, bypassing the leaching model
    #[serde(default)]
    pub caco3_loss_kg_ha: Option<f64>,
}

impl SoilRecord {
    /// Create a record with the required measurements and no overrides.
    pub fn new(
        field_name: impl Into<String>,
        zone_name: impl Into<String>,
        ph_value: f64,
        soil_texture: impl Into<String>,
        area: f64,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            zone_name: zone_name.into(),
            ph_value,
            soil_texture: soil_texture.into(),
            area,
            rainfall_mm: None,
            caco3_loss_kg_ha: None,
        }
    }

    /// Validate the measurements. Returns `LimeError::InvalidInput` on failure.
    pub fn validate(&self) -> Result<(), LimeError> {
        self.validate_with_prefix("")
    }

    /// Validate, reporting field names as `{prefix}{field}` so a caller can
    /// point at the offending zone (e.g. `soil_data[3].`).
    pub(crate) fn validate_with_prefix(&self, prefix: &str) -> Result<(), LimeError> {
        let field = |name: &str| format!("{prefix}{name}");

        if !self.ph_value.is_finite() || !(0.0..=14.0).contains(&self.ph_value) {
            return Err(LimeError::invalid_input(
                field("ph_value"),
                self.ph_value,
                "pH must be within 0..=14",
            ));
        }
        if !self.area.is_finite() || self.area < 0.0 {
            return Err(LimeError::invalid_input(
                field("area"),
                self.area,
                "area must be a non-negative number of hectares",
            ));
        }
        if let Some(rain) = self.rainfall_mm {
            if !rain.is_finite() || rain < 0.0 {
                return Err(LimeError::invalid_input(
                    field("rainfall_mm"),
                    rain,
                    "rainfall must be a non-negative number of mm",
                ));
            }
        }
        if let Some(loss) = self.caco3_loss_kg_ha {
            if !loss.is_finite() || loss < 0.0 {
                return Err(LimeError::invalid_input(
                    field("caco3_loss_kg_ha"),
                    loss,
                    "CaCO3 loss must be a non-negative number of kg/ha",
                ));
            }
        }
        Ok(())
    }
}
