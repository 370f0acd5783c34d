use serde::{Deserialize, Serialize};

use crate::error::LimeError;

/// Normalize a selector string: lowercase, separators collapsed to single spaces.
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Crop group, which selects the target pH.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropType {
    /// Arable land
    #[default]
    #[serde(rename = "Standard crops", alias = "standard_crops")]
    StandardCrops,
    /// Grassland
    #[serde(rename = "Other crops", alias = "other_crops")]
    OtherCrops,
}

impl CropType {
    pub const ALL: [CropType; 2] = [CropType::StandardCrops, CropType::OtherCrops];
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropType::StandardCrops => write!(f, "Standard crops"),
            CropType::OtherCrops => write!(f, "Other crops"),
        }
    }
}

impl std::str::FromStr for CropType {
    type Err = LimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "standard crops" | "standard" | "arable" => Ok(CropType::StandardCrops),
            "other crops" | "other" | "grassland" => Ok(CropType::OtherCrops),
            _ => Err(LimeError::invalid_parameter(
                "crop_type",
                s,
                "expected 'Standard crops' or 'Other crops'",
            )),
        }
    }
}

/// Liming strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimingMode {
    /// One-time application raising pH to the crop target
    #[default]
    #[serde(rename = "pH Improvement")]
    Improvement,
    /// Annual application offsetting leaching losses
    #[serde(rename = "pH Maintenance")]
    Maintenance,
}

impl std::fmt::Display for LimingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimingMode::Improvement => write!(f, "pH Improvement"),
            LimingMode::Maintenance => write!(f, "pH Maintenance"),
        }
    }
}

impl std::str::FromStr for LimingMode {
    type Err = LimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ph improvement" | "improvement" => Ok(LimingMode::Improvement),
            "ph maintenance" | "maintenance" => Ok(LimingMode::Maintenance),
            _ => Err(LimeError::invalid_parameter(
                "liming_mode",
                s,
                "expected 'pH Improvement' or 'pH Maintenance'",
            )),
        }
    }
}

/// Lime requirement method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "VDLUFA")]
    Vdlufa,
    #[serde(rename = "CEC")]
    Cec,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Vdlufa => write!(f, "VDLUFA"),
            Method::Cec => write!(f, "CEC"),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = LimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "vdlufa" => Ok(Method::Vdlufa),
            "cec" => Ok(Method::Cec),
            _ => Err(LimeError::invalid_parameter(
                "method",
                s,
                "expected 'VDLUFA' or 'CEC'",
            )),
        }
    }
}

fn default_lime_type() -> String {
    "CaCO3".to_string()
}

/// Parameters shared by every zone of one calculation.
///
/// Optional values left as `None` are taken from the configuration defaults
/// (`nv` = 100.0, `fine_dry_soil` = 1500.0, `dose` = 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodParameters {
    #[serde(default)]
    pub crop_type: CropType,
    #[serde(default = "default_lime_type")]
    pub lime_type: String,
    #[serde(default)]
    pub liming_mode: LimingMode,
    /// Neutralizing value in percent
    #[serde(default)]
    pub nv: Option<f64>,
    /// Annual rainfall in mm (needed for pH Maintenance without measured losses)
    #[serde(default)]
    pub rainfall_mm: Option<f64>,
    /// Explicit target pH, overriding the crop-derived target
    #[serde(default)]
    pub target_ph: Option<f64>,
    /// Application cap in product kg/ha
    #[serde(default)]
    pub max_application_rate: Option<f64>,
    /// CEC method: fine and dry soil value
    #[serde(default)]
    pub fine_dry_soil: Option<f64>,
    /// CEC method: dose factor
    #[serde(default)]
    pub dose: Option<f64>,
    /// CEC method: current base saturation (S/CEC) in percent
    #[serde(default)]
    pub s_cec_percentage: Option<f64>,
    /// CEC method: user-modified base saturation in percent
    #[serde(default)]
    pub modified_s_cec: Option<f64>,
}

impl Default for MethodParameters {
    fn default() -> Self {
        Self::new(CropType::StandardCrops, default_lime_type(), LimingMode::Improvement)
    }
}

impl MethodParameters {
    pub fn new(crop_type: CropType, lime_type: impl Into<String>, liming_mode: LimingMode) -> Self {
        Self {
            crop_type,
            lime_type: lime_type.into(),
            liming_mode,
            nv: None,
            rainfall_mm: None,
            target_ph: None,
            max_application_rate: None,
            fine_dry_soil: None,
            dose: None,
            s_cec_percentage: None,
            modified_s_cec: None,
        }
    }

    pub fn with_nv(mut self, nv: f64) -> Self {
        self.nv = Some(nv);
        self
    }

    pub fn with_rainfall(mut self, rainfall_mm: f64) -> Self {
        self.rainfall_mm = Some(rainfall_mm);
        self
    }

    pub fn with_target_ph(mut self, target_ph: f64) -> Self {
        self.target_ph = Some(target_ph);
        self
    }

    pub fn with_max_application_rate(mut self, rate: f64) -> Self {
        self.max_application_rate = Some(rate);
        self
    }
}
