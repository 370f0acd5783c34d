use serde::{Deserialize, Serialize};

use super::{LimingMode, Method, TextureClass};

/// Which branch of the calculation actually produced a zone's requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliedMode {
    Improvement,
    Maintenance,
    /// Maintenance requested but the pH is already at or above target
    None,
}

impl std::fmt::Display for AppliedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppliedMode::Improvement => write!(f, "Improvement"),
            AppliedMode::Maintenance => write!(f, "Maintenance"),
            AppliedMode::None => write!(f, "None (pH at/above target)"),
        }
    }
}

/// Lime requirement of a single zone.
///
/// Every mass is derived from `caco3_equivalent_kg_ha` through the same
/// conversion chain: CaCO3 → CaO → NV-adjusted CaO → product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimeRequirementResult {
    pub zone_name: String,
    pub field_name: String,
    /// Zone area in hectares
    pub area: f64,
    pub method: Method,
    pub applied_mode: AppliedMode,
    /// Texture class the tables were consulted with
    pub texture: TextureClass,
    /// Texture text as supplied
    pub original_texture: String,
    pub current_ph: f64,
    /// Target pH, or the achieved pH when the zone was capped
    pub target_ph: f64,
    pub caco3_equivalent_kg_ha: f64,
    pub cao_equivalent_kg_ha: f64,
    pub nv_adjusted_cao_kg_ha: f64,
    pub product_kg_ha: f64,
    /// `product_kg_ha × area`
    pub product_total_kg: f64,
    pub was_capped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caco3_loss_kg_ha_year: Option<f64>,
}

impl LimeRequirementResult {
    /// True when no lime needs to be applied to this zone.
    pub fn is_zero(&self) -> bool {
        self.product_kg_ha == 0.0
    }
}

/// Per-field roll-up of zone results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub field_name: String,
    pub zone_count: usize,
    pub total_area: f64,
    /// `None` when every zone of the field has zero area
    pub weighted_average_kg_ha: Option<f64>,
    pub total_product_kg: f64,
}

/// Area-weighted aggregation across all zones of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub method: Method,
    pub lime_type: String,
    pub liming_mode: LimingMode,
    pub total_area: f64,
    /// `Σ(product_kg_ha × area) / Σ area`
    pub weighted_average_kg_ha: f64,
    pub total_product_kg: f64,
    /// Fields in order of first appearance
    pub fields: Vec<FieldSummary>,
    /// Zone results in input order
    pub per_zone: Vec<LimeRequirementResult>,
}

impl AggregateResult {
    pub fn num_zones(&self) -> usize {
        self.per_zone.len()
    }

    pub fn num_capped(&self) -> usize {
        self.per_zone.iter().filter(|z| z.was_capped).count()
    }

    /// Total product in metric tonnes.
    pub fn total_product_tonnes(&self) -> f64 {
        self.total_product_kg / 1000.0
    }
}
