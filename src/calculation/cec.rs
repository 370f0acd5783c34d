use super::calculator::RawRequirement;
use super::leaching::{maintenance, LeachingModel};
use super::tables::CecEntry;
use crate::error::LimeError;
use crate::models::AppliedMode;

/// Inputs of the CEC improvement formula besides the soil entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CecInputs {
    pub current_ph: f64,
    pub target_ph: f64,
    pub fine_dry_soil: f64,
    pub dose: f64,
    /// `(s_cec_percentage, modified_s_cec)`, both in percent
    pub base_saturation: Option<(f64, f64)>,
}

/// CaCO3-equivalent (kg/ha) to raise `current_ph` to `target_ph`:
/// `(CEC × 150/3500 × fine_dry_soil) / 1000 / 0.5 × ΔpH × dose × 1000`.
pub fn standard_caco3_kg_ha(
    cec: f64,
    current_ph: f64,
    target_ph: f64,
    fine_dry_soil: f64,
    dose: f64,
) -> f64 {
    if current_ph >= target_ph {
        return 0.0;
    }
    let buffer = cec * 150.0 / 3500.0 * fine_dry_soil;
    buffer / 1000.0 / 0.5 * (target_ph - current_ph) * dose * 1000.0
}

/// pH corresponding to a base saturation percentage.
pub fn s_cec_to_ph(s_cec_percentage: f64) -> f64 {
    if s_cec_percentage <= 50.0 {
        4.5 + s_cec_percentage / 50.0 * 2.0
    } else {
        6.5 + (s_cec_percentage - 50.0) / 50.0 * 1.5
    }
}

pub fn improvement(entry: &CecEntry, inputs: &CecInputs) -> RawRequirement {
    let standard = |ph: f64| {
        standard_caco3_kg_ha(
            entry.cec,
            ph,
            inputs.target_ph,
            inputs.fine_dry_soil,
            inputs.dose,
        )
    };

    let caco3_kg_ha = match inputs.base_saturation {
        None => standard(inputs.current_ph),
        Some((_, modified)) => {
            let s_cec_ph = s_cec_to_ph(modified);
            let average_ph = (inputs.current_ph + s_cec_ph) / 2.0;
            if average_ph > inputs.target_ph {
                0.0
            } else {
                (standard(inputs.current_ph) + standard(s_cec_ph)) / 2.0
            }
        }
    };

    RawRequirement {
        caco3_kg_ha,
        target_ph: inputs.target_ph,
        applied_mode: AppliedMode::Improvement,
        rainfall_mm: None,
        caco3_loss_kg_ha_year: None,
    }
}

/// Annual requirement replacing leaching losses, using the clay content of
/// the fine texture class.
pub fn maintenance_requirement(
    entry: &CecEntry,
    model: &LeachingModel,
    current_ph: f64,
    target_ph: f64,
    measured_loss: Option<f64>,
    rainfall_mm: Option<f64>,
) -> Result<RawRequirement, LimeError> {
    maintenance(
        model,
        current_ph,
        target_ph,
        entry.clay_percent,
        measured_loss,
        rainfall_mm,
    )
}
