use super::calculator::RawRequirement;
use super::conversion::cao_to_caco3;
use super::leaching::{maintenance, LeachingModel};
use super::tables::VdlufaEntry;
use crate::error::LimeError;
use crate::models::{AppliedMode, CropType};

/// One-time requirement lifting the pH to the bucket's optimum.
///
/// The curve yields CaO in dt/ha; the result is expressed as a
/// CaCO3-equivalent in kg/ha.
pub fn improvement(entry: &VdlufaEntry, crop: CropType, current_ph: f64) -> RawRequirement {
    let curve = entry.curve(crop);
    let cao_kg_ha = curve.cao_dt_ha(current_ph) * 100.0;
    RawRequirement {
        caco3_kg_ha: cao_to_caco3(cao_kg_ha),
        target_ph: curve.optimal_ph,
        applied_mode: AppliedMode::Improvement,
        rainfall_mm: None,
        caco3_loss_kg_ha_year: None,
    }
}

/// Annual requirement replacing the CaCO3 lost to leaching, using the
/// bucket's clay content for the drainage estimate. Nothing is needed once
/// the pH has reached the bucket's optimum.
pub fn maintenance_requirement(
    entry: &VdlufaEntry,
    model: &LeachingModel,
    crop: CropType,
    current_ph: f64,
    measured_loss: Option<f64>,
    rainfall_mm: Option<f64>,
) -> Result<RawRequirement, LimeError> {
    maintenance(
        model,
        current_ph,
        entry.curve(crop).optimal_ph,
        entry.clay_percent,
        measured_loss,
        rainfall_mm,
    )
}
