use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::calculator::RawRequirement;
use crate::error::LimeError;
use crate::models::AppliedMode;

/// Annual CaCO3 leaching estimate from rainfall, soil pH and clay content.
///
/// `loss = rainfall × D × B × conversion_factor / 100` where the drainage
/// coefficient is `D = drainage_base − drainage_clay_slope × clay%` and the
/// bicarbonate factor is `B = clamp(coeff × pH^exponent, min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeachingModel {
    pub drainage_base: f64,
    pub drainage_clay_slope: f64,
    pub bicarbonate_coefficient: f64,
    pub bicarbonate_exponent: f64,
    pub bicarbonate_min: f64,
    pub bicarbonate_max: f64,
    /// Bicarbonate to CaCO3 mass conversion
    pub conversion_factor: f64,
}

impl Default for LeachingModel {
    fn default() -> Self {
        Self {
            drainage_base: 0.6,
            drainage_clay_slope: 0.005,
            bicarbonate_coefficient: 0.002304,
            bicarbonate_exponent: 5.792337,
            bicarbonate_min: 5.0,
            bicarbonate_max: 500.0,
            conversion_factor: 0.82,
        }
    }
}

/// Result of a leaching estimate, keeping the intermediate factors for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeachingLoss {
    pub rainfall_mm: f64,
    pub drainage_coefficient: f64,
    pub bicarbonate_factor: f64,
    pub caco3_kg_ha: f64,
}

impl LeachingModel {
    pub fn drainage_coefficient(&self, clay_percent: f64) -> f64 {
        self.drainage_base - self.drainage_clay_slope * clay_percent
    }

    pub fn bicarbonate_factor(&self, ph: f64) -> f64 {
        (self.bicarbonate_coefficient * ph.powf(self.bicarbonate_exponent))
            .clamp(self.bicarbonate_min, self.bicarbonate_max)
    }

    /// Estimated annual CaCO3 loss in kg/ha.
    pub fn caco3_loss(
        &self,
        rainfall_mm: f64,
        ph: f64,
        clay_percent: f64,
    ) -> Result<LeachingLoss, LimeError> {
        if !rainfall_mm.is_finite() || rainfall_mm < 0.0 {
            return Err(LimeError::invalid_parameter(
                "rainfall_mm",
                rainfall_mm,
                "rainfall must be a non-negative number of mm",
            ));
        }
        let drainage_coefficient = self.drainage_coefficient(clay_percent);
        let bicarbonate_factor = self.bicarbonate_factor(ph);
        let caco3_kg_ha =
            rainfall_mm * drainage_coefficient * bicarbonate_factor * self.conversion_factor / 100.0;
        debug!(
            rainfall_mm,
            clay_percent, drainage_coefficient, bicarbonate_factor, caco3_kg_ha, "leaching loss"
        );
        Ok(LeachingLoss {
            rainfall_mm,
            drainage_coefficient,
            bicarbonate_factor,
            caco3_kg_ha,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), LimeError> {
        let values = [
            self.drainage_base,
            self.drainage_clay_slope,
            self.bicarbonate_coefficient,
            self.bicarbonate_exponent,
            self.bicarbonate_min,
            self.bicarbonate_max,
            self.conversion_factor,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LimeError::Configuration(
                "leaching: model contains a non-finite coefficient".to_string(),
            ));
        }
        if self.bicarbonate_min > self.bicarbonate_max {
            return Err(LimeError::Configuration(format!(
                "leaching: bicarbonate_min {} exceeds bicarbonate_max {}",
                self.bicarbonate_min, self.bicarbonate_max
            )));
        }
        Ok(())
    }
}

/// Maintenance requirement shared by both methods.
///
/// Nothing is applied when `current_ph` already reaches `target_ph`.
/// Otherwise a measured loss wins over the leaching model, which needs a
/// rainfall figure.
pub(crate) fn maintenance(
    model: &LeachingModel,
    current_ph: f64,
    target_ph: f64,
    clay_percent: f64,
    measured_loss: Option<f64>,
    rainfall_mm: Option<f64>,
) -> Result<RawRequirement, LimeError> {
    if current_ph >= target_ph {
        warn!(
            current_ph,
            target_ph, "pH already at or above target, no maintenance liming"
        );
        return Ok(RawRequirement {
            caco3_kg_ha: 0.0,
            target_ph: current_ph,
            applied_mode: AppliedMode::None,
            rainfall_mm: None,
            caco3_loss_kg_ha_year: None,
        });
    }

    let (caco3_kg_ha, rainfall_used) = match (measured_loss, rainfall_mm) {
        (Some(loss), _) => (loss, None),
        (None, Some(rain)) => (
            model.caco3_loss(rain, current_ph, clay_percent)?.caco3_kg_ha,
            Some(rain),
        ),
        (None, None) => {
            return Err(LimeError::invalid_parameter(
                "rainfall_mm",
                "none",
                "required for pH Maintenance",
            ))
        }
    };

    Ok(RawRequirement {
        caco3_kg_ha,
        target_ph: current_ph,
        applied_mode: AppliedMode::Maintenance,
        rainfall_mm: rainfall_used,
        caco3_loss_kg_ha_year: Some(caco3_kg_ha),
    })
}
