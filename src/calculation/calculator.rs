use tracing::{debug, warn};

use super::aggregator::aggregate_zones;
use super::cec::{self, CecInputs};
use super::conversion::{check_nv, run_pipeline};
use super::tables::{CecEntry, VdlufaEntry};
use super::texture::{classify, classify_vdlufa};
use super::vdlufa;
use crate::config::LimeConfig;
use crate::error::LimeError;
use crate::models::{
    AggregateResult, AppliedMode, CalculationRequest, LimeRequirementResult, LimingMode, Method,
    MethodParameters, SoilRecord, TextureClass,
};

/// What a method produces before the shared conversion chain runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRequirement {
    pub caco3_kg_ha: f64,
    pub target_ph: f64,
    pub applied_mode: AppliedMode,
    pub rainfall_mm: Option<f64>,
    pub caco3_loss_kg_ha_year: Option<f64>,
}

/// Request parameters with configuration defaults filled in and checked.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedParameters<'a> {
    pub params: &'a MethodParameters,
    pub nv: f64,
    pub fine_dry_soil: f64,
    pub dose: f64,
    pub base_saturation: Option<(f64, f64)>,
}

/// Lime requirement engine. Holds a validated, read-only configuration and
/// can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct LimeCalculator {
    config: LimeConfig,
}

impl LimeCalculator {
    /// Build a calculator, rejecting incomplete or malformed tables.
    pub fn new(config: LimeConfig) -> Result<Self, LimeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Calculator using the built-in tables.
    pub fn with_defaults() -> Self {
        Self {
            config: LimeConfig::default(),
        }
    }

    pub fn config(&self) -> &LimeConfig {
        &self.config
    }

    /// Requirement for a single zone.
    pub fn calculate_zone(
        &self,
        record: &SoilRecord,
        params: &MethodParameters,
        method: Method,
    ) -> Result<LimeRequirementResult, LimeError> {
        let resolved = self.resolve(params, method)?;
        self.zone_result(record, &resolved, method, "")
    }

    /// Requirement for every zone plus area-weighted totals.
    pub fn aggregate(
        &self,
        records: &[SoilRecord],
        params: &MethodParameters,
        method: Method,
    ) -> Result<AggregateResult, LimeError> {
        aggregate_zones(self, records, params, method)
    }

    pub fn process_request(
        &self,
        request: &CalculationRequest,
        method: Method,
    ) -> Result<AggregateResult, LimeError> {
        self.aggregate(&request.soil_data, &request.parameters, method)
    }

    pub(crate) fn resolve<'a>(
        &self,
        params: &'a MethodParameters,
        method: Method,
    ) -> Result<ResolvedParameters<'a>, LimeError> {
        let defaults = &self.config.defaults;

        let nv = params.nv.unwrap_or(defaults.nv);
        check_nv(nv)?;
        self.config.products.factor(&params.lime_type)?;

        if let Some(rain) = params.rainfall_mm {
            if !rain.is_finite() || rain < 0.0 {
                return Err(LimeError::invalid_parameter(
                    "rainfall_mm",
                    rain,
                    "rainfall must be a non-negative number of mm",
                ));
            }
        }
        if let Some(target) = params.target_ph {
            if !target.is_finite() || !(0.0..=14.0).contains(&target) {
                return Err(LimeError::invalid_parameter(
                    "target_ph",
                    target,
                    "target pH must be within 0..=14",
                ));
            }
            if method == Method::Vdlufa {
                warn!(
                    target_ph = target,
                    "VDLUFA targets come from the curve table, target_ph is ignored"
                );
            }
        }
        if let Some(cap) = params.max_application_rate {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(LimeError::invalid_parameter(
                    "max_application_rate",
                    cap,
                    "cap must be a positive number of kg/ha",
                ));
            }
        }

        let fine_dry_soil = params.fine_dry_soil.unwrap_or(defaults.fine_dry_soil);
        let dose = params.dose.unwrap_or(defaults.dose);
        for (field, value) in [("fine_dry_soil", fine_dry_soil), ("dose", dose)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LimeError::invalid_parameter(field, value, "must be positive"));
            }
        }

        let base_saturation = match (params.s_cec_percentage, params.modified_s_cec) {
            (Some(current), Some(modified)) => {
                for (field, value) in [("s_cec_percentage", current), ("modified_s_cec", modified)] {
                    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                        return Err(LimeError::invalid_parameter(
                            field,
                            value,
                            "base saturation must be within 0..=100 %",
                        ));
                    }
                }
                Some((current, modified))
            }
            _ => None,
        };

        Ok(ResolvedParameters {
            params,
            nv,
            fine_dry_soil,
            dose,
            base_saturation,
        })
    }

    pub(crate) fn zone_result(
        &self,
        record: &SoilRecord,
        resolved: &ResolvedParameters<'_>,
        method: Method,
        prefix: &str,
    ) -> Result<LimeRequirementResult, LimeError> {
        record.validate_with_prefix(prefix)?;
        let texture = classify(&record.soil_texture)?;
        let raw = self.raw_requirement(method, texture, record, resolved)?;
        debug!(
            zone = %record.zone_name,
            %method,
            %texture,
            caco3_kg_ha = raw.caco3_kg_ha,
            "raw requirement"
        );

        let params = resolved.params;
        let products = &self.config.products;
        let mut conversion = run_pipeline(raw.caco3_kg_ha, resolved.nv, products, &params.lime_type)?;
        let mut target_ph = raw.target_ph;
        let mut was_capped = false;

        if let Some(cap) = params.max_application_rate {
            if conversion.product > cap {
                let ratio = cap / conversion.product;
                warn!(
                    zone = %record.zone_name,
                    uncapped_kg_ha = conversion.product,
                    cap_kg_ha = cap,
                    "application rate capped"
                );
                conversion = run_pipeline(
                    raw.caco3_kg_ha * ratio,
                    resolved.nv,
                    products,
                    &params.lime_type,
                )?;
                if raw.applied_mode == AppliedMode::Improvement {
                    target_ph = record.ph_value + ratio * (raw.target_ph - record.ph_value);
                }
                was_capped = true;
            }
        }

        Ok(LimeRequirementResult {
            zone_name: record.zone_name.clone(),
            field_name: record.field_name.clone(),
            area: record.area,
            method,
            applied_mode: raw.applied_mode,
            texture,
            original_texture: record.soil_texture.clone(),
            current_ph: record.ph_value,
            target_ph,
            caco3_equivalent_kg_ha: conversion.caco3,
            cao_equivalent_kg_ha: conversion.cao,
            nv_adjusted_cao_kg_ha: conversion.nv_adjusted_cao,
            product_kg_ha: conversion.product,
            product_total_kg: conversion.product * record.area,
            was_capped,
            rainfall_mm: raw.rainfall_mm,
            caco3_loss_kg_ha_year: raw.caco3_loss_kg_ha_year,
        })
    }

    /// Method × mode dispatch. Every cell yields a CaCO3-equivalent only.
    fn raw_requirement(
        &self,
        method: Method,
        texture: TextureClass,
        record: &SoilRecord,
        resolved: &ResolvedParameters<'_>,
    ) -> Result<RawRequirement, LimeError> {
        let params = resolved.params;
        let ph = record.ph_value;
        let rainfall = record.rainfall_mm.or(params.rainfall_mm);
        let leaching = &self.config.leaching;

        match (method, params.liming_mode) {
            (Method::Vdlufa, LimingMode::Improvement) => Ok(vdlufa::improvement(
                self.vdlufa_entry(&record.soil_texture)?,
                params.crop_type,
                ph,
            )),
            (Method::Vdlufa, LimingMode::Maintenance) => vdlufa::maintenance_requirement(
                self.vdlufa_entry(&record.soil_texture)?,
                leaching,
                params.crop_type,
                ph,
                record.caco3_loss_kg_ha,
                rainfall,
            ),
            (Method::Cec, LimingMode::Improvement) => Ok(cec::improvement(
                self.cec_entry(texture)?,
                &CecInputs {
                    current_ph: ph,
                    target_ph: self.cec_target_ph(params),
                    fine_dry_soil: resolved.fine_dry_soil,
                    dose: resolved.dose,
                    base_saturation: resolved.base_saturation,
                },
            )),
            (Method::Cec, LimingMode::Maintenance) => cec::maintenance_requirement(
                self.cec_entry(texture)?,
                leaching,
                ph,
                self.cec_target_ph(params),
                record.caco3_loss_kg_ha,
                rainfall,
            ),
        }
    }

    fn cec_target_ph(&self, params: &MethodParameters) -> f64 {
        params
            .target_ph
            .unwrap_or_else(|| self.config.cec.target_ph.for_crop(params.crop_type))
    }

    fn vdlufa_entry(&self, soil_texture: &str) -> Result<&VdlufaEntry, LimeError> {
        let class = classify_vdlufa(soil_texture)?;
        self.config.vdlufa.get(&class).ok_or_else(|| {
            LimeError::Configuration(format!("vdlufa: missing entry for '{}'", class.label()))
        })
    }

    fn cec_entry(&self, texture: TextureClass) -> Result<&CecEntry, LimeError> {
        self.config.cec.textures.get(&texture).ok_or_else(|| {
            LimeError::Configuration(format!("cec: missing entry for '{}'", texture.label()))
        })
    }
}
