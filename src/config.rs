//! Lookup tables and defaults for the lime calculation.
//!
//! Everything here is read-only once a [`LimeCalculator`](crate::LimeCalculator)
//! has been built. The built-in values can be overridden section by section
//! from a TOML file:
//!
//! ```toml
//! [defaults]
//! nv = 95.0
//!
//! [cec.target_ph]
//! standard_crops = 6.8
//! other_crops = 6.2
//! ```
//!
//! A section that is present replaces the built-in section as a whole, so a
//! `[products]` table must list every product that should be available.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{
    default_vdlufa_table, CecTable, LeachingModel, LimeProducts, VdlufaEntry,
};
use crate::error::LimeError;
use crate::models::{CropType, TextureClass, VdlufaClass};

/// Parameter defaults applied when a request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Neutralizing value in percent
    pub nv: f64,
    pub fine_dry_soil: f64,
    pub dose: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            nv: 100.0,
            fine_dry_soil: 1500.0,
            dose: 1.0,
        }
    }
}

/// Complete, injectable configuration of the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimeConfig {
    pub defaults: Defaults,
    pub leaching: LeachingModel,
    pub vdlufa: BTreeMap<VdlufaClass, VdlufaEntry>,
    pub cec: CecTable,
    pub products: LimeProducts,
}

impl Default for LimeConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            leaching: LeachingModel::default(),
            vdlufa: default_vdlufa_table(),
            cec: CecTable::default(),
            products: LimeProducts::default(),
        }
    }
}

impl LimeConfig {
    /// Parse a configuration from TOML text. Missing sections keep their
    /// built-in values. The result is not validated.
    pub fn from_toml_str(text: &str) -> Result<Self, LimeError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, LimeError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, LimeError> {
        toml::to_string_pretty(self).map_err(|e| LimeError::Configuration(e.to_string()))
    }

    /// Check that every table is complete and well-formed.
    pub fn validate(&self) -> Result<(), LimeError> {
        self.validate_defaults()?;
        self.leaching.validate()?;

        for class in VdlufaClass::ALL {
            let entry = self.vdlufa.get(&class).ok_or_else(|| {
                LimeError::Configuration(format!("vdlufa: missing entry for '{}'", class.label()))
            })?;
            check_clay_percent(&format!("vdlufa.{}", class.label()), entry.clay_percent)?;
            for crop in CropType::ALL {
                entry
                    .curve(crop)
                    .validate(&format!("vdlufa.{} ({crop})", class.label()))?;
            }
        }

        for crop in CropType::ALL {
            let target = self.cec.target_ph.for_crop(crop);
            if !target.is_finite() || !(0.0..=14.0).contains(&target) {
                return Err(LimeError::Configuration(format!(
                    "cec.target_ph: target for {crop} must be within 0..=14, got {target}"
                )));
            }
        }
        for class in TextureClass::ALL {
            let entry = self.cec.textures.get(&class).ok_or_else(|| {
                LimeError::Configuration(format!("cec: missing entry for '{}'", class.label()))
            })?;
            check_clay_percent(&format!("cec.{}", class.label()), entry.clay_percent)?;
            if !entry.cec.is_finite() || entry.cec <= 0.0 {
                return Err(LimeError::Configuration(format!(
                    "cec.{}: CEC must be positive, got {}",
                    class.label(),
                    entry.cec
                )));
            }
        }

        self.products.validate()
    }

    fn validate_defaults(&self) -> Result<(), LimeError> {
        let d = &self.defaults;
        for (name, value) in [
            ("nv", d.nv),
            ("fine_dry_soil", d.fine_dry_soil),
            ("dose", d.dose),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LimeError::Configuration(format!(
                    "defaults.{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn check_clay_percent(context: &str, clay: f64) -> Result<(), LimeError> {
    if !clay.is_finite() || !(0.0..=100.0).contains(&clay) {
        return Err(LimeError::Configuration(format!(
            "{context}: clay_percent must be within 0..=100, got {clay}"
        )));
    }
    Ok(())
}
