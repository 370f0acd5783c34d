use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LimeError;

/// Mass ratio CaCO3 : CaO (100.09 / 56.08).
pub const CACO3_TO_CAO_RATIO: f64 = 1.785;

/// Convert a CaCO3 mass to the CaO mass with the same neutralizing effect.
pub fn caco3_to_cao(caco3_kg: f64) -> f64 {
    caco3_kg / CACO3_TO_CAO_RATIO
}

pub fn cao_to_caco3(cao_kg: f64) -> f64 {
    cao_kg * CACO3_TO_CAO_RATIO
}

/// Scale a CaO mass for a product with neutralizing value `nv` (percent).
pub fn apply_nv(cao_kg: f64, nv: f64) -> Result<f64, LimeError> {
    check_nv(nv)?;
    Ok(cao_kg * 100.0 / nv)
}

pub(crate) fn check_nv(nv: f64) -> Result<(), LimeError> {
    if !nv.is_finite() || nv <= 0.0 {
        return Err(LimeError::invalid_parameter(
            "nv",
            nv,
            "neutralizing value must be a positive percentage",
        ));
    }
    Ok(())
}

/// Lime products and their mass factor relative to CaO.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LimeProducts(BTreeMap<String, f64>);

impl Default for LimeProducts {
    fn default() -> Self {
        let products = [
            ("CaO", 1.0),
            ("CaCO3", 1.785),
            ("Ca(OH)2", 1.321),
            ("Quicklime", 1.0),
            ("Slaked_lime", 1.321),
            ("Agrocarb", 2.381),
            ("Omya_Calciprill", 1.887),
        ];
        Self(
            products
                .into_iter()
                .map(|(name, factor)| (name.to_string(), factor))
                .collect(),
        )
    }
}

impl LimeProducts {
    pub fn new(products: BTreeMap<String, f64>) -> Self {
        Self(products)
    }

    /// Factor for the named product.
    pub fn factor(&self, lime_type: &str) -> Result<f64, LimeError> {
        let wanted = lime_type.trim();
        self.0
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, factor)| *factor)
            .ok_or_else(|| LimeError::UnknownProduct(lime_type.to_string()))
    }

    /// Convert a (NV-adjusted) CaO mass into a product mass.
    pub fn to_product(&self, cao_kg: f64, lime_type: &str) -> Result<f64, LimeError> {
        Ok(cao_kg * self.factor(lime_type)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, factor)| (name.as_str(), *factor))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), LimeError> {
        if self.0.is_empty() {
            return Err(LimeError::Configuration(
                "products: at least one lime product is required".to_string(),
            ));
        }
        for (name, factor) in &self.0 {
            if !factor.is_finite() || *factor <= 0.0 {
                return Err(LimeError::Configuration(format!(
                    "products: factor for '{name}' must be positive, got {factor}"
                )));
            }
        }
        let mut lowered: Vec<String> = self.0.keys().map(|k| k.to_ascii_lowercase()).collect();
        lowered.sort();
        if let Some(pair) = lowered.windows(2).find(|w| w[0] == w[1]) {
            return Err(LimeError::Configuration(format!(
                "products: '{}' is defined more than once (names are case-insensitive)",
                pair[0]
            )));
        }
        Ok(())
    }
}

/// Every stage of the conversion chain for one requirement, all in kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conversion {
    pub caco3: f64,
    pub cao: f64,
    pub nv_adjusted_cao: f64,
    pub product: f64,
}

/// The one conversion chain every method goes through:
/// CaCO3-equivalent → CaO → NV-adjusted CaO → product.
pub fn run_pipeline(
    caco3_kg: f64,
    nv: f64,
    products: &LimeProducts,
    lime_type: &str,
) -> Result<Conversion, LimeError> {
    let cao = caco3_to_cao(caco3_kg);
    debug!(caco3_kg, cao, "CaCO3 → CaO");
    let nv_adjusted_cao = apply_nv(cao, nv)?;
    debug!(nv, nv_adjusted_cao, "NV adjustment");
    let product = products.to_product(nv_adjusted_cao, lime_type)?;
    debug!(lime_type, product, "CaO → product");
    Ok(Conversion {
        caco3: caco3_kg,
        cao,
        nv_adjusted_cao,
        product,
    })
}
