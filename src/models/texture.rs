use serde::{Deserialize, Serialize};

use crate::error::LimeError;

/// Canonical soil texture class (USDA-style granularity).
///
/// This is the granularity the CEC method works at. VDLUFA groups these
/// classes into the coarser [`VdlufaClass`] buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureClass {
    Sand,
    LoamySand,
    SandyLoam,
    SandySiltLoam,
    Loam,
    SiltLoam,
    Silt,
    SandyClayLoam,
    ClayLoam,
    SandyClay,
    SiltyClay,
    Clay,
    Organic,
}

impl TextureClass {
    pub const ALL: [TextureClass; 13] = [
        TextureClass::Sand,
        TextureClass::LoamySand,
        TextureClass::SandyLoam,
        TextureClass::SandySiltLoam,
        TextureClass::Loam,
        TextureClass::SiltLoam,
        TextureClass::Silt,
        TextureClass::SandyClayLoam,
        TextureClass::ClayLoam,
        TextureClass::SandyClay,
        TextureClass::SiltyClay,
        TextureClass::Clay,
        TextureClass::Organic,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TextureClass::Sand => "Sand",
            TextureClass::LoamySand => "Loamy Sand",
            TextureClass::SandyLoam => "Sandy Loam",
            TextureClass::SandySiltLoam => "Sandy Silt Loam",
            TextureClass::Loam => "Loam",
            TextureClass::SiltLoam => "Silt Loam",
            TextureClass::Silt => "Silt",
            TextureClass::SandyClayLoam => "Sandy Clay Loam",
            TextureClass::ClayLoam => "Clay Loam",
            TextureClass::SandyClay => "Sandy Clay",
            TextureClass::SiltyClay => "Silty Clay",
            TextureClass::Clay => "Clay",
            TextureClass::Organic => "Organic",
        }
    }

    /// The default VDLUFA bucket of this class.
    ///
    /// Some spellings carry their own bucket (the German report names,
    /// "slightly loamy sand"); `calculation::classify_vdlufa` resolves those.
    /// Organic (bog) soils are outside the VDLUFA texture scheme.
    pub fn vdlufa_class(&self) -> Result<VdlufaClass, LimeError> {
        match self {
            TextureClass::Sand => Ok(VdlufaClass::Sand),
            TextureClass::LoamySand | TextureClass::Loam | TextureClass::SiltLoam => {
                Ok(VdlufaClass::HighlyLoamySand)
            }
            TextureClass::SandyLoam | TextureClass::SandySiltLoam | TextureClass::Silt => {
                Ok(VdlufaClass::SandySiltyLoam)
            }
            TextureClass::SandyClayLoam
            | TextureClass::ClayLoam
            | TextureClass::SandyClay
            | TextureClass::SiltyClay
            | TextureClass::Clay => Ok(VdlufaClass::ClayeyLoamToClay),
            TextureClass::Organic => Err(LimeError::Classification(format!(
                "{} (organic soils have no VDLUFA texture class)",
                self.label()
            ))),
        }
    }
}

impl std::fmt::Display for TextureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// VDLUFA soil texture group (German classification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VdlufaClass {
    /// Sand
    Sand,
    /// Schwach lehmiger Sand
    SlightlyLoamySand,
    /// Stark lehmiger Sand
    HighlyLoamySand,
    /// Sandiger / schluffiger Lehm
    SandySiltyLoam,
    /// Toniger Lehm bis Ton
    ClayeyLoamToClay,
}

impl VdlufaClass {
    pub const ALL: [VdlufaClass; 5] = [
        VdlufaClass::Sand,
        VdlufaClass::SlightlyLoamySand,
        VdlufaClass::HighlyLoamySand,
        VdlufaClass::SandySiltyLoam,
        VdlufaClass::ClayeyLoamToClay,
    ];

    /// German label as used on VDLUFA soil reports.
    pub fn label(&self) -> &'static str {
        match self {
            VdlufaClass::Sand => "Sand",
            VdlufaClass::SlightlyLoamySand => "Schwach Lehm Sand",
            VdlufaClass::HighlyLoamySand => "Stark Lehmiger Sand",
            VdlufaClass::SandySiltyLoam => "Sandiger Schl Lehm",
            VdlufaClass::ClayeyLoamToClay => "Toniger Lehm b.Ton",
        }
    }
}

impl std::fmt::Display for VdlufaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
