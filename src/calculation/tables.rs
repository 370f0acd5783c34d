use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LimeError;
use crate::models::{CropType, TextureClass, VdlufaClass};

/// A straight line `y = slope × pH + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSegment {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearSegment {
    pub const fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    pub fn at(&self, ph: f64) -> f64 {
        self.slope * ph + self.intercept
    }
}

/// VDLUFA lime requirement curve: CaO in dt/ha as a piecewise-linear
/// function of the current pH.
///
/// Below `floor_ph` the requirement is `max_cao_dt_ha`. Between `floor_ph`
/// and `breakpoint_ph` the `steep` line applies, above it the `shallow` line.
/// At or above `zero_ph` nothing is required.
///
/// `optimal_ph` is the agronomic target reported for the bucket. It sits at
/// or just below `zero_ph`; pH Maintenance stops once it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhCurve {
    pub optimal_ph: f64,
    pub zero_ph: f64,
    pub floor_ph: f64,
    pub max_cao_dt_ha: f64,
    pub breakpoint_ph: f64,
    pub steep: LinearSegment,
    pub shallow: LinearSegment,
}

impl PhCurve {
    /// CaO requirement in dt/ha at the given pH, never negative.
    ///
    /// The steep line is not capped at `max_cao_dt_ha`, so just above the
    /// floor it can exceed the value used below it.
    pub fn cao_dt_ha(&self, ph: f64) -> f64 {
        if ph >= self.zero_ph {
            return 0.0;
        }
        if ph < self.floor_ph {
            return self.max_cao_dt_ha;
        }
        let raw = if ph > self.breakpoint_ph {
            self.shallow.at(ph)
        } else {
            self.steep.at(ph)
        };
        raw.max(0.0)
    }

    pub(crate) fn validate(&self, context: &str) -> Result<(), LimeError> {
        let values = [
            self.optimal_ph,
            self.zero_ph,
            self.floor_ph,
            self.max_cao_dt_ha,
            self.breakpoint_ph,
            self.steep.slope,
            self.steep.intercept,
            self.shallow.slope,
            self.shallow.intercept,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LimeError::Configuration(format!(
                "{context}: curve contains a non-finite value"
            )));
        }
        if !(self.floor_ph < self.breakpoint_ph && self.breakpoint_ph < self.zero_ph) {
            return Err(LimeError::Configuration(format!(
                "{context}: expected floor_ph < breakpoint_ph < zero_ph, got {} / {} / {}",
                self.floor_ph, self.breakpoint_ph, self.zero_ph
            )));
        }
        if !(self.floor_ph < self.optimal_ph && self.optimal_ph <= self.zero_ph) {
            return Err(LimeError::Configuration(format!(
                "{context}: expected floor_ph < optimal_ph <= zero_ph, got {} / {} / {}",
                self.floor_ph, self.optimal_ph, self.zero_ph
            )));
        }
        if self.max_cao_dt_ha <= 0.0 {
            return Err(LimeError::Configuration(format!(
                "{context}: max_cao_dt_ha must be positive"
            )));
        }
        if self.steep.slope > 0.0 || self.shallow.slope > 0.0 {
            return Err(LimeError::Configuration(format!(
                "{context}: requirement must not rise with pH"
            )));
        }
        Ok(())
    }
}

/// VDLUFA data for one texture bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdlufaEntry {
    pub clay_percent: f64,
    pub standard_crops: PhCurve,
    pub other_crops: PhCurve,
}

impl VdlufaEntry {
    pub fn curve(&self, crop: CropType) -> &PhCurve {
        match crop {
            CropType::StandardCrops => &self.standard_crops,
            CropType::OtherCrops => &self.other_crops,
        }
    }
}

/// CEC data for one texture class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CecEntry {
    pub clay_percent: f64,
    /// Cation exchange capacity in meq/100 g
    pub cec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CecTargets {
    pub standard_crops: f64,
    pub other_crops: f64,
}

impl CecTargets {
    pub fn for_crop(&self, crop: CropType) -> f64 {
        match crop {
            CropType::StandardCrops => self.standard_crops,
            CropType::OtherCrops => self.other_crops,
        }
    }
}

impl Default for CecTargets {
    fn default() -> Self {
        Self {
            standard_crops: 6.5,
            other_crops: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CecTable {
    pub target_ph: CecTargets,
    pub textures: BTreeMap<TextureClass, CecEntry>,
}

impl Default for CecTable {
    fn default() -> Self {
        Self {
            target_ph: CecTargets::default(),
            textures: default_cec_textures(),
        }
    }
}

fn curve(
    (optimal_ph, zero_ph): (f64, f64),
    floor_ph: f64,
    max_cao_dt_ha: f64,
    breakpoint_ph: f64,
    steep: (f64, f64),
    shallow: (f64, f64),
) -> PhCurve {
    PhCurve {
        optimal_ph,
        zero_ph,
        floor_ph,
        max_cao_dt_ha,
        breakpoint_ph,
        steep: LinearSegment::new(steep.0, steep.1),
        shallow: LinearSegment::new(shallow.0, shallow.1),
    }
}

/// Built-in VDLUFA table (arable land and grassland curves).
pub fn default_vdlufa_table() -> BTreeMap<VdlufaClass, VdlufaEntry> {
    let entries = [
        (
            VdlufaClass::Sand,
            VdlufaEntry {
                clay_percent: 5.0,
                standard_crops: curve((5.9, 5.9), 4.0, 45.0, 5.3, (-28.945, 160.52), (-11.852, 69.93)),
                other_crops: curve((5.1, 5.2), 3.4, 50.0, 4.6, (-37.692, 178.46), (-8.0, 41.6)),
            },
        ),
        (
            VdlufaClass::SlightlyLoamySand,
            VdlufaEntry {
                clay_percent: 12.0,
                standard_crops: curve((6.4, 6.4), 4.0, 77.0, 5.7, (-38.71, 231.47), (-16.667, 106.67)),
                other_crops: curve((5.5, 5.6), 3.3, 83.0, 4.9, (-46.348, 235.91), (-13.333, 74.667)),
            },
        ),
        (
            VdlufaClass::HighlyLoamySand,
            VdlufaEntry {
                clay_percent: 12.0,
                standard_crops: curve((6.8, 6.8), 4.0, 87.0, 6.0, (-47.912, 302.54), (-20.0, 136.0)),
                other_crops: curve((5.8, 5.9), 3.8, 90.0, 5.1, (-60.989, 322.04), (-14.286, 84.286)),
            },
        ),
        (
            VdlufaClass::SandySiltyLoam,
            VdlufaEntry {
                clay_percent: 15.0,
                standard_crops: curve((7.1, 7.1), 4.0, 117.0, 6.2, (-58.122, 378.54), (-21.25, 150.87)),
                other_crops: curve((6.1, 6.2), 3.8, 109.0, 5.3, (-63.309, 349.87), (-16.25, 100.75)),
            },
        ),
        (
            VdlufaClass::ClayeyLoamToClay,
            VdlufaEntry {
                clay_percent: 32.0,
                standard_crops: curve((7.3, 7.3), 4.0, 160.0, 6.3, (-76.93, 505.53), (-22.222, 162.22)),
                other_crops: curve((6.3, 6.4), 3.8, 121.0, 5.4, (-65.0, 368.24), (-17.778, 113.78)),
            },
        ),
    ];
    entries.into_iter().collect()
}

fn default_cec_textures() -> BTreeMap<TextureClass, CecEntry> {
    use TextureClass::*;
    [
        (Sand, 5.0, 5.0),
        (LoamySand, 8.0, 15.0),
        (SandyLoam, 10.0, 10.0),
        (SandySiltLoam, 17.0, 20.0),
        (Loam, 18.0, 15.0),
        (SiltLoam, 15.0, 20.0),
        (Silt, 6.0, 15.0),
        (SandyClayLoam, 27.0, 30.0),
        (ClayLoam, 33.0, 25.0),
        (SandyClay, 42.0, 20.0),
        (SiltyClay, 47.0, 30.0),
        (Clay, 60.0, 40.0),
        (Organic, 20.0, 100.0),
    ]
    .into_iter()
    .map(|(class, clay_percent, cec)| (class, CecEntry { clay_percent, cec }))
    .collect()
}
