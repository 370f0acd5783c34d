use crate::error::LimeError;
use crate::models::{TextureClass, VdlufaClass};

/// Accepted spellings per class, in normalized form (lowercase, single spaces).
///
/// Covers USDA names, the upper-snake names used by farm management exports
/// (`SANDY_LOAM`, `HALF_BOG_SOIL`) and the German VDLUFA report names.
const ALIASES: &[(TextureClass, &[&str])] = &[
    (TextureClass::Sand, &["sand"]),
    (
        TextureClass::LoamySand,
        &[
            "loamy sand",
            "slightly loamy sand",
            "very loamy sand",
            "stark lehmiger sand",
            "stark lehm sand",
        ],
    ),
    (
        TextureClass::SandyLoam,
        &["sandy loam", "schwach lehm sand", "schwach lehmiger sand"],
    ),
    (
        TextureClass::SandySiltLoam,
        &[
            "sandy silt loam",
            "sandiger schl lehm",
            "sandiger schluffiger lehm",
        ],
    ),
    (TextureClass::Loam, &["loam", "lehm"]),
    (TextureClass::SiltLoam, &["silt loam", "silty loam"]),
    (TextureClass::Silt, &["silt", "schluff"]),
    (TextureClass::SandyClayLoam, &["sandy clay loam"]),
    (
        TextureClass::ClayLoam,
        &[
            "clay loam",
            "clayey loam",
            "loamy clay",
            "slightly clayey loam",
            "toniger lehm b ton",
            "toniger lehm bis ton",
            "toniger lehm",
        ],
    ),
    (TextureClass::SandyClay, &["sandy clay"]),
    (TextureClass::SiltyClay, &["silty clay"]),
    (TextureClass::Clay, &["clay", "ton"]),
    (TextureClass::Organic, &["organic", "bog", "half bog soil"]),
];

/// Spellings that name their VDLUFA bucket directly, overriding the default
/// bucket of their texture class.
const VDLUFA_BUCKETS: &[(&str, VdlufaClass)] = &[
    ("slightly loamy sand", VdlufaClass::SlightlyLoamySand),
    ("schwach lehm sand", VdlufaClass::SlightlyLoamySand),
    ("schwach lehmiger sand", VdlufaClass::SlightlyLoamySand),
    ("stark lehmiger sand", VdlufaClass::HighlyLoamySand),
    ("stark lehm sand", VdlufaClass::HighlyLoamySand),
    ("sandiger schl lehm", VdlufaClass::SandySiltyLoam),
    ("sandiger schluffiger lehm", VdlufaClass::SandySiltyLoam),
    ("toniger lehm b ton", VdlufaClass::ClayeyLoamToClay),
    ("toniger lehm bis ton", VdlufaClass::ClayeyLoamToClay),
    ("toniger lehm", VdlufaClass::ClayeyLoamToClay),
];

fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map free-text soil texture to a canonical [`TextureClass`].
///
/// Matching is case-insensitive and ignores separators, so `"Sandy Loam"`,
/// `"SANDY_LOAM"` and `"sandy-loam"` are the same class. Text that is not a
/// known spelling is rejected rather than guessed from keywords.
pub fn classify(raw: &str) -> Result<TextureClass, LimeError> {
    let key = normalize(raw);
    ALIASES
        .iter()
        .find(|(_, names)| names.contains(&key.as_str()))
        .map(|(class, _)| *class)
        .ok_or_else(|| LimeError::Classification(raw.to_string()))
}

/// Map free-text soil texture to the VDLUFA bucket used by the VDLUFA method.
///
/// The bucket usually follows the texture class, but the German report names
/// and "slightly loamy sand" select their bucket directly. The same text can
/// therefore land in a different fine class for the CEC method
/// (`"Schwach Lehm Sand"` is a sandy loam there, `"slightly loamy sand"` a
/// loamy sand).
pub fn classify_vdlufa(raw: &str) -> Result<VdlufaClass, LimeError> {
    let key = normalize(raw);
    if let Some((_, bucket)) = VDLUFA_BUCKETS.iter().find(|(name, _)| *name == key) {
        return Ok(*bucket);
    }
    classify(raw)?.vdlufa_class()
}
